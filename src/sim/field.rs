//! Height field with past/present/future time slices
//!
//! Three buffers are allocated once. Roles rotate by swapping slot indices,
//! so advancing a tick never copies or reallocates a slice.

/// Time slice role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slice {
    Past = 0,
    Present = 1,
    Future = 2,
}

/// Read-only view of one time slice
#[derive(Debug, Clone, Copy)]
pub struct SliceView<'a> {
    data: &'a [f64],
    nx: usize,
    ny: usize,
}

impl<'a> SliceView<'a> {
    /// Height at `(x, y)`; panics outside the grid
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f64 {
        debug_assert!(x < self.nx && y < self.ny);
        self.data[x * self.ny + y]
    }

    /// Height at `(x, y)`, or `None` outside the grid
    #[inline]
    pub fn try_get(&self, x: usize, y: usize) -> Option<f64> {
        if x < self.nx && y < self.ny {
            Some(self.data[x * self.ny + y])
        } else {
            None
        }
    }

    /// Raw x-major storage (`index = x * ny + y`)
    pub fn as_slice(&self) -> &'a [f64] {
        self.data
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.nx, self.ny)
    }
}

/// Buffers handed to the stencil for one sweep.
///
/// `past` and `present` are shared borrows of buffers disjoint from `future`,
/// so the sweep always reads one consistent snapshot.
pub struct SweepBuffers<'a> {
    pub past: &'a [f64],
    pub present: &'a [f64],
    pub future: &'a mut [f64],
}

/// Dense `nx × ny` height field over three time slices
#[derive(Debug, Clone)]
pub struct HeightField {
    nx: usize,
    ny: usize,
    buffers: [Vec<f64>; 3],
    /// `slots[role]` is the buffer currently playing that role
    slots: [usize; 3],
    /// Interior cells the stencil has swept into `future` since the last rotation
    swept: usize,
}

impl HeightField {
    /// All-zero field
    pub fn new(nx: usize, ny: usize) -> Self {
        Self {
            nx,
            ny,
            buffers: [vec![0.0; nx * ny], vec![0.0; nx * ny], vec![0.0; nx * ny]],
            slots: [0, 1, 2],
            swept: 0,
        }
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn ny(&self) -> usize {
        self.ny
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        x * self.ny + y
    }

    #[inline]
    pub fn is_interior(&self, x: usize, y: usize) -> bool {
        x > 0 && y > 0 && x + 1 < self.nx && y + 1 < self.ny
    }

    #[inline]
    pub fn is_boundary(&self, x: usize, y: usize) -> bool {
        x < self.nx && y < self.ny && !self.is_interior(x, y)
    }

    pub fn interior_cells(&self) -> usize {
        self.nx.saturating_sub(2) * self.ny.saturating_sub(2)
    }

    pub fn slice(&self, slice: Slice) -> SliceView<'_> {
        SliceView {
            data: &self.buffers[self.slots[slice as usize]],
            nx: self.nx,
            ny: self.ny,
        }
    }

    pub fn past(&self) -> SliceView<'_> {
        self.slice(Slice::Past)
    }

    pub fn present(&self) -> SliceView<'_> {
        self.slice(Slice::Present)
    }

    pub fn future(&self) -> SliceView<'_> {
        self.slice(Slice::Future)
    }

    /// Overwrite an interior cell of the present slice (initial impulses).
    ///
    /// Returns false and leaves the field untouched for boundary or
    /// out-of-range coordinates.
    pub fn seed_present(&mut self, x: usize, y: usize, value: f64) -> bool {
        if !self.is_interior(x, y) {
            return false;
        }
        let idx = self.index(x, y);
        let slot = self.slots[Slice::Present as usize];
        self.buffers[slot][idx] = value;
        true
    }

    /// Overwrite an interior cell of the future slice (forced impacts).
    ///
    /// Boundary cells are never written; the request is ignored.
    pub fn force_future(&mut self, x: usize, y: usize, value: f64) {
        if !self.is_interior(x, y) {
            return;
        }
        let idx = self.index(x, y);
        let slot = self.slots[Slice::Future as usize];
        self.buffers[slot][idx] = value;
    }

    /// Borrow the three buffers for a full stencil sweep
    pub fn sweep_buffers(&mut self) -> SweepBuffers<'_> {
        let [past, present, future] = self.slots;
        match self.buffers.get_disjoint_mut([past, present, future]) {
            Ok([past, present, future]) => SweepBuffers {
                past,
                present,
                future,
            },
            Err(_) => unreachable!("time slices share a buffer: {:?}", self.slots),
        }
    }

    /// Record that a sweep wrote `cells` interior cells into `future`
    pub fn mark_swept(&mut self, cells: usize) {
        self.swept += cells;
    }

    /// Cells swept into `future` since the last rotation
    pub fn swept(&self) -> usize {
        self.swept
    }

    /// `past ← present`, `present ← future`; the old past buffer becomes
    /// the next future.
    ///
    /// # Panics
    /// Unless exactly every interior cell has been swept since the last
    /// rotation. Rotating a partial sweep would carry stale values into every
    /// later tick, so it is treated as a fatal fault.
    pub fn rotate(&mut self) {
        if self.swept != self.interior_cells() {
            panic!(
                "computation exceeded loop: {} of {} interior cells swept before rotation",
                self.swept,
                self.interior_cells()
            );
        }
        let [past, present, future] = self.slots;
        self.slots = [present, future, past];
        self.swept = 0;
    }

    /// Energy proxy of the present slice: sum of squared first differences
    pub fn gradient_energy(&self) -> f64 {
        let present = self.present();
        let mut energy = 0.0;
        for x in 0..self.nx {
            for y in 0..self.ny {
                let h = present.get(x, y);
                if x + 1 < self.nx {
                    let d = present.get(x + 1, y) - h;
                    energy += d * d;
                }
                if y + 1 < self.ny {
                    let d = present.get(x, y + 1) - h;
                    energy += d * d;
                }
            }
        }
        energy
    }

    /// Largest absolute height in the present slice
    pub fn max_abs(&self) -> f64 {
        self.present()
            .as_slice()
            .iter()
            .fold(0.0_f64, |acc, h| acc.max(h.abs()))
    }
}
