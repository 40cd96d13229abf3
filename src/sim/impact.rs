//! Active disturbances forcing single cells of the height field

/// One forced cell. Coordinates are always strictly interior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Impact {
    pub x: usize,
    pub y: usize,
    /// Ticks left during which the cell is forced
    pub remaining_frames: u32,
}

/// FIFO of active impacts
///
/// Duplicates are allowed; several entries on the same cell simply write the
/// same forced value. Queue order is application order.
#[derive(Debug, Clone, Default)]
pub struct ImpactQueue {
    entries: Vec<Impact>,
}

impl ImpactQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an impact. A zero duration would never force anything, so it
    /// is dropped and `None` is returned.
    pub fn enqueue(&mut self, x: usize, y: usize, duration: u32) -> Option<Impact> {
        if duration == 0 {
            return None;
        }
        let impact = Impact {
            x,
            y,
            remaining_frames: duration,
        };
        self.entries.push(impact);
        Some(impact)
    }

    /// Decrement every entry, then drop the expired ones (order preserved)
    pub fn tick(&mut self) -> usize {
        for impact in &mut self.entries {
            impact.remaining_frames = impact.remaining_frames.saturating_sub(1);
        }
        let before = self.entries.len();
        self.entries.retain(|impact| impact.remaining_frames > 0);
        before - self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Impact> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_zero_duration_dropped() {
        let mut queue = ImpactQueue::new();
        assert_eq!(queue.enqueue(2, 2, 0), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_tick_purges_expired_in_order() {
        let mut queue = ImpactQueue::new();
        queue.enqueue(1, 1, 1);
        queue.enqueue(2, 2, 3);
        queue.enqueue(3, 3, 2);

        assert_eq!(queue.tick(), 1);
        let cells: Vec<_> = queue.iter().map(|i| (i.x, i.y, i.remaining_frames)).collect();
        assert_eq!(cells, vec![(2, 2, 2), (3, 3, 1)]);

        assert_eq!(queue.tick(), 1);
        assert_eq!(queue.tick(), 1);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_duplicates_kept() {
        let mut queue = ImpactQueue::new();
        queue.enqueue(2, 2, 5);
        queue.enqueue(2, 2, 5);
        assert_eq!(queue.len(), 2);
    }

    proptest! {
        #[test]
        fn impact_lives_exactly_its_duration(duration in 1u32..200) {
            let mut queue = ImpactQueue::new();
            queue.enqueue(1, 1, duration);
            let mut ticks = 0;
            while !queue.is_empty() {
                queue.tick();
                ticks += 1;
            }
            prop_assert_eq!(ticks, duration);
        }
    }
}
