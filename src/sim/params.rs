//! Solver parameters (grid shape and physical constants)

use crate::config::ConfigError;
use crate::consts::MAX_NODES;

/// Largest stencil coefficient for which the 2-D leapfrog update stays bounded
pub const STABLE_COEFFICIENT_LIMIT: f64 = 0.5;

/// Grid dimensions, spacing and wave constants for one run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverParams {
    /// Nodes along x (odd)
    pub nx: usize,
    /// Nodes along y (odd)
    pub ny: usize,
    pub dx: f64,
    pub dy: f64,
    /// Wave speed
    pub c: f64,
    /// Courant number
    pub cfl: f64,
    /// Damping coefficient
    pub nu: f64,
}

impl SolverParams {
    pub fn new(nx: usize, ny: usize, dx: f64, dy: f64, c: f64, cfl: f64, nu: f64) -> Self {
        Self {
            nx,
            ny,
            dx,
            dy,
            c,
            cfl,
            nu,
        }
    }

    /// Reject shapes and constants the solver cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (axis, nodes) in [('x', self.nx), ('y', self.ny)] {
            if nodes < 3 {
                return Err(ConfigError::TooFewNodes { axis, nodes });
            }
            if nodes % 2 == 0 {
                return Err(ConfigError::EvenNodeCount { axis, nodes });
            }
        }
        match self.nx.checked_mul(self.ny) {
            Some(total) if total <= MAX_NODES => {}
            _ => {
                return Err(ConfigError::GridTooLarge {
                    nx: self.nx,
                    ny: self.ny,
                });
            }
        }

        for (name, value) in [
            ("dx", self.dx),
            ("dy", self.dy),
            ("wave speed", self.c),
            ("CFL", self.cfl),
            ("damping", self.nu),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite(name));
            }
        }

        for (axis, spacing) in [('x', self.dx), ('y', self.dy)] {
            if spacing <= 0.0 {
                return Err(ConfigError::NonPositiveSpacing { axis, spacing });
            }
        }
        if self.c <= 0.0 {
            return Err(ConfigError::NonPositiveWaveSpeed(self.c));
        }
        if self.cfl <= 0.0 || self.cfl >= 1.0 {
            return Err(ConfigError::UnstableCourant(self.cfl));
        }
        if self.nu < 0.0 {
            return Err(ConfigError::NegativeDamping(self.nu));
        }
        Ok(())
    }

    /// Timestep `dt = c * CFL * dx`
    #[inline]
    pub fn dt(&self) -> f64 {
        self.c * self.cfl * self.dx
    }

    /// Coefficient applied to the whole stencil bracket: `0.5 * c * dt² / dx²`
    #[inline]
    pub fn stencil_coefficient(&self) -> f64 {
        let dt = self.dt();
        0.5 * self.c * (dt * dt) / (self.dx * self.dx)
    }

    /// Number of cells the stencil writes each tick
    #[inline]
    pub fn interior_cells(&self) -> usize {
        (self.nx - 2) * (self.ny - 2)
    }

    /// Whether `(x, y)` lies strictly inside the boundary ring
    #[inline]
    pub fn is_interior(&self, x: usize, y: usize) -> bool {
        x > 0 && y > 0 && x < self.nx - 1 && y < self.ny - 1
    }

    /// Center node
    #[inline]
    pub fn center(&self) -> (usize, usize) {
        (crate::center_index(self.nx), crate::center_index(self.ny))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> SolverParams {
        SolverParams::new(5, 5, 1.0, 1.0, 1.0, 0.2, 0.0)
    }

    #[test]
    fn test_derived_quantities() {
        let p = small();
        assert!((p.dt() - 0.2).abs() < 1e-15);
        assert!((p.stencil_coefficient() - 0.02).abs() < 1e-15);
        assert_eq!(p.interior_cells(), 9);
        assert_eq!(p.center(), (2, 2));
    }

    #[test]
    fn test_interior_excludes_boundary_ring() {
        let p = small();
        assert!(p.is_interior(1, 1));
        assert!(p.is_interior(3, 3));
        assert!(!p.is_interior(0, 2));
        assert!(!p.is_interior(2, 4));
        assert!(!p.is_interior(7, 2));
    }

    #[test]
    fn test_validate_rejects_bad_shapes() {
        let mut p = small();
        p.nx = 4;
        assert_eq!(
            p.validate(),
            Err(ConfigError::EvenNodeCount { axis: 'x', nodes: 4 })
        );

        let mut p = small();
        p.ny = 1;
        assert_eq!(
            p.validate(),
            Err(ConfigError::TooFewNodes { axis: 'y', nodes: 1 })
        );
    }

    #[test]
    fn test_validate_rejects_oversized_grid() {
        let mut p = small();
        p.nx = 2049;
        p.ny = 2049;
        assert_eq!(
            p.validate(),
            Err(ConfigError::GridTooLarge { nx: 2049, ny: 2049 })
        );

        // Product would wrap usize
        let mut p = small();
        p.nx = usize::MAX;
        p.ny = 3;
        assert!(matches!(
            p.validate(),
            Err(ConfigError::GridTooLarge { .. })
        ));

        let mut p = small();
        p.nx = 2047;
        p.ny = 2047;
        assert_eq!(p.validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_bad_constants() {
        let mut p = small();
        p.cfl = 1.0;
        assert_eq!(p.validate(), Err(ConfigError::UnstableCourant(1.0)));

        let mut p = small();
        p.dy = 0.0;
        assert!(matches!(
            p.validate(),
            Err(ConfigError::NonPositiveSpacing { axis: 'y', .. })
        ));

        let mut p = small();
        p.nu = -0.1;
        assert_eq!(p.validate(), Err(ConfigError::NegativeDamping(-0.1)));

        let mut p = small();
        p.c = f64::NAN;
        assert_eq!(p.validate(), Err(ConfigError::NonFinite("wave speed")));
    }
}
