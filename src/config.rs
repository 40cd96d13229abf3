//! Simulation configuration
//!
//! Fixed at initialization and never changed during a run. Loaded from
//! defaults, or from a JSON document (inline page block on web, file on native).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::SolverParams;

/// Rejected configuration
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Plane extent must be positive and finite
    InvalidExtent(f64),
    /// Node counts must be odd so a unique center node exists
    EvenNodeCount { axis: char, nodes: usize },
    /// At least one interior node is required
    TooFewNodes { axis: char, nodes: usize },
    /// `nx * ny` exceeds `MAX_NODES`
    GridTooLarge { nx: usize, ny: usize },
    /// Courant number outside (0, 1)
    UnstableCourant(f64),
    NonPositiveSpacing { axis: char, spacing: f64 },
    NonPositiveWaveSpeed(f64),
    NegativeDamping(f64),
    NonPositiveHitRadius(f32),
    /// A parameter was NaN or infinite
    NonFinite(&'static str),
    /// JSON document could not be parsed
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidExtent(len) => {
                write!(f, "plane extent must be positive, got {len}")
            }
            ConfigError::EvenNodeCount { axis, nodes } => {
                write!(f, "n{axis} must be odd, got {nodes}")
            }
            ConfigError::TooFewNodes { axis, nodes } => {
                write!(f, "n{axis} must be at least 3, got {nodes}")
            }
            ConfigError::GridTooLarge { nx, ny } => {
                write!(f, "grid of {nx}x{ny} nodes exceeds the limit of {MAX_NODES}")
            }
            ConfigError::UnstableCourant(cfl) => {
                write!(f, "CFL must satisfy 0 < CFL < 1, got {cfl}")
            }
            ConfigError::NonPositiveSpacing { axis, spacing } => {
                write!(f, "d{axis} must be positive, got {spacing}")
            }
            ConfigError::NonPositiveWaveSpeed(c) => {
                write!(f, "wave speed must be positive, got {c}")
            }
            ConfigError::NegativeDamping(nu) => write!(f, "damping must be >= 0, got {nu}"),
            ConfigError::NonPositiveHitRadius(r) => {
                write!(f, "hit radius must be positive, got {r}")
            }
            ConfigError::NonFinite(name) => write!(f, "{name} must be finite"),
            ConfigError::Parse(msg) => write!(f, "invalid configuration document: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // === Grid ===
    /// Plane start coordinate
    pub x_min: f64,
    /// Plane end coordinate (the plane is square)
    pub x_max: f64,
    /// Simulation nodes per unit of length
    pub nodes_per_length: u32,

    // === Physics ===
    /// Wave speed `c`
    pub wave_speed: f64,
    /// Courant number
    pub cfl: f64,
    /// Damping coefficient `nu`
    pub damping: f64,

    // === Surface ===
    /// Visual gain from simulated height to mesh elevation
    pub amplification: f32,

    // === Interaction ===
    /// World-space radius around a pointer hit that reaches vertices
    pub hit_radius: f32,
    /// Duration of the startup impact at the center (0 disables it)
    pub seed_impact_frames: u32,
    /// Impact duration for pointer movement
    pub move_impact_frames: u32,
    /// Impact duration for clicks
    pub click_impact_frames: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            x_min: X_MIN,
            x_max: X_MAX,
            nodes_per_length: NODES_PER_LENGTH,

            wave_speed: WAVE_SPEED,
            cfl: CFL,
            damping: DAMPING,

            amplification: AMPLIFICATION,

            hit_radius: HIT_RADIUS,
            seed_impact_frames: SEED_IMPACT_FRAMES,
            move_impact_frames: MOVE_IMPACT_FRAMES,
            click_impact_frames: CLICK_IMPACT_FRAMES,
        }
    }
}

impl SimConfig {
    /// Side length of the (square) plane
    pub fn length(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Derive solver parameters: `n = nodes_per_length * L + 1`, `d = L / (n - 1)`
    pub fn solver_params(&self) -> Result<SolverParams, ConfigError> {
        let length = self.length();
        if !length.is_finite() {
            return Err(ConfigError::NonFinite("plane extent"));
        }
        if length <= 0.0 {
            return Err(ConfigError::InvalidExtent(length));
        }

        // Bound the float before casting so the node count cannot wrap
        let scaled = (self.nodes_per_length as f64 * length).round();
        let nodes = if scaled < MAX_NODES as f64 {
            (scaled as usize).checked_add(1)
        } else {
            None
        };
        let Some(nodes) = nodes else {
            let nodes = (scaled as usize).saturating_add(1);
            return Err(ConfigError::GridTooLarge {
                nx: nodes,
                ny: nodes,
            });
        };
        let spacing = if nodes > 1 {
            length / (nodes - 1) as f64
        } else {
            length
        };

        let params = SolverParams::new(
            nodes,
            nodes,
            spacing,
            spacing,
            self.wave_speed,
            self.cfl,
            self.damping,
        );
        params.validate()?;
        Ok(params)
    }

    /// Validate every field, including the derived solver parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.solver_params()?;

        if !self.amplification.is_finite() {
            return Err(ConfigError::NonFinite("amplification"));
        }
        if !self.hit_radius.is_finite() {
            return Err(ConfigError::NonFinite("hit radius"));
        }
        if self.hit_radius <= 0.0 {
            return Err(ConfigError::NonPositiveHitRadius(self.hit_radius));
        }
        Ok(())
    }

    /// Parse and validate a JSON document; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        log::info!(
            "Loaded configuration: L={} nodes/len={} c={} CFL={} nu={}",
            config.length(),
            config.nodes_per_length,
            config.wave_speed,
            config.cfl,
            config.damping
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_derives_odd_grid() {
        let params = SimConfig::default().solver_params().unwrap();
        assert_eq!(params.nx, 101);
        assert_eq!(params.ny, 101);
        assert!((params.dx - 1.0).abs() < 1e-12);
        assert!((params.dt() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_odd_extent_gives_even_node_count() {
        let config = SimConfig {
            x_max: 99.0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::EvenNodeCount {
                axis: 'x',
                nodes: 100
            })
        );
    }

    #[test]
    fn test_courant_outside_unit_interval_rejected() {
        for cfl in [0.0, 1.0, 1.5, -0.2] {
            let config = SimConfig {
                cfl,
                ..Default::default()
            };
            assert_eq!(config.validate(), Err(ConfigError::UnstableCourant(cfl)));
        }
    }

    #[test]
    fn test_nodes_per_length_scales_grid() {
        let config = SimConfig {
            x_max: 10.0,
            nodes_per_length: 2,
            ..Default::default()
        };
        let params = config.solver_params().unwrap();
        assert_eq!(params.nx, 21);
        assert!((params.dx - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_from_json_partial_document() {
        let config = SimConfig::from_json(r#"{ "x_max": 20.0, "damping": 0.0 }"#).unwrap();
        assert_eq!(config.x_max, 20.0);
        assert_eq!(config.damping, 0.0);
        assert_eq!(config.cfl, CFL);
    }

    #[test]
    fn test_from_json_rejects_garbage_and_invalid() {
        assert!(matches!(
            SimConfig::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            SimConfig::from_json(r#"{ "cfl": 2.0 }"#),
            Err(ConfigError::UnstableCourant(_))
        ));
        assert!(matches!(
            SimConfig::from_json(r#"{ "hit_radius": 0.0 }"#),
            Err(ConfigError::NonPositiveHitRadius(_))
        ));
    }

    #[test]
    fn test_huge_extent_rejected_without_overflow() {
        assert!(matches!(
            SimConfig::from_json(r#"{ "x_max": 1e300 }"#),
            Err(ConfigError::GridTooLarge { .. })
        ));

        let config = SimConfig {
            x_max: 1e19,
            ..Default::default()
        };
        assert!(matches!(
            config.solver_params(),
            Err(ConfigError::GridTooLarge { .. })
        ));

        // Per-axis count is fine but the square grid is too big
        let config = SimConfig {
            x_max: 4096.0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::GridTooLarge { nx: 4097, ny: 4097 })
        );
    }

    #[test]
    fn test_inverted_extent_rejected() {
        let config = SimConfig {
            x_min: 10.0,
            x_max: 0.0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidExtent(-10.0)));
    }
}
