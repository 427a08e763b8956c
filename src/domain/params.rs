//! Parameters - scalar configuration shared by every stage
//!
//! Loaded from / dumped to JSON the same way content bundles are, and
//! validated before it ever reaches the kernels.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stability limit: tau must stay strictly above this
pub const MIN_TAU: f32 = 0.5;
/// Inflow speeds at or above this (lattice units) are rejected
pub const MAX_INFLOW: f32 = 0.3;

pub const DEFAULT_WIDTH: u32 = 400;
pub const DEFAULT_HEIGHT: u32 = 160;
pub const DEFAULT_VISCOSITY: f32 = 0.02;
pub const DEFAULT_INFLOW: f32 = 0.1;
pub const DEFAULT_STEPS_PER_FRAME: u32 = 20;

/// tau = 3ν + 0.5
#[inline]
pub fn tau_from_viscosity(viscosity: f32) -> f32 {
    3.0 * viscosity + 0.5
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisualizationMode {
    Density,
    #[default]
    Speed,
    Curl,
    Schlieren,
}

impl VisualizationMode {
    /// Numeric id used by the JS side (0 density, 1 speed, 2 curl, 3 schlieren)
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(VisualizationMode::Density),
            1 => Some(VisualizationMode::Speed),
            2 => Some(VisualizationMode::Curl),
            3 => Some(VisualizationMode::Schlieren),
            _ => None,
        }
    }

    pub fn id(self) -> u8 {
        match self {
            VisualizationMode::Density => 0,
            VisualizationMode::Speed => 1,
            VisualizationMode::Curl => 2,
            VisualizationMode::Schlieren => 3,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Parameters {
    pub grid_width: u32,
    pub grid_height: u32,
    pub tau: f32,
    pub inflow_velocity: f32,
    pub no_slip: bool,
    pub visualization_mode: VisualizationMode,
    pub steps_per_frame: u32,
}

impl Default for Parameters {
    fn default() -> Self {
        Parameters {
            grid_width: DEFAULT_WIDTH,
            grid_height: DEFAULT_HEIGHT,
            tau: tau_from_viscosity(DEFAULT_VISCOSITY),
            inflow_velocity: DEFAULT_INFLOW,
            no_slip: false,
            visualization_mode: VisualizationMode::default(),
            steps_per_frame: DEFAULT_STEPS_PER_FRAME,
        }
    }
}

impl Parameters {
    /// Default parameters on a `width x height` grid
    pub fn with_grid(width: u32, height: u32) -> Self {
        Parameters {
            grid_width: width,
            grid_height: height,
            ..Parameters::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ParamError> {
        let params: Parameters =
            serde_json::from_str(json).map_err(|e| ParamError::Json(e.to_string()))?;
        params.validate()?;
        Ok(params)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn validate(&self) -> Result<(), ParamError> {
        check_grid(self.grid_width, self.grid_height)?;
        check_tau(self.tau)?;
        check_inflow(self.inflow_velocity)?;
        check_steps_per_frame(self.steps_per_frame)?;
        Ok(())
    }

    #[inline]
    pub fn viscosity(&self) -> f32 {
        (self.tau - 0.5) / 3.0
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        (self.grid_width as usize) * (self.grid_height as usize)
    }
}

pub(crate) fn check_grid(width: u32, height: u32) -> Result<(), ParamError> {
    if width == 0 || height == 0 {
        return Err(ParamError::InvalidGrid { width, height });
    }
    Ok(())
}

pub(crate) fn check_tau(tau: f32) -> Result<(), ParamError> {
    if !tau.is_finite() || tau <= MIN_TAU {
        return Err(ParamError::InvalidTau(tau));
    }
    Ok(())
}

pub(crate) fn check_inflow(inflow: f32) -> Result<(), ParamError> {
    if !inflow.is_finite() || inflow.abs() >= MAX_INFLOW {
        return Err(ParamError::InvalidInflow(inflow));
    }
    Ok(())
}

pub(crate) fn check_steps_per_frame(steps: u32) -> Result<(), ParamError> {
    if steps == 0 {
        return Err(ParamError::InvalidStepsPerFrame);
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq)]
pub enum ParamError {
    InvalidGrid { width: u32, height: u32 },
    InvalidTau(f32),
    InvalidViscosity(f32),
    InvalidInflow(f32),
    InvalidStepsPerFrame,
    UnknownMode(u8),
    MaskSize { expected: usize, actual: usize },
    Json(String),
}

impl fmt::Display for ParamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamError::InvalidGrid { width, height } => {
                write!(f, "grid must be at least 1x1, got {}x{}", width, height)
            }
            ParamError::InvalidTau(tau) => {
                write!(f, "tau must be finite and above {}, got {}", MIN_TAU, tau)
            }
            ParamError::InvalidViscosity(nu) => {
                write!(f, "viscosity must be finite and positive, got {}", nu)
            }
            ParamError::InvalidInflow(u) => {
                write!(f, "inflow speed must be finite and below {}, got {}", MAX_INFLOW, u)
            }
            ParamError::InvalidStepsPerFrame => write!(f, "steps per frame must be at least 1"),
            ParamError::UnknownMode(id) => write!(f, "unknown visualization mode {}", id),
            ParamError::MaskSize { expected, actual } => {
                write!(f, "mask has {} cells, grid has {}", actual, expected)
            }
            ParamError::Json(msg) => write!(f, "invalid parameters json: {}", msg),
        }
    }
}

impl std::error::Error for ParamError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let params = Parameters::default();
        assert!(params.validate().is_ok());
        assert!((params.tau - 0.56).abs() < 1e-6);
        assert!((params.viscosity() - DEFAULT_VISCOSITY).abs() < 1e-6);
    }

    #[test]
    fn rejects_unstable_or_degenerate_settings() {
        let mut params = Parameters::default();
        params.tau = 0.5;
        assert_eq!(params.validate(), Err(ParamError::InvalidTau(0.5)));

        let mut params = Parameters::default();
        params.grid_height = 0;
        assert!(matches!(params.validate(), Err(ParamError::InvalidGrid { .. })));

        let mut params = Parameters::default();
        params.inflow_velocity = -0.3;
        assert_eq!(params.validate(), Err(ParamError::InvalidInflow(-0.3)));

        let mut params = Parameters::default();
        params.steps_per_frame = 0;
        assert_eq!(params.validate(), Err(ParamError::InvalidStepsPerFrame));
    }

    #[test]
    fn json_fills_missing_fields_with_defaults() {
        let params = Parameters::from_json(
            r#"{"gridWidth": 64, "gridHeight": 32, "visualizationMode": "curl", "noSlip": true}"#,
        )
        .unwrap();
        assert_eq!(params.grid_width, 64);
        assert_eq!(params.grid_height, 32);
        assert_eq!(params.visualization_mode, VisualizationMode::Curl);
        assert!(params.no_slip);
        assert_eq!(params.steps_per_frame, DEFAULT_STEPS_PER_FRAME);
    }

    #[test]
    fn json_is_validated() {
        let err = Parameters::from_json(r#"{"tau": 0.4}"#).unwrap_err();
        assert_eq!(err, ParamError::InvalidTau(0.4));

        let err = Parameters::from_json("{not json").unwrap_err();
        assert!(matches!(err, ParamError::Json(_)));
    }

    #[test]
    fn mode_ids_round_trip() {
        for id in 0..4 {
            assert_eq!(VisualizationMode::from_id(id).unwrap().id(), id);
        }
        assert_eq!(VisualizationMode::from_id(4), None);
    }
}
