//! Tracking control parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// Internal
use comms_if::tc::track_ctrl::CtrlConfig;
use super::{
    param_store,
    DEFAULT_LOOKAHEAD_DIST_M, DEFAULT_PID_DT_S,
    DEFAULT_PID_MIN_OUTPUT, DEFAULT_PID_MAX_OUTPUT
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for tracking control
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Params {

    /// Fixed integration interval of the speed controller.
    ///
    /// Units: seconds
    pub pid_dt_s: f64,

    /// Speed demand minimum limit
    ///
    /// Units: meters/second
    pub pid_min_output: f64,

    /// Speed demand maximum limit
    ///
    /// Units: meters/second
    pub pid_max_output: f64,

    /// Tunable configuration used until the first one is pushed
    pub initial_config: CtrlConfig
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            pid_dt_s: DEFAULT_PID_DT_S,
            pid_min_output: DEFAULT_PID_MIN_OUTPUT,
            pid_max_output: DEFAULT_PID_MAX_OUTPUT,
            initial_config: CtrlConfig {
                target_speed_ms: 0.5,
                k_p: 0.15,
                k_i: 0.01,
                k_d: 0.0,
                lookahead_dist_m: DEFAULT_LOOKAHEAD_DIST_M
            }
        }
    }
}

impl Params {

    /// Check the parameters are usable, returning a description of the first
    /// problem found.
    pub fn validate(&self) -> Result<(), String> {
        if !self.pid_dt_s.is_finite() || self.pid_dt_s <= 0.0 {
            return Err(format!(
                "pid_dt_s must be positive, got {}", self.pid_dt_s
            ))
        }

        if !(self.pid_min_output < self.pid_max_output) {
            return Err(format!(
                "pid_min_output ({}) must be less than pid_max_output ({})",
                self.pid_min_output, self.pid_max_output
            ))
        }

        param_store::validate(&self.initial_config)
            .map_err(|e| format!("initial_config: {}", e))
    }
}
