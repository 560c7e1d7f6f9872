//! # Tracking control configuration

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Serialize, Deserialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// The live-tunable configuration of the tracking controller.
///
/// A configuration is always applied as a whole, there are no partial updates.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq)]
pub struct CtrlConfig {
    /// The forward speed the controller will try to hold.
    ///
    /// Units: meters/second
    pub target_speed_ms: f64,

    /// Speed controller proportional gain
    pub k_p: f64,

    /// Speed controller integral gain
    pub k_i: f64,

    /// Speed controller derivative gain
    pub k_d: f64,

    /// Pure pursuit lookahead distance, must be positive.
    ///
    /// Units: meters
    pub lookahead_dist_m: f64,
}
