//! # Drivetrain Equipment Commands

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A velocity demand sent to the drivetrain.
///
/// One of these is produced for every path update the controller recieves.
#[derive(Serialize, Deserialize, Debug, Default, Copy, Clone, PartialEq)]
pub struct VelocityCmd {
    /// The forward speed demand in meters/second.
    ///
    /// Positive speeds are "forwards", negative speeds are "backwards".
    pub linear_ms: f64,

    /// The turn rate demand in radians/second.
    ///
    /// Follows the right hand rule about the robot's Z+ (upwards) axis, so that a positive turn
    /// rate will rotate the robot to the left.
    pub angular_rads: f64,
}
