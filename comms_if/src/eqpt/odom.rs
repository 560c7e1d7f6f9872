//! # Odometry Equipment Data

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// An odometry update from the localisation source.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OdomMsg {
    /// The frame the pose is expressed in
    #[serde(default = "default_world_frame")]
    pub world_frame_id: String,

    /// The frame attached to the robot body
    #[serde(default = "default_robot_frame")]
    pub robot_frame_id: String,

    /// Position of the robot in the world frame.
    ///
    /// Units: meters
    pub position_m: [f64; 3],

    /// Attitude of the robot in the world frame as a quaternion, ordered `[x, y, z, w]`.
    #[serde(default = "default_orientation")]
    pub orientation_q: [f64; 4],

    /// Linear velocity of the robot.
    ///
    /// Units: meters/second
    #[serde(default)]
    pub linear_vel_ms: [f64; 3],
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Frame id assumed for the world until odometry says otherwise.
pub fn default_world_frame() -> String {
    String::from("world")
}

/// Frame id assumed for the robot body until odometry says otherwise.
pub fn default_robot_frame() -> String {
    String::from("base_link")
}

fn default_orientation() -> [f64; 4] {
    [0.0, 0.0, 0.0, 1.0]
}
