//! # Path messages

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Serialize, Deserialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A planned path, ordered front-to-back in the direction of travel.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PathMsg {
    /// The poses making up the path
    pub poses: Vec<PathPoseMsg>,
}

/// A single pose on a planned path.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq)]
pub struct PathPoseMsg {
    /// Position of the pose in the world frame.
    ///
    /// Units: meters
    pub position_m: [f64; 3],

    /// Optional attitude of the pose as a quaternion `[x, y, z, w]`. Not used for tracking.
    #[serde(default)]
    pub orientation_q: Option<[f64; 4]>,
}
