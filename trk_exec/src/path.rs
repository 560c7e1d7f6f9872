//! # Path
//!
//! This module defines the path the controller tracks.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector3;

use comms_if::tc::path::PathMsg;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A path defining the desired trajectory of the robot.
///
/// Points are ordered front-to-back in the direction of travel, and that
/// order is significant for target selection.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    pub points_m: Vec<Vector3<f64>>,
}

// -----------------------------------------------------------------------------------------------
// ENUMS
// -----------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PathError {
    #[error("The path contains no points")]
    EmptyPath,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Path {
    /// Create a new empty path
    pub fn new_empty() -> Self {
        Path {
            points_m: Vec::new(),
        }
    }

    /// Create a path on the XY plane from a list of `(x, y)` points.
    pub fn from_xy(points: &[(f64, f64)]) -> Self {
        Path {
            points_m: points
                .iter()
                .map(|&(x, y)| Vector3::new(x, y, 0.0))
                .collect(),
        }
    }

    /// Get the number of points in the path
    pub fn get_num_points(&self) -> usize {
        self.points_m.len()
    }

    /// The final point of the path
    pub fn last(&self) -> Result<&Vector3<f64>, PathError> {
        self.points_m.last().ok_or(PathError::EmptyPath)
    }
}

impl From<&PathMsg> for Path {
    /// Positions are kept, any orientation in the message is dropped.
    fn from(msg: &PathMsg) -> Self {
        Path {
            points_m: msg
                .poses
                .iter()
                .map(|p| Vector3::from(p.position_m))
                .collect(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use comms_if::tc::path::PathPoseMsg;

    #[test]
    fn test_from_msg_keeps_order() {
        let msg = PathMsg {
            poses: vec![
                PathPoseMsg { position_m: [3.0, 0.0, 0.0], orientation_q: None },
                PathPoseMsg { position_m: [1.0, 1.0, 0.5], orientation_q: Some([0.0, 0.0, 0.0, 1.0]) },
            ],
        };

        let path = Path::from(&msg);
        assert_eq!(path.get_num_points(), 2);
        assert_eq!(path.points_m[0], Vector3::new(3.0, 0.0, 0.0));
        assert_eq!(*path.last().unwrap(), Vector3::new(1.0, 1.0, 0.5));
    }

    #[test]
    fn test_empty_last() {
        assert_eq!(Path::new_empty().last(), Err(PathError::EmptyPath));
    }
}
