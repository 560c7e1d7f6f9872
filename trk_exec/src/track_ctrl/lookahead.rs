//! # Lookahead target selection
//!
//! Pure pursuit steers towards a point a fixed distance ahead on the path.
//! The path is scanned in traversal order and the first point at or beyond
//! the lookahead distance is chosen. There is no projection onto the path, so
//! a path folding back on itself may give an earlier far point rather than a
//! later near one.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::Vector3;
use serde::Serialize;

use crate::path::{Path, PathError};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A steering target selected from the path.
#[derive(Debug, Copy, Clone, Serialize, PartialEq)]
pub struct LookaheadTarget {
    /// Index of the target in the path
    pub index: usize,

    /// Position of the target
    pub point_m: Vector3<f64>,

    /// True if no point reached the lookahead distance and the final point
    /// was used instead
    pub is_end_of_path: bool,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Select the steering target on `path` for a robot at `position_m`.
///
/// Returns the first point whose distance from `position_m` is at least
/// `lookahead_dist_m`, or the last point of the path if there isn't one.
pub fn select_target(
    position_m: &Vector3<f64>,
    path: &Path,
    lookahead_dist_m: f64
) -> Result<LookaheadTarget, PathError> {

    let found = path.points_m
        .iter()
        .position(|p| (p - position_m).norm() >= lookahead_dist_m);

    match found {
        Some(index) => Ok(LookaheadTarget {
            index,
            point_m: path.points_m[index],
            is_end_of_path: false
        }),
        None => Ok(LookaheadTarget {
            index: path.get_num_points().saturating_sub(1),
            point_m: *path.last()?,
            is_end_of_path: true
        })
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_first_point_beyond_lookahead() {
        let path = Path::from_xy(&[(1.0, 0.0), (2.0, 0.0), (5.0, 0.0)]);
        let target = select_target(&Vector3::zeros(), &path, 1.5).unwrap();

        assert_eq!(target.index, 1);
        assert_eq!(target.point_m, Vector3::new(2.0, 0.0, 0.0));
        assert!(!target.is_end_of_path);
    }

    #[test]
    fn test_exact_distance_is_selected() {
        let path = Path::from_xy(&[(0.5, 0.0), (1.5, 0.0), (3.0, 0.0)]);
        let target = select_target(&Vector3::zeros(), &path, 1.5).unwrap();
        assert_eq!(target.index, 1);
    }

    #[test]
    fn test_falls_back_to_last_point() {
        let path = Path::from_xy(&[(0.5, 0.0), (1.0, 0.0)]);
        let target = select_target(&Vector3::zeros(), &path, 1.5).unwrap();

        assert_eq!(target.index, 1);
        assert_eq!(target.point_m, Vector3::new(1.0, 0.0, 0.0));
        assert!(target.is_end_of_path);

        // Single point path
        let path = Path::from_xy(&[(0.2, 0.1)]);
        let target = select_target(&Vector3::zeros(), &path, 1.5).unwrap();
        assert_eq!(target.index, 0);
        assert_eq!(target.point_m, Vector3::new(0.2, 0.1, 0.0));
    }

    #[test]
    fn test_empty_path() {
        assert_eq!(
            select_target(&Vector3::zeros(), &Path::new_empty(), 1.5),
            Err(PathError::EmptyPath)
        );
    }

    #[test]
    fn test_distance_is_three_dimensional() {
        // (1, 0, 1.2) is within 1.5 on the plane but not in 3D
        let path = Path {
            points_m: vec![Vector3::new(1.0, 0.0, 1.2), Vector3::new(1.1, 0.0, 0.0)]
        };
        let target = select_target(&Vector3::zeros(), &path, 1.5).unwrap();
        assert_eq!(target.index, 0);
    }

    #[test]
    fn test_folded_path_takes_earliest_far_point() {
        // The path heads away then returns close to the robot
        let path = Path::from_xy(&[(0.5, 0.0), (3.0, 0.0), (3.0, 1.0), (1.6, 0.1)]);
        let target = select_target(&Vector3::zeros(), &path, 1.5).unwrap();
        assert_eq!(target.index, 1);
    }

    #[test]
    fn test_smallest_index_property() {
        let path = Path::from_xy(&[
            (0.1, 0.2), (0.8, -0.4), (1.9, 0.3), (0.4, 0.4), (2.5, 2.5), (0.0, 0.3)
        ]);
        let pos = Vector3::new(0.2, 0.1, 0.0);

        for &d in &[0.05, 0.5, 1.0, 1.5, 2.0, 3.0, 10.0] {
            let target = select_target(&pos, &path, d).unwrap();
            let expected = path.points_m
                .iter()
                .position(|p| (p - pos).norm() >= d)
                .unwrap_or(path.get_num_points() - 1);
            assert_eq!(target.index, expected, "lookahead {}", d);
        }
    }
}
