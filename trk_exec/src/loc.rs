//! # Localisation data
//!
//! The controller does not localise itself, it caches the latest odometry it
//! is given. This module provides the pose and velocity types built from that
//! odometry.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::warn;
use serde::Serialize;
use nalgebra::{Quaternion, UnitQuaternion, Vector3};

use comms_if::eqpt::odom::OdomMsg;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The current pose (position and attitude in the world frame) of the robot.
///
/// The default pose sits at the origin facing along the world X axis, which
/// is what the controller assumes before any odometry has arrived.
#[derive(Debug, Copy, Clone, Serialize, Default, PartialEq)]
pub struct Pose {

    /// The position in the world frame
    pub position_m: Vector3<f64>,

    /// The attitude of the robot in the world frame.
    pub attitude_q: UnitQuaternion<f64>
}

/// The current velocity of the robot.
#[derive(Debug, Copy, Clone, Serialize, Default, PartialEq)]
pub struct Velocity {
    /// Linear velocity vector
    pub linear_ms: Vector3<f64>
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Pose {

    /// Build a pose from the position and `[x, y, z, w]` quaternion in an
    /// odometry message.
    ///
    /// A quaternion which cannot be normalised (zero or non-finite norm) is
    /// replaced by the identity attitude.
    pub fn from_odom(odom: &OdomMsg) -> Self {
        let [x, y, z, w] = odom.orientation_q;
        let q = Quaternion::new(w, x, y, z);

        let attitude_q = if q.norm() > f64::EPSILON && q.norm().is_finite() {
            UnitQuaternion::from_quaternion(q)
        }
        else {
            warn!(
                "Odometry orientation {:?} cannot be normalised, using identity",
                odom.orientation_q
            );
            UnitQuaternion::identity()
        };

        Self {
            position_m: Vector3::from(odom.position_m),
            attitude_q
        }
    }

    /// Return the heading (yaw, angle to the positive world X axis) of the
    /// robot in radians, in the range [-pi, pi].
    pub fn get_heading(&self) -> f64 {
        self.attitude_q.euler_angles().2
    }

    /// Return the `(roll, pitch)` of the robot in radians. These are carried
    /// for completeness, tracking only works on the XY plane.
    pub fn get_roll_pitch(&self) -> (f64, f64) {
        let (roll, pitch, _) = self.attitude_q.euler_angles();
        (roll, pitch)
    }
}

impl Velocity {

    /// Take the linear velocity out of an odometry message.
    pub fn from_odom(odom: &OdomMsg) -> Self {
        Self {
            linear_ms: Vector3::from(odom.linear_vel_ms)
        }
    }

    /// Scalar speed, the euclidian norm of the linear velocity.
    pub fn speed_ms(&self) -> f64 {
        self.linear_ms.norm()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_pose_from_odom() {
        // Quarter turn about Z: [0, 0, sin(pi/4), cos(pi/4)]
        let s = (FRAC_PI_2 / 2.0).sin();
        let odom = OdomMsg {
            world_frame_id: "world".into(),
            robot_frame_id: "base_link".into(),
            position_m: [1.0, 2.0, 3.0],
            orientation_q: [0.0, 0.0, s, s],
            linear_vel_ms: [3.0, 4.0, 0.0],
        };

        let pose = Pose::from_odom(&odom);
        assert_eq!(pose.position_m, Vector3::new(1.0, 2.0, 3.0));
        assert!((pose.get_heading() - FRAC_PI_2).abs() < 1e-9);

        let (roll, pitch) = pose.get_roll_pitch();
        assert!(roll.abs() < 1e-9 && pitch.abs() < 1e-9);

        assert!((Velocity::from_odom(&odom).speed_ms() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_orientation_falls_back_to_identity() {
        let odom = OdomMsg {
            world_frame_id: "world".into(),
            robot_frame_id: "base_link".into(),
            position_m: [1.0, 0.0, 0.0],
            orientation_q: [0.0, 0.0, 0.0, 0.0],
            linear_vel_ms: [0.0; 3],
        };

        let pose = Pose::from_odom(&odom);
        assert_eq!(pose.attitude_q, UnitQuaternion::identity());
        assert_eq!(pose.get_heading(), 0.0);

        let nan_odom = OdomMsg {
            orientation_q: [0.0, 0.0, f64::NAN, 1.0],
            ..odom
        };
        assert_eq!(Pose::from_odom(&nan_odom).get_heading(), 0.0);
    }

    #[test]
    fn test_neutral_defaults() {
        assert_eq!(Pose::default().get_heading(), 0.0);
        assert_eq!(Pose::default().position_m, Vector3::zeros());
        assert_eq!(Velocity::default().speed_ms(), 0.0);
    }
}
