//! # Tracking library.
//!
//! This library allows other crates in the workspace, and the integration
//! tests, to access items defined inside the tracking executable crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Localisation data - the pose and velocity cached from odometry
pub mod loc;

/// Path - the planned path the robot is asked to follow
pub mod path;

/// Tracking control module - keeps the robot on the given path
pub mod track_ctrl;
