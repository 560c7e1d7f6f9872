//! # Tracking control module
//!
//! Tracking control keeps the robot moving along the most recent path from the
//! planner. It does this with two independent loops:
//!
//! - Forward speed is held at the target speed by a PID controller on the
//!   measured speed.
//! - Heading follows pure pursuit: a target point one lookahead distance down
//!   the path is selected, and the turn rate is proportional to the angle
//!   between the robot's heading and the bearing to that point.
//!
//! Odometry is cached as it arrives. Each new path runs one control cycle and
//! produces one velocity command. Target speed, gains and lookahead can be
//! changed at run time through the module's `ParamStore`.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod lookahead;
pub mod param_store;
pub mod params;
pub mod pid;
pub mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use lookahead::*;
pub use param_store::{ParamStore, ParamStoreError};
pub use params::Params;
pub use pid::PidController;
pub use state::*;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Proportional gain from heading error to turn rate.
pub const HEADING_GAIN: f64 = 1.9;

/// Default pure pursuit lookahead distance.
///
/// Units: meters
pub const DEFAULT_LOOKAHEAD_DIST_M: f64 = 1.5;

/// Default speed controller integration interval.
///
/// Units: seconds
pub const DEFAULT_PID_DT_S: f64 = 0.1;

/// Default lower bound on the speed demand.
pub const DEFAULT_PID_MIN_OUTPUT: f64 = -1.0;

/// Default upper bound on the speed demand.
pub const DEFAULT_PID_MAX_OUTPUT: f64 = 1.0;
