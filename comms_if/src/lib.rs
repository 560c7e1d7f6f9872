//! # Communications interface crate.
//!
//! Provides all common interfaces between the tracking controller and the equipment and
//! processes that surround it.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Commands and data exchanged with equipment (drivetrain, odometry source)
pub mod eqpt;

/// Events which drive the tracking controller
pub mod tc;
