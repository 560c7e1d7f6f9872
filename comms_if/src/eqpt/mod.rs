//! # Equipment Interface
//!
//! This module defines the interface structures which are exchanged with equipment, either the
//! odometry source feeding the controller or the drivetrain consuming its commands.

// -----------------------------------------------------------------------------------------------
// MODULES
// -----------------------------------------------------------------------------------------------

pub mod drive;
pub mod odom;
