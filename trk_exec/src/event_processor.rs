//! # Event processor module
//!
//! The event processor routes events coming from the script to the tracking
//! controller and to its configuration channel.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::debug;
use serde::Serialize;

// Internal
use comms_if::{eqpt::drive::VelocityCmd, tc::Event};
use trk_lib::{
    path::Path,
    track_ctrl::{ParamStore, TrackCtrl}
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Counters over the whole run, saved into the session at exit.
#[derive(Debug, Default, Serialize)]
pub(crate) struct RunStats {
    pub num_odom_events: u64,
    pub num_path_events: u64,
    pub num_cmds: u64,
    pub num_aborted_cycles: u64,
    pub num_configs_queued: u64,
    pub num_configs_rejected: u64,
    pub last_cmd: Option<VelocityCmd>
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Execute an event.
///
/// Returns the command produced if the event was a path that could be
/// tracked.
pub(crate) fn exec(
    track_ctrl: &mut TrackCtrl,
    param_store: &ParamStore,
    stats: &mut RunStats,
    event: &Event
) -> Option<VelocityCmd> {

    match event {
        Event::Odometry(odom) => {
            stats.num_odom_events += 1;
            track_ctrl.on_odometry(odom);
            None
        },
        Event::Config(config) => {
            match param_store.push(*config) {
                Ok(_) => {
                    debug!("Recieved configuration update, will apply next cycle");
                    stats.num_configs_queued += 1;
                },
                Err(e) => {
                    debug!("Configuration update ignored: {}", e);
                    stats.num_configs_rejected += 1;
                }
            }
            None
        },
        Event::Path(msg) => {
            stats.num_path_events += 1;
            match track_ctrl.on_path(&Path::from(msg)) {
                Ok(cmd) => {
                    stats.num_cmds += 1;
                    stats.last_cmd = Some(cmd);
                    Some(cmd)
                },
                Err(e) => {
                    debug!("No command for path event: {}", e);
                    stats.num_aborted_cycles += 1;
                    None
                }
            }
        }
    }
}
