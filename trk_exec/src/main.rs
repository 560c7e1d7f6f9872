//! Main path tracking executable entry point.
//! 
//! # Architecture
//! 
//! The general execution methodology consists of:
//! 
//!     - Initialise the session, logging and parameters
//!     - Initialise tracking control
//!     - Main loop:
//!         - Collect events which are due from the event script
//!         - Route odometry to tracking control, configuration to the
//!           parameter store and paths to a control cycle
//!         - Hand produced commands to the drivetrain (logged)
//!     - Save run statistics into the session

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod event_processor;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, warn};
use std::fs;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};
use color_eyre::{Report, eyre::{WrapErr, eyre}};
use structopt::StructOpt;

// Internal
use event_processor::RunStats;
use trk_lib::track_ctrl::{Params, TrackCtrl};
use util::{
    logger::{logger_init, LevelFilter},
    module::State,
    session::{self, Session},
    script_interpreter::{ScriptInterpreter, PendingEvents},
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Path tracking controller, driven by an event script.
#[derive(Debug, StructOpt)]
#[structopt(name = "trk_exec")]
struct Opt {
    /// The event script to replay
    #[structopt(parse(from_os_str))]
    script: PathBuf,

    /// Parameter file, relative to `$TRK_SW_ROOT/params` unless absolute
    #[structopt(short, long, default_value = "trk_ctrl.toml")]
    params: String,

    /// Target period of one main loop cycle in seconds
    #[structopt(long, default_value = "0.1")]
    cycle_period: f64,

    /// Replay events back to back without waiting for their scripted times
    #[structopt(long)]
    fast: bool,

    /// Log at trace level rather than debug
    #[structopt(short, long)]
    verbose: bool,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {

    color_eyre::install()?;

    let opt = Opt::from_args();

    if !(opt.cycle_period.is_finite() && opt.cycle_period > 0.0) {
        return Err(eyre!(
            "Expected a positive cycle period, found {}", opt.cycle_period
        ));
    }

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new(
        "trk_exec", 
        "sessions"
    ).wrap_err("Failed to create the session")?;

    // Initialise logger
    let log_level = if opt.verbose { LevelFilter::Trace } else { LevelFilter::Debug };
    logger_init(log_level, &session)
        .wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Path Tracking Executable\n");
    info!("Session directory: {:?}\n", session.session_root);
    debug!("CLI arguments: {:?}", opt);

    // ---- LOAD PARAMETERS ----

    let params: Params = if PathBuf::from(&opt.params).is_absolute() {
        util::params::load_from(&opt.params)
    }
    else {
        util::params::load(&opt.params)
    }.wrap_err_with(|| format!("Could not load parameters from {}", opt.params))?;

    info!("Parameters loaded");

    // ---- INITIALISE MODULES ----

    let mut track_ctrl = TrackCtrl::init(params, Some(&session))
        .wrap_err("Failed to initialise TrackCtrl")?;
    let param_store = track_ctrl.param_store();
    info!("TrackCtrl init complete");

    // ---- LOAD SCRIPT ----

    info!("Loading script from {:?}", opt.script);

    let mut script = ScriptInterpreter::new(&opt.script)
        .wrap_err("Failed to load script")?;

    info!(
        "Loaded script lasts {:.02} s and contains {} events\n",
        script.get_duration(),
        script.get_num_events()
    );

    // ---- MAIN LOOP ----

    let mut stats = RunStats::default();
    let cycle_period = Duration::from_secs_f64(opt.cycle_period);
    let script_start_s = session::get_elapsed_seconds();

    info!("Initialisation complete, entering main loop");

    loop {

        let cycle_start_instant = Instant::now();

        // ---- EVENT ACQUISITION ----

        let events = if opt.fast {
            match script.next_event() {
                Some((_, e)) => vec![e],
                None => {
                    info!("End of event script reached, stopping");
                    break
                }
            }
        }
        else {
            match script.get_pending_events(
                session::get_elapsed_seconds() - script_start_s
            ) {
                PendingEvents::None => vec![],
                PendingEvents::Some(v) => v,
                PendingEvents::EndOfScript => {
                    info!("End of event script reached, stopping");
                    break
                }
            }
        };

        // ---- EVENT PROCESSING ----

        for event in events.iter() {
            let cmd = event_processor::exec(
                &mut track_ctrl, &param_store, &mut stats, event
            );

            // ---- DRIVETRAIN OUTPUT ----

            if let Some(cmd) = cmd {
                info!(
                    "VelocityCmd: linear {:+.3} m/s, angular {:+.3} rad/s",
                    cmd.linear_ms, cmd.angular_rads
                );
            }
        }

        // ---- CYCLE MANAGEMENT ----

        if opt.fast {
            continue;
        }

        let cycle_dur = Instant::now() - cycle_start_instant;

        // Get sleep duration
        match cycle_period.checked_sub(cycle_dur) {
            Some(d) => thread::sleep(d),
            None => warn!(
                "Cycle overran by {:.06} s", 
                cycle_dur.as_secs_f64() - cycle_period.as_secs_f64()
            )
        }
    }

    // ---- SHUTDOWN ----

    info!(
        "Processed {} path events producing {} commands ({} aborted), {} odometry events, \
        {} configuration updates ({} rejected)",
        stats.num_path_events,
        stats.num_cmds,
        stats.num_aborted_cycles,
        stats.num_odom_events,
        stats.num_configs_queued + stats.num_configs_rejected,
        stats.num_configs_rejected
    );

    let stats_path = session.session_root.join("run_stats.json");
    fs::write(&stats_path, serde_json::to_string_pretty(&stats)?)
        .wrap_err("Could not save run statistics")?;

    info!("End of execution");

    Ok(())
}
