//! Tracking control module state

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, trace, warn};
use serde::Serialize;

// Internal
use super::*;
use crate::{
    loc::{Pose, Velocity},
    path::{Path, PathError}
};
use comms_if::{
    eqpt::{drive::VelocityCmd, odom::{self, OdomMsg}},
    tc::track_ctrl::CtrlConfig
};
use util::{
    archive::{ArchiveError, Archived, Archiver},
    maths::wrap_to_pi,
    module::State,
    params,
    session::Session
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Tracking control module state
pub struct TrackCtrl {
    params: Params,

    /// Handle on the store configuration channels push into
    param_store: ParamStore,

    /// The configuration currently in use
    config: CtrlConfig,

    /// Forward speed controller
    speed_ctrl: PidController,

    /// Latest odometry
    pose: Pose,
    velocity: Velocity,
    world_frame_id: String,
    robot_frame_id: String,

    /// Number of completed control cycles
    num_cycles: u64,

    report: StatusReport,
    arch_report: Archiver
}

/// The status report containing the quantities computed during a cycle.
#[derive(Debug, Default, Copy, Clone, Serialize)]
pub struct StatusReport {
    /// Index of the cycle this report belongs to
    pub cycle: u64,

    /// True if a pushed configuration was applied at the start of this cycle
    pub config_applied: bool,

    /// Measured forward speed
    pub current_speed_ms: f64,

    /// Target speed minus measured speed
    pub speed_error_ms: f64,

    /// Index of the target point in the path
    pub target_index: usize,

    /// True if no point was beyond the lookahead and the last one was used
    pub target_is_end_of_path: bool,

    /// Target point X coordinate
    pub target_x_m: f64,

    /// Target point Y coordinate
    pub target_y_m: f64,

    /// Bearing from the robot to the target
    pub bearing_rad: f64,

    /// Heading error, in [-pi, pi)
    pub heading_error_rad: f64,

    /// Output linear speed demand
    pub linear_ms: f64,

    /// Output turn rate demand
    pub angular_rads: f64
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Potential errors that can occur during processing of the module.
#[derive(Debug, thiserror::Error)]
pub enum TrackCtrlError {
    #[error("Could not load parameters: {0}")]
    ParamLoadError(params::LoadError),

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("Could not initialise the archive: {0}")]
    ArchiveInitError(ArchiveError),

    /// The path given to a cycle could not be tracked. No command is produced
    /// for that cycle.
    #[error("Cannot track path: {0}")]
    PathError(#[from] PathError)
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for TrackCtrl {
    type InitData = Params;
    type InitError = TrackCtrlError;

    type InputData = Path;
    type OutputData = VelocityCmd;
    type StatusReport = StatusReport;
    type ProcError = TrackCtrlError;

    /// Initialise the TrackCtrl module.
    ///
    /// If a session is given the status report of every cycle is archived
    /// into it.
    fn init(
        params: Params,
        session: Option<&Session>
    ) -> Result<Self, TrackCtrlError> {

        params.validate().map_err(TrackCtrlError::InvalidParams)?;

        let config = params.initial_config;

        let speed_ctrl = PidController::new(
            params.pid_dt_s,
            params.pid_min_output,
            params.pid_max_output,
            config.k_p,
            config.k_i,
            config.k_d
        );

        let arch_report = match session {
            Some(s) => Archiver::from_path(s, "track_ctrl/status_report.csv")
                .map_err(TrackCtrlError::ArchiveInitError)?,
            None => Archiver::default()
        };

        info!(
            "TrackCtrl initialised: target speed {} m/s, gains ({}, {}, {}), lookahead {} m",
            config.target_speed_ms, config.k_p, config.k_i, config.k_d, config.lookahead_dist_m
        );

        Ok(Self {
            params,
            param_store: ParamStore::new(),
            config,
            speed_ctrl,
            pose: Pose::default(),
            velocity: Velocity::default(),
            world_frame_id: odom::default_world_frame(),
            robot_frame_id: odom::default_robot_frame(),
            num_cycles: 0,
            report: StatusReport::default(),
            arch_report
        })
    }

    /// Process one control cycle on a new path.
    ///
    /// Processing involves:
    ///  1. Applying any pending configuration.
    ///  1. Selecting the lookahead target on the path.
    ///  1. Calculating the speed demand from the speed controller.
    ///  1. Calculating the turn rate from the heading error to the target.
    ///
    /// An empty path fails before the speed controller is stepped, leaving
    /// the speed controller, odometry, cycle count and last report as they
    /// were. A pending configuration taken at the start of the cycle stays
    /// applied.
    fn proc(
        &mut self,
        path: &Path
    ) -> Result<(VelocityCmd, StatusReport), TrackCtrlError> {

        // Setup cycle data, only kept if the cycle completes
        let mut report = StatusReport {
            cycle: self.num_cycles,
            ..Default::default()
        };

        // ---- CONFIGURATION ----

        if let Some(config) = self.param_store.take_pending() {
            self.apply_config(config);
            report.config_applied = true;
        }

        // ---- TARGET SELECTION ----

        let target = match select_target(
            &self.pose.position_m, path, self.config.lookahead_dist_m
        ) {
            Ok(t) => t,
            Err(e) => {
                warn!("Cycle {} aborted: {}", self.num_cycles, e);
                return Err(e.into())
            }
        };

        // ---- SPEED CONTROL ----

        let current_speed_ms = self.velocity.speed_ms();
        let linear_ms = self.speed_ctrl.calculate(
            self.config.target_speed_ms, current_speed_ms
        );

        // ---- HEADING CONTROL ----

        let heading_rad = self.pose.get_heading();
        let dx = target.point_m[0] - self.pose.position_m[0];
        let dy = target.point_m[1] - self.pose.position_m[1];

        // Standing on the target gives no bearing, hold the current heading
        let (bearing_rad, heading_error_rad) = if dx == 0.0 && dy == 0.0 {
            (heading_rad, 0.0)
        }
        else {
            let bearing_rad = dy.atan2(dx);
            (bearing_rad, wrap_to_pi(bearing_rad - heading_rad))
        };

        let angular_rads = HEADING_GAIN * heading_error_rad;

        let cmd = VelocityCmd { linear_ms, angular_rads };

        // ---- REPORTING ----

        report.current_speed_ms = current_speed_ms;
        report.speed_error_ms = self.config.target_speed_ms - current_speed_ms;
        report.target_index = target.index;
        report.target_is_end_of_path = target.is_end_of_path;
        report.target_x_m = target.point_m[0];
        report.target_y_m = target.point_m[1];
        report.bearing_rad = bearing_rad;
        report.heading_error_rad = heading_error_rad;
        report.linear_ms = linear_ms;
        report.angular_rads = angular_rads;
        self.report = report;

        debug!(
            "Cycle {}: target #{} ({:.3}, {:.3}), heading error {:.4} rad, cmd {:?}",
            self.num_cycles,
            target.index,
            target.point_m[0],
            target.point_m[1],
            heading_error_rad,
            cmd
        );

        if self.arch_report.is_active() {
            if let Err(e) = self.write() {
                warn!("Could not archive TrackCtrl status report: {}", e);
            }
        }

        self.num_cycles += 1;

        Ok((cmd, self.report))
    }
}

impl Archived for TrackCtrl {
    fn write(&mut self) -> Result<(), ArchiveError> {
        self.arch_report.serialise(self.report)
    }
}

impl TrackCtrl {

    /// Create a module from parameters without archiving.
    pub fn new(params: Params) -> Result<Self, TrackCtrlError> {
        Self::init(params, None)
    }

    /// Create a module from a parameter file relative to the software root's
    /// `params` directory.
    pub fn from_param_file(
        param_file_path: &str,
        session: Option<&Session>
    ) -> Result<Self, TrackCtrlError> {
        let params: Params = params::load(param_file_path)
            .map_err(TrackCtrlError::ParamLoadError)?;

        Self::init(params, session)
    }

    /// Cache new odometry. No command is produced.
    ///
    /// The frame ids are stored for collaborators that need them, they are
    /// not checked.
    pub fn on_odometry(&mut self, odom: &OdomMsg) {
        self.pose = Pose::from_odom(odom);
        self.velocity = Velocity::from_odom(odom);
        self.world_frame_id.clone_from(&odom.world_frame_id);
        self.robot_frame_id.clone_from(&odom.robot_frame_id);

        trace!(
            "Odometry: {:?} in {}, heading {:.4} rad, speed {:.3} m/s",
            self.pose.position_m.as_slice(),
            self.world_frame_id,
            self.pose.get_heading(),
            self.velocity.speed_ms()
        );
    }

    /// Run a control cycle on a new path and return the command for it.
    pub fn on_path(&mut self, path: &Path) -> Result<VelocityCmd, TrackCtrlError> {
        self.proc(path).map(|(cmd, _)| cmd)
    }

    /// Get a handle on the store that configuration updates are pushed into.
    pub fn param_store(&self) -> ParamStore {
        self.param_store.clone()
    }

    /// The configuration currently in use.
    pub fn config(&self) -> &CtrlConfig {
        &self.config
    }

    /// The static parameters the module was initialised with.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// The speed controller.
    pub fn speed_ctrl(&self) -> &PidController {
        &self.speed_ctrl
    }

    /// The cached pose.
    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    /// The cached velocity.
    pub fn velocity(&self) -> &Velocity {
        &self.velocity
    }

    /// The world frame id from the latest odometry.
    pub fn world_frame_id(&self) -> &str {
        &self.world_frame_id
    }

    /// The robot frame id from the latest odometry.
    pub fn robot_frame_id(&self) -> &str {
        &self.robot_frame_id
    }

    /// The report from the last successful cycle.
    pub fn report(&self) -> &StatusReport {
        &self.report
    }

    /// Number of cycles that produced a command.
    pub fn num_cycles(&self) -> u64 {
        self.num_cycles
    }

    fn apply_config(&mut self, config: CtrlConfig) {
        self.speed_ctrl.update_gains(config.k_p, config.k_i, config.k_d);
        self.config = config;

        info!(
            "Applied configuration: target speed {} m/s, gains ({}, {}, {}), lookahead {} m",
            config.target_speed_ms, config.k_p, config.k_i, config.k_d, config.lookahead_dist_m
        );
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn odom_at(x: f64, y: f64, heading_rad: f64, vel: [f64; 3]) -> OdomMsg {
        let half = heading_rad / 2.0;
        OdomMsg {
            world_frame_id: "map".into(),
            robot_frame_id: "chassis".into(),
            position_m: [x, y, 0.0],
            orientation_q: [0.0, 0.0, half.sin(), half.cos()],
            linear_vel_ms: vel
        }
    }

    fn p_only(k_p: f64, target_speed_ms: f64) -> Params {
        Params {
            initial_config: CtrlConfig {
                target_speed_ms,
                k_p,
                k_i: 0.0,
                k_d: 0.0,
                lookahead_dist_m: DEFAULT_LOOKAHEAD_DIST_M
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_odometry_is_cached() {
        let mut ctrl = TrackCtrl::new(Params::default()).unwrap();
        assert_eq!(ctrl.world_frame_id(), "world");
        assert_eq!(ctrl.robot_frame_id(), "base_link");

        ctrl.on_odometry(&odom_at(1.0, -2.0, FRAC_PI_2, [0.0, 0.6, 0.8]));

        assert_eq!(ctrl.pose().position_m[1], -2.0);
        assert!((ctrl.pose().get_heading() - FRAC_PI_2).abs() < 1e-9);
        assert!((ctrl.velocity().speed_ms() - 1.0).abs() < 1e-12);
        assert_eq!(ctrl.world_frame_id(), "map");
        assert_eq!(ctrl.robot_frame_id(), "chassis");
        assert_eq!(ctrl.num_cycles(), 0);
    }

    #[test]
    fn test_straight_ahead() {
        let mut ctrl = TrackCtrl::new(p_only(0.5, 1.0)).unwrap();
        let path = Path::from_xy(&[(1.0, 0.0), (2.0, 0.0), (5.0, 0.0)]);

        let (cmd, report) = ctrl.proc(&path).unwrap();
        assert_eq!(report.target_index, 1);
        assert_eq!(report.bearing_rad, 0.0);
        assert_eq!(cmd.angular_rads, 0.0);
        assert!((cmd.linear_ms - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_turn_towards_target() {
        let mut ctrl = TrackCtrl::new(Params::default()).unwrap();

        // Facing +X, target straight to the left
        let path = Path::from_xy(&[(0.0, 2.0)]);
        let (cmd, report) = ctrl.proc(&path).unwrap();
        assert!((report.heading_error_rad - FRAC_PI_2).abs() < 1e-12);
        assert!((cmd.angular_rads - HEADING_GAIN * FRAC_PI_2).abs() < 1e-12);

        // Facing almost -X with the target just across the wrap point, the
        // error must be the short way round
        ctrl.on_odometry(&odom_at(0.0, 0.0, PI - 0.1, [0.0; 3]));
        let path = Path::from_xy(&[(-2.0, -0.2)]);
        let (cmd, report) = ctrl.proc(&path).unwrap();
        assert!(report.heading_error_rad > 0.0 && report.heading_error_rad < 0.5);
        assert!(cmd.angular_rads > 0.0);
    }

    #[test]
    fn test_coincident_target_gives_zero_heading_error() {
        let mut ctrl = TrackCtrl::new(Params::default()).unwrap();
        ctrl.on_odometry(&odom_at(3.0, 4.0, 1.0, [0.0; 3]));

        let path = Path::from_xy(&[(3.0, 4.0)]);
        let (cmd, report) = ctrl.proc(&path).unwrap();
        assert_eq!(report.heading_error_rad, 0.0);
        assert_eq!(cmd.angular_rads, 0.0);
    }

    #[test]
    fn test_empty_path_leaves_state_unchanged() {
        let mut ctrl = TrackCtrl::new(p_only(0.5, 1.0)).unwrap();
        let path = Path::from_xy(&[(2.0, 0.0)]);
        ctrl.proc(&path).unwrap();

        let integral = ctrl.speed_ctrl().integral();
        let prev_error = ctrl.speed_ctrl().prev_error();
        let report = *ctrl.report();

        assert!(matches!(
            ctrl.on_path(&Path::new_empty()),
            Err(TrackCtrlError::PathError(PathError::EmptyPath))
        ));
        assert_eq!(ctrl.speed_ctrl().integral(), integral);
        assert_eq!(ctrl.speed_ctrl().prev_error(), prev_error);
        assert_eq!(ctrl.num_cycles(), 1);

        // The last report still describes the completed cycle
        let after = ctrl.report();
        assert_eq!(after.cycle, report.cycle);
        assert_eq!(after.target_x_m, 2.0);
        assert_eq!(after.target_y_m, report.target_y_m);
        assert_eq!(after.linear_ms, report.linear_ms);
        assert_eq!(after.heading_error_rad, report.heading_error_rad);
    }

    #[test]
    fn test_pushed_config_applied_next_cycle() {
        let mut ctrl = TrackCtrl::new(p_only(0.5, 1.0)).unwrap();
        let store = ctrl.param_store();
        let path = Path::from_xy(&[(1.0, 0.0), (2.0, 0.0), (5.0, 0.0)]);

        store.push(CtrlConfig {
            target_speed_ms: 0.4,
            k_p: 2.0,
            k_i: 0.0,
            k_d: 0.0,
            lookahead_dist_m: 3.0
        }).unwrap();

        // Nothing changes until the next cycle
        assert_eq!(ctrl.config().lookahead_dist_m, DEFAULT_LOOKAHEAD_DIST_M);

        let (cmd, report) = ctrl.proc(&path).unwrap();
        assert!(report.config_applied);
        assert_eq!(report.target_index, 2);
        assert!((cmd.linear_ms - 0.8).abs() < 1e-12);
        assert_eq!(ctrl.speed_ctrl().gains(), (2.0, 0.0, 0.0));

        let (_, report) = ctrl.proc(&path).unwrap();
        assert!(!report.config_applied);
    }

    #[test]
    fn test_cycles_archived_with_session() {
        let root = std::env::temp_dir()
            .join(format!("trk_lib_test_{}", std::process::id()));
        let session = Session::new_in(root.clone(), "trk_test", "sessions")
            .unwrap();

        let mut ctrl = TrackCtrl::init(p_only(0.5, 1.0), Some(&session)).unwrap();
        let path = Path::from_xy(&[(1.0, 0.0), (2.0, 0.0), (5.0, 0.0)]);
        ctrl.on_path(&path).unwrap();
        ctrl.on_path(&path).unwrap();

        // An aborted cycle writes nothing
        assert!(ctrl.on_path(&Path::new_empty()).is_err());

        let csv_path = session.arch_root.join("track_ctrl/status_report.csv");
        let contents = std::fs::read_to_string(&csv_path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("cycle,config_applied,current_speed_ms"));
        assert!(lines[1].starts_with("0,"));
        assert!(lines[2].starts_with("1,"));

        std::fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_invalid_params_rejected() {
        let mut params = Params::default();
        params.pid_dt_s = -0.1;
        assert!(matches!(
            TrackCtrl::new(params),
            Err(TrackCtrlError::InvalidParams(_))
        ));
    }
}
