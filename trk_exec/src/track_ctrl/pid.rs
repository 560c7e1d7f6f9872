//! # Speed controller
//!
//! This module provides the PID controller used to regulate forward speed.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use util::maths::clamp;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A PID controller with a fixed integration interval and saturated output.
///
/// The interval is not measured between calls, every call to `calculate` is
/// assumed to be exactly `dt_s` after the previous one.
#[derive(Debug, Clone)]
pub struct PidController {
    /// Proportional gain
    k_p: f64,

    /// Integral gain
    k_i: f64,

    /// Dervative gain
    k_d: f64,

    /// Integration interval
    dt_s: f64,

    /// Lower output bound
    min_output: f64,

    /// Upper output bound
    max_output: f64,

    /// Previous error, zero before the first call
    prev_error: f64,

    /// The integral accumulation
    integral: f64
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PidController {

    /// Create a new controller.
    ///
    /// `dt_s` must be positive and `min_output` less than `max_output`, this
    /// is checked when the parameters are loaded rather than here.
    pub fn new(
        dt_s: f64,
        min_output: f64,
        max_output: f64,
        k_p: f64,
        k_i: f64,
        k_d: f64
    ) -> Self {
        Self {
            k_p, k_i, k_d,
            dt_s,
            min_output,
            max_output,
            prev_error: 0f64,
            integral: 0f64
        }
    }

    /// Get the output of the controller for the given setpoint and
    /// measurement.
    pub fn calculate(&mut self, setpoint: f64, measurement: f64) -> f64 {
        let error = setpoint - measurement;

        // Accumulate the integral term over one fixed interval
        self.integral += error * self.dt_s;

        let deriv = (error - self.prev_error) / self.dt_s;

        let out = 
            self.k_p * error 
            + self.k_i * self.integral 
            + self.k_d * deriv;

        self.prev_error = error;

        clamp(&out, &self.min_output, &self.max_output)
    }

    /// Replace all three gains at once.
    ///
    /// The integral and previous error are kept, so new gains act on the
    /// existing history from the next call to `calculate`.
    pub fn update_gains(&mut self, k_p: f64, k_i: f64, k_d: f64) {
        self.k_p = k_p;
        self.k_i = k_i;
        self.k_d = k_d;
    }

    /// The current `(k_p, k_i, k_d)` gains.
    pub fn gains(&self) -> (f64, f64, f64) {
        (self.k_p, self.k_i, self.k_d)
    }

    /// The current integral accumulation.
    pub fn integral(&self) -> f64 {
        self.integral
    }

    /// The error seen on the last call, or zero if never called.
    pub fn prev_error(&self) -> f64 {
        self.prev_error
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
