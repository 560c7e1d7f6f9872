//! # Parameter store
//!
//! Holds tunable configuration pushed by a configuration channel until the
//! controller picks it up at the start of its next cycle. The store is a
//! cheap handle, clones share the same slot, so a channel running on another
//! thread can push while the controller owns its own handle.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::sync::{Arc, Mutex, MutexGuard};
use log::{debug, warn};
use thiserror::Error;

use comms_if::tc::track_ctrl::CtrlConfig;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Shared store of pending tunable configuration.
#[derive(Debug, Clone, Default)]
pub struct ParamStore {
    pending: Arc<Mutex<Option<CtrlConfig>>>
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq)]
pub enum ParamStoreError {
    #[error("Rejected configuration: {0}")]
    InvalidConfig(String)
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ParamStore {

    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a new configuration.
    ///
    /// Invalid configurations are rejected and leave any pending or applied
    /// configuration untouched. If a configuration is already pending it is
    /// replaced.
    pub fn push(&self, config: CtrlConfig) -> Result<(), ParamStoreError> {
        if let Err(e) = validate(&config) {
            warn!("{}", e);
            return Err(e)
        }

        let mut pending = self.lock();
        if pending.is_some() {
            debug!("Pending configuration superseded before it was applied");
        }
        *pending = Some(config);

        Ok(())
    }

    /// Take the pending configuration, if there is one, clearing it.
    pub fn take_pending(&self) -> Option<CtrlConfig> {
        self.lock().take()
    }

    /// True if a configuration is waiting to be applied.
    pub fn has_pending(&self) -> bool {
        self.lock().is_some()
    }

    fn lock(&self) -> MutexGuard<Option<CtrlConfig>> {
        // A poisoned slot still holds a whole configuration
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Check that a configuration can be applied to the controller.
pub fn validate(config: &CtrlConfig) -> Result<(), ParamStoreError> {
    if !config.lookahead_dist_m.is_finite() || config.lookahead_dist_m <= 0.0 {
        return Err(ParamStoreError::InvalidConfig(format!(
            "lookahead distance must be positive, got {}", config.lookahead_dist_m
        )))
    }

    if !config.target_speed_ms.is_finite() || config.target_speed_ms < 0.0 {
        return Err(ParamStoreError::InvalidConfig(format!(
            "target speed must not be negative, got {}", config.target_speed_ms
        )))
    }

    if !(config.k_p.is_finite() && config.k_i.is_finite() && config.k_d.is_finite()) {
        return Err(ParamStoreError::InvalidConfig(format!(
            "gains must be finite, got ({}, {}, {})", config.k_p, config.k_i, config.k_d
        )))
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use std::thread;

    fn config(target_speed_ms: f64, lookahead_dist_m: f64) -> CtrlConfig {
        CtrlConfig {
            target_speed_ms,
            k_p: 0.5,
            k_i: 0.0,
            k_d: 0.0,
            lookahead_dist_m
        }
    }

    #[test]
    fn test_take_clears_pending() {
        let store = ParamStore::new();
        assert_eq!(store.take_pending(), None);

        store.push(config(1.0, 1.5)).unwrap();
        assert!(store.has_pending());
        assert_eq!(store.take_pending(), Some(config(1.0, 1.5)));
        assert!(!store.has_pending());
        assert_eq!(store.take_pending(), None);
    }

    #[test]
    fn test_last_write_wins() {
        let store = ParamStore::new();
        store.push(config(1.0, 1.5)).unwrap();
        store.push(config(2.0, 1.5)).unwrap();
        store.push(config(3.0, 2.5)).unwrap();

        assert_eq!(store.take_pending(), Some(config(3.0, 2.5)));
        assert_eq!(store.take_pending(), None);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let store = ParamStore::new();
        store.push(config(1.0, 1.5)).unwrap();

        assert!(matches!(
            store.push(config(1.0, -1.0)),
            Err(ParamStoreError::InvalidConfig(_))
        ));
        assert!(store.push(config(1.0, 0.0)).is_err());
        assert!(store.push(config(-0.1, 1.5)).is_err());
        assert!(store.push(config(std::f64::NAN, 1.5)).is_err());

        let mut bad_gain = config(1.0, 1.5);
        bad_gain.k_i = std::f64::INFINITY;
        assert!(store.push(bad_gain).is_err());

        // The earlier valid push is still the one pending
        assert_eq!(store.take_pending(), Some(config(1.0, 1.5)));
    }

    #[test]
    fn test_push_from_other_thread() {
        let store = ParamStore::new();
        let channel = store.clone();

        thread::spawn(move || {
            channel.push(config(0.8, 2.0)).unwrap();
        }).join().unwrap();

        assert_eq!(store.take_pending(), Some(config(0.8, 2.0)));
    }
}
