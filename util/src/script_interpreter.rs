//! # Event script interpreter module
//!
//! This module provides an interpreter for event scripts, allowing recorded
//! or hand-written odometry, path and configuration events to be replayed
//! into the controller.
//!
//! A script is a sequence of entries of the form `<time_s>: <json>;`, where
//! the JSON is an [`Event`] packet. Entries must be ordered by time.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::fs;
use regex::RegexBuilder;
use thiserror::Error;

// Internal
use comms_if::tc::{Event, EventParseError};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An event which is scripted to occur at a specific time.
struct ScriptedEvent {
    /// The time the event is supposed to be delivered at
    exec_time_s: f64,

    event: Event
}

/// A script interpreter.
///
/// After initialising with the path to the script to run use
/// `.get_pending_events` to acquire a list of events that are now due.
pub struct ScriptInterpreter {
    _script_path: Option<PathBuf>,
    events: VecDeque<ScriptedEvent>
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Could not find the script at {0:?}")]
    ScriptNotFound(PathBuf),

    #[error("Could not load the script: {0}")]
    ScriptLoadError(std::io::Error),

    #[error("The script is empty (or is so bad it can't be read)")]
    ScriptEmpty,

    #[error("Could not build the script pattern: {0}")]
    PatternError(regex::Error),

    #[error(
        "Script contains an invalid timestamp: {0}. \
        Should be a float (like 1.0)")]
    InvalidTimestamp(String),

    #[error("Script entry at {0} s is earlier than the entry before it")]
    OutOfOrder(f64),

    #[error("Script contains an invalid event at {0} s: {1}")]
    InvalidEvent(f64, EventParseError)
}

pub enum PendingEvents {
    None,
    Some(Vec<Event>),
    EndOfScript
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ScriptInterpreter {

    /// Create a new interpreter from the given script path.
    pub fn new<P: AsRef<Path>>(script_path: P) -> Result<Self, ScriptError> {

        // Get the path in a buffer
        let path = PathBuf::from(script_path.as_ref());
        
        // Check that the script file exists.
        if !path.exists() {
            return Err(ScriptError::ScriptNotFound(path));
        }

        // Load the script into a string
        let script = fs::read_to_string(&path)
            .map_err(ScriptError::ScriptLoadError)?;

        let mut si = Self::from_str(&script)?;
        si._script_path = Some(path);

        Ok(si)
    }

    /// Create a new interpreter from the contents of a script.
    pub fn from_str(script: &str) -> Result<Self, ScriptError> {

        // Empty queue of events
        let mut queue: VecDeque<ScriptedEvent> = VecDeque::new();

        // Go through the script executing __the magic regex__.
        let re = RegexBuilder::
            new(r"^\s*(\d+(\.\d+)?)\s*:\s*([^;]*);")
            .multi_line(true)
            .build()
            .map_err(ScriptError::PatternError)?;

        for cap in re.captures_iter(script) {
            // Parse the exec time
            let exec_time_s: f64 = cap[1].parse()
                .map_err(|e| ScriptError::InvalidTimestamp(format!("{}", e)))?;

            if let Some(prev) = queue.back() {
                if exec_time_s < prev.exec_time_s {
                    return Err(ScriptError::OutOfOrder(exec_time_s))
                }
            }

            // Parse the event from the payload. The scripts contain JSON only.
            let event = Event::from_json(&cap[3])
                .map_err(|e| ScriptError::InvalidEvent(exec_time_s, e))?;

            queue.push_back(ScriptedEvent {
                exec_time_s,
                event
            });
        }

        if queue.is_empty() {
            return Err(ScriptError::ScriptEmpty)
        }

        Ok(ScriptInterpreter {
            _script_path: None,
            events: queue
        })
    }

    /// Return all events due at or before `current_time_s`, in script order.
    pub fn get_pending_events(&mut self, current_time_s: f64) -> PendingEvents {

        // If the queue is empty the script is over and we return the end of
        // script variant
        if self.events.is_empty() {
            return PendingEvents::EndOfScript
        }

        let mut event_vec: Vec<Event> = vec![];

        // Pop events from the queue while the head is due
        while let Some(head) = self.events.front() {
            if head.exec_time_s > current_time_s {
                break;
            }
            if let Some(e) = self.events.pop_front() {
                event_vec.push(e.event);
            }
        }

        if event_vec.is_empty() {
            PendingEvents::None
        }
        else {
            PendingEvents::Some(event_vec)
        }
    }

    /// Pop the next event regardless of its time, with its scripted time.
    pub fn next_event(&mut self) -> Option<(f64, Event)> {
        self.events.pop_front().map(|e| (e.exec_time_s, e.event))
    }

    /// Get the number of events remaining in the script
    pub fn get_num_events(&self) -> usize {
        self.events.len()
    }

    /// Get the length of the script in seconds
    pub fn get_duration(&self) -> f64 {
        match self.events.back() {
            Some(e) => e.exec_time_s,
            None => 0f64
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use comms_if::tc::EventType;

    const SCRIPT: &str = r#"
        0.0: {"type": "CONFIG", "payload": {
            "target_speed_ms": 0.5, "k_p": 1.0, "k_i": 0.0, "k_d": 0.0,
            "lookahead_dist_m": 1.5
        }};
        0.0: {"type": "ODOM", "payload": {"position_m": [0.0, 0.0, 0.0]}};
        0.5: {"type": "PATH", "payload": {"poses": [{"position_m": [1.0, 0.0, 0.0]}]}};
        1.25: {"type": "PATH", "payload": {"poses": [{"position_m": [2.0, 0.0, 0.0]}]}};
    "#;

    #[test]
    fn test_pending_events() {
        let mut si = ScriptInterpreter::from_str(SCRIPT).unwrap();

        assert_eq!(si.get_num_events(), 4);
        assert_eq!(si.get_duration(), 1.25);

        match si.get_pending_events(0.1) {
            PendingEvents::Some(v) => {
                let types: Vec<EventType> = v.iter().map(|e| e.event_type()).collect();
                assert_eq!(types, vec![EventType::Config, EventType::Odometry]);
            },
            _ => panic!("Expected two events")
        }

        assert!(matches!(si.get_pending_events(0.2), PendingEvents::None));
        assert!(matches!(si.get_pending_events(2.0), PendingEvents::Some(ref v) if v.len() == 2));
        assert!(matches!(si.get_pending_events(3.0), PendingEvents::EndOfScript));
    }

    #[test]
    fn test_next_event() {
        let mut si = ScriptInterpreter::from_str(SCRIPT).unwrap();
        let mut times = vec![];
        while let Some((t, _)) = si.next_event() {
            times.push(t);
        }
        assert_eq!(times, vec![0.0, 0.0, 0.5, 1.25]);
    }

    #[test]
    fn test_script_errors() {
        assert!(matches!(
            ScriptInterpreter::from_str("nothing to see here"),
            Err(ScriptError::ScriptEmpty)
        ));
        assert!(matches!(
            ScriptInterpreter::from_str(r#"0.0: {"type": "NOPE", "payload": {}};"#),
            Err(ScriptError::InvalidEvent(_, _))
        ));
        assert!(matches!(
            ScriptInterpreter::from_str(
                r#"1.0: {"type": "ODOM", "payload": {"position_m": [0, 0, 0]}};
                   0.5: {"type": "ODOM", "payload": {"position_m": [0, 0, 0]}};"#
            ),
            Err(ScriptError::OutOfOrder(_))
        ));
        assert!(matches!(
            ScriptInterpreter::new("/definitely/not/a/script.trk"),
            Err(ScriptError::ScriptNotFound(_))
        ));
    }
}
