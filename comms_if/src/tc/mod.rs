//! # Event module
//!
//! This module provides the events which drive the tracking controller. Each event is carried as
//! a JSON packet of the form `{"type": "<TYPE>", "payload": {...}}`.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod path;
pub mod track_ctrl;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Serialize, Deserialize};
use serde_json::{self, Value};
use thiserror::Error;

// Internal
use crate::eqpt::odom::OdomMsg;
use path::PathMsg;
use track_ctrl::CtrlConfig;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// An event delivered to the tracking controller by one of its collaborators.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    /// New odometry from the localisation source
    Odometry(OdomMsg),

    /// New path from the planner
    Path(PathMsg),

    /// New tunable configuration from the configuration channel
    Config(CtrlConfig),
}

/// Event types.
///
/// The type identifies which collaborator the event came from and therefore how the payload
/// must be deserialised.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub enum EventType {
    Odometry,
    Path,
    Config,
}

/// Possible parsing errors.
#[derive(Debug, Error)]
pub enum EventParseError {
    #[error("Event contains invalid JSON: {0}")]
    InvalidJson(serde_json::Error),

    #[error("Event has an invalid type ({0})")]
    InvalidType(String),

    #[error("Event of type {0:?} is expected to have a payload but it doesn't")]
    MissingPayload(EventType),

    #[error("Event of type {0:?} has an invalid payload: {1}")]
    InvalidPayload(EventType, serde_json::Error),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Event {

    /// Parse a new event from a JSON packet
    pub fn from_json(json_str: &str) -> Result<Self, EventParseError> {
        // Parse the JSON string into a value
        let mut val: Value = serde_json::from_str(json_str)
            .map_err(EventParseError::InvalidJson)?;

        // Get the type of the event
        let type_str = match val["type"].as_str() {
            Some(s) => s.to_string(),
            None => return Err(EventParseError::InvalidType(String::from(
                "Expected \"type\" to be a string"
            )))
        };
        let event_type = match EventType::from_str(&type_str) {
            Some(t) => t,
            None => return Err(EventParseError::InvalidType(
                format!("{} is not a recognised event type", type_str)
            ))
        };

        // Every event carries a payload
        let payload = val["payload"].take();
        if payload.is_null() {
            return Err(EventParseError::MissingPayload(event_type))
        }

        let invalid = |e: serde_json::Error| EventParseError::InvalidPayload(event_type, e);

        Ok(match event_type {
            EventType::Odometry => Event::Odometry(
                serde_json::from_value(payload).map_err(invalid)?
            ),
            EventType::Path => Event::Path(
                serde_json::from_value(payload).map_err(invalid)?
            ),
            EventType::Config => Event::Config(
                serde_json::from_value(payload).map_err(invalid)?
            ),
        })
    }

    /// Get the type of this event
    pub fn event_type(&self) -> EventType {
        match self {
            Event::Odometry(_) => EventType::Odometry,
            Event::Path(_) => EventType::Path,
            Event::Config(_) => EventType::Config,
        }
    }
}

impl EventType {
    fn from_str(s: &str) -> Option<Self> {
        match s {
            "ODOM" => Some(EventType::Odometry),
            "PATH" => Some(EventType::Path),
            "CONFIG" => Some(EventType::Config),
            _ => None
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
