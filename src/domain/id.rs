//! Task identifiers
//!
//! A task ID is the creation time in Unix milliseconds (e.g. `1718000000123`).
//! When two tasks are created within the same millisecond, or the clock steps
//! backwards, the next free integer above the newest existing ID is used
//! instead. IDs therefore grow with creation order and are never reused.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdError {
    #[error("Invalid task ID: expected a positive integer, got '{0}'")]
    InvalidTaskId(String),

    #[error("No task ID is left after {0}")]
    Exhausted(i64),
}

/// Task ID derived from the creation timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(i64);

impl TaskId {
    /// Wraps a raw integer ID
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Allocates an ID for a task created at `timestamp`
    ///
    /// `newest` is the largest ID already in use, if any. Fails when that
    /// ID is already `i64::MAX`.
    pub fn allocate(timestamp: DateTime<Utc>, newest: Option<TaskId>) -> Result<Self, IdError> {
        let millis = timestamp.timestamp_millis();
        match newest {
            Some(TaskId(max)) if millis <= max => max
                .checked_add(1)
                .map(Self)
                .ok_or(IdError::Exhausted(max)),
            _ => Ok(Self(millis)),
        }
    }

    /// Returns the raw integer value
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.parse::<i64>() {
            Ok(raw) if raw > 0 => Ok(Self(raw)),
            _ => Err(IdError::InvalidTaskId(s.to_string())),
        }
    }
}

impl From<i64> for TaskId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}
