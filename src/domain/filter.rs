//! View filter

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::task::Task;

/// Which tasks the view shows
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    /// All filters in display order
    pub const TABS: [Filter; 3] = [Filter::All, Filter::Active, Filter::Completed];

    /// Returns true if the task passes this filter
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !task.completed,
            Filter::Completed => task.completed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Active => "active",
            Filter::Completed => "completed",
        }
    }

    /// Title-case label for the filter tabs
    pub fn label(&self) -> &'static str {
        match self {
            Filter::All => "All",
            Filter::Active => "Active",
            Filter::Completed => "Completed",
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Filter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" | "1" => Ok(Filter::All),
            "active" | "2" => Ok(Filter::Active),
            "completed" | "done" | "3" => Ok(Filter::Completed),
            other => Err(format!("Unknown filter: {}", other)),
        }
    }
}
