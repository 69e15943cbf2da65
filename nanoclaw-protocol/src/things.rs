//! Things CLI request/response records
//!
//! A request is written by the worker into `things-requests/`; the host
//! answers with `things-responses/<requestId>.json`. The file name is the
//! only link between the two.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Things list views; each is also the CLI subcommand that lists it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThingsView {
    #[default]
    Today,
    Inbox,
    Upcoming,
    Anytime,
    Someday,
    Logbook,
    Logtoday,
    All,
    Projects,
    Areas,
    Tags,
}

impl ThingsView {
    pub const ALL: [ThingsView; 11] = [
        Self::Today,
        Self::Inbox,
        Self::Upcoming,
        Self::Anytime,
        Self::Someday,
        Self::Logbook,
        Self::Logtoday,
        Self::All,
        Self::Projects,
        Self::Areas,
        Self::Tags,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Inbox => "inbox",
            Self::Upcoming => "upcoming",
            Self::Anytime => "anytime",
            Self::Someday => "someday",
            Self::Logbook => "logbook",
            Self::Logtoday => "logtoday",
            Self::All => "all",
            Self::Projects => "projects",
            Self::Areas => "areas",
            Self::Tags => "tags",
        }
    }
}

impl fmt::Display for ThingsView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThingsView {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| format!("unknown view '{}'", s))
    }
}

/// Status filter for `search`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchStatus {
    Incomplete,
    Completed,
    Canceled,
    Any,
}

impl SearchStatus {
    pub const ALL: [SearchStatus; 4] = [Self::Incomplete, Self::Completed, Self::Canceled, Self::Any];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Incomplete => "incomplete",
            Self::Completed => "completed",
            Self::Canceled => "canceled",
            Self::Any => "any",
        }
    }
}

impl FromStr for SearchStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| format!("unknown status '{}'", s))
    }
}

/// Non-view commands the host will run
pub const ACTION_COMMANDS: [&str; 4] = ["search", "add", "update", "delete"];

/// Whether the host may pass `command` to the Things CLI
pub fn is_allowed_command(command: &str) -> bool {
    command.parse::<ThingsView>().is_ok() || ACTION_COMMANDS.contains(&command)
}

/// A request for the host to run the Things CLI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThingsRequest {
    pub request_id: String,
    pub command: String,
    pub cli_args: Vec<String>,
    pub group_folder: String,
    pub timestamp: String,
}

/// The host's answer; at most one field is meaningful
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThingsResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ThingsResponse {
    pub fn success(result: impl Into<String>) -> Self {
        Self {
            result: Some(result.into()),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            result: None,
            error: Some(error.into()),
        }
    }

    /// `Err` carries the remote error, `Ok` the output (possibly empty)
    ///
    /// An empty `error` string counts as absent.
    pub fn into_outcome(self) -> Result<String, String> {
        match self.error {
            Some(error) if !error.is_empty() => Err(error),
            _ => Ok(self.result.unwrap_or_default()),
        }
    }
}
