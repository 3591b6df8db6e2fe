use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{error::ParseNameError, protocol::RequestName};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);
    };
}

id_newtype!(GameId);
id_newtype!(FormulaId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NotificationId(pub u64);

/// Mutually exclusive content views hosted by the main window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tab {
    #[default]
    Game,
    Settings,
    Help,
    Doc,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Game, Tab::Settings, Tab::Help, Tab::Doc];

    pub fn as_str(self) -> &'static str {
        match self {
            Tab::Game => "GAME",
            Tab::Settings => "SETTINGS",
            Tab::Help => "HELP",
            Tab::Doc => "DOC",
        }
    }

    /// Identifier of the navigation entry highlighted while this tab is shown.
    pub fn nav_id(self) -> &'static str {
        match self {
            Tab::Game => "game",
            Tab::Settings => "settings",
            Tab::Help => "help",
            Tab::Doc => "doc",
        }
    }

    /// Registry entry that serves this tab's markup. The doc view lives in its
    /// own window and is never fetched into the content region.
    pub fn request_name(self) -> Option<RequestName> {
        match self {
            Tab::Game => Some(RequestName::Game),
            Tab::Settings => Some(RequestName::Settings),
            Tab::Help => Some(RequestName::Help),
            Tab::Doc => None,
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tab {
    type Err = ParseNameError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim();
        Tab::ALL
            .into_iter()
            .find(|tab| tab.as_str().eq_ignore_ascii_case(normalized))
            .ok_or_else(|| ParseNameError::new("tab", raw))
    }
}

/// Addressable surface that hosts at most one live notification.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Region(String);

impl Region {
    pub const CONTENT: &'static str = "main";

    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The region hosting tab content and load failures.
    pub fn content() -> Self {
        Self::new(Self::CONTENT)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Region {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    /// Alert style class understood by the notification markup.
    pub fn style_class(self) -> &'static str {
        match self {
            Severity::Info => "alert-info",
            Severity::Success => "alert-success",
            Severity::Warning => "alert-warning",
            Severity::Error => "alert-danger",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Severity {
    type Err = ParseNameError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "info" => Ok(Severity::Info),
            "success" => Ok(Severity::Success),
            "warning" | "warn" => Ok(Severity::Warning),
            "error" | "danger" => Ok(Severity::Error),
            _ => Err(ParseNameError::new("severity", raw)),
        }
    }
}
