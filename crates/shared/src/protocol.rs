use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    domain::{FormulaId, GameId},
    error::ParseNameError,
};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/LibreDragon/api";
pub const DEFAULT_HTML_DIR: &str = "./html";

/// Closed set of named requests the client knows how to issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RequestName {
    GameState,
    Game,
    Settings,
    Help,
    ApplyRule,
    Start,
    Over,
}

impl RequestName {
    pub const ALL: [RequestName; 7] = [
        RequestName::GameState,
        RequestName::Game,
        RequestName::Settings,
        RequestName::Help,
        RequestName::ApplyRule,
        RequestName::Start,
        RequestName::Over,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RequestName::GameState => "GAMESTATE",
            RequestName::Game => "GAME",
            RequestName::Settings => "SETTINGS",
            RequestName::Help => "HELP",
            RequestName::ApplyRule => "APPLYRULE",
            RequestName::Start => "START",
            RequestName::Over => "OVER",
        }
    }

    /// Requests that talk to the game API rather than fetching tab markup.
    pub fn is_game_request(self) -> bool {
        matches!(
            self,
            RequestName::GameState | RequestName::ApplyRule | RequestName::Start | RequestName::Over
        )
    }
}

impl fmt::Display for RequestName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestName {
    type Err = ParseNameError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim();
        RequestName::ALL
            .into_iter()
            .find(|name| name.as_str().eq_ignore_ascii_case(normalized))
            .ok_or_else(|| ParseNameError::new("request", raw))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Text,
    Html,
}

impl ContentType {
    /// `Accept` header sent with remote fetches.
    pub fn accept(self) -> &'static str {
        match self {
            ContentType::Text => "application/json, text/plain",
            ContentType::Html => "text/html",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    pub name: RequestName,
    pub endpoint: String,
    pub method: HttpMethod,
    pub content_type: ContentType,
}

impl RequestSpec {
    /// Endpoint with an optional suffix such as `/123456` appended.
    pub fn endpoint_with_suffix(&self, path_suffix: Option<&str>) -> String {
        match path_suffix.map(str::trim).filter(|suffix| !suffix.is_empty()) {
            Some(suffix) if suffix.starts_with('/') => format!("{}{suffix}", self.endpoint),
            Some(suffix) => format!("{}/{suffix}", self.endpoint),
            None => self.endpoint.clone(),
        }
    }

    pub fn is_remote(&self) -> bool {
        self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")
    }
}

/// Maps every [`RequestName`] to its endpoint. Tab markup is served from a
/// local template directory, game calls from the API base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestRegistry {
    api_base_url: String,
    html_dir: String,
}

impl Default for RequestRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL, DEFAULT_HTML_DIR)
    }
}

impl RequestRegistry {
    pub fn new(api_base_url: impl Into<String>, html_dir: impl Into<String>) -> Self {
        let api_base_url = api_base_url.into();
        let html_dir = html_dir.into();
        Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            html_dir: html_dir.trim_end_matches(['/', '\\']).to_string(),
        }
    }

    pub fn spec(&self, name: RequestName) -> RequestSpec {
        let (endpoint, content_type) = match name {
            RequestName::GameState => (self.api("test"), ContentType::Text),
            RequestName::Game => (self.html("game.html"), ContentType::Html),
            RequestName::Settings => (self.html("settings.html"), ContentType::Html),
            RequestName::Help => (self.html("help.html"), ContentType::Html),
            RequestName::ApplyRule => (self.api("rule"), ContentType::Text),
            RequestName::Start => (self.api("start"), ContentType::Text),
            RequestName::Over => (self.api("over"), ContentType::Text),
        };
        RequestSpec {
            name,
            endpoint,
            method: HttpMethod::Get,
            content_type,
        }
    }

    fn api(&self, path: &str) -> String {
        format!("{}/{path}", self.api_base_url)
    }

    fn html(&self, file: &str) -> String {
        format!("{}/{file}", self.html_dir)
    }
}

/// Body returned by the game API. Only the session identifiers are
/// interpreted here; the rest of the payload is kept for the game view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResponse {
    #[serde(default)]
    pub game_id: Option<GameId>,
    #[serde(default)]
    pub formula_id: Option<FormulaId>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
