use crate::transform::{
    transform_matchups, transform_player_stats, transform_roster, transform_standings,
};
use crate::yahoo::{LeagueResponse, TeamResponse};
use crate::{Matchup, Player, PlayerStats, TransformedStandings};
use log::debug;
use reqwest::{Client, StatusCode};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

const YAHOO_FANTASY_V2: &str = "https://fantasysports.yahooapis.com/fantasy/v2";

/// Yahoo caps `player_keys` at 25 per request.
pub const MAX_PLAYER_KEYS: usize = 25;

/// Yahoo Fantasy Sports client. Holds an already-issued OAuth access token;
/// obtaining and refreshing it is the caller's business.
#[derive(Debug, Clone)]
pub struct YahooApi {
    client: Client,
    base_url: String,
    access_token: String,
    timeout: Duration,
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(reqwest::Error, String),
    /// Yahoo rejected the token. The caller decides whether to refresh.
    Unauthorized(String),
    /// A required node is missing from an otherwise successful payload.
    Shape(String),
    NotFound(String),
    Other(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::Unauthorized(url) => {
                write!(f, "Unauthorized for {url}: access token rejected")
            }
            ApiError::Shape(msg) => write!(f, "Unexpected response shape: {msg}"),
            ApiError::NotFound(msg) => write!(f, "Not found: {msg}"),
            ApiError::Other(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Network(e, _) | ApiError::Api(e, _) | ApiError::Parsing(e, _) => Some(e),
            _ => None,
        }
    }
}

impl YahooApi {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self::with_base_url(YAHOO_FANTASY_V2, access_token)
    }

    pub fn with_base_url(base_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .user_agent("fantasy-recap/0.1 (yahoo fantasy football recaps)")
                .build()
                .unwrap_or_default(),
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            access_token: access_token.into(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// League standings, e.g. `fetch_standings("449.l.12345")`.
    pub async fn fetch_standings(&self, league_key: &str) -> ApiResult<TransformedStandings> {
        let url = format!("{}/league/{league_key}/standings", self.base_url);
        let raw: LeagueResponse = self.get(&url).await?;
        transform_standings(&raw)
    }

    /// Every matchup of one scoring week. Sides come back without rosters.
    pub async fn fetch_scoreboard(&self, league_key: &str, week: u32) -> ApiResult<Vec<Matchup>> {
        let url = format!("{}/league/{league_key}/scoreboard;week={week}", self.base_url);
        let raw: LeagueResponse = self.get(&url).await?;
        Ok(transform_matchups(&raw))
    }

    /// A team's lineup for one week, with that week's points when Yahoo
    /// has them.
    pub async fn fetch_roster(&self, team_key: &str, week: u32) -> ApiResult<Vec<Player>> {
        let url = format!(
            "{}/team/{team_key}/roster;week={week}/players/stats;type=week;week={week}",
            self.base_url
        );
        let raw: TeamResponse = self.get(&url).await?;
        Ok(transform_roster(&raw))
    }

    /// Weekly stats for a set of players, keyed by player id. Keys are sent
    /// in batches of [`MAX_PLAYER_KEYS`].
    pub async fn fetch_player_stats(
        &self,
        league_key: &str,
        player_keys: &[String],
        week: u32,
    ) -> ApiResult<HashMap<String, PlayerStats>> {
        let mut stats = HashMap::new();
        for batch in player_keys.chunks(MAX_PLAYER_KEYS) {
            let url = format!(
                "{}/league/{league_key}/players;player_keys={}/stats;type=week;week={week}",
                self.base_url,
                batch.join(",")
            );
            let raw: LeagueResponse = self.get(&url).await?;
            stats.extend(transform_player_stats(&raw));
        }
        Ok(stats)
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        debug!("GET {url}");
        let response = self
            .client
            .get(format!("{url}?format=json"))
            .bearer_auth(&self.access_token)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized(url.to_owned()));
        }

        match response.error_for_status() {
            Ok(res) => res
                .json::<T>()
                .await
                .map_err(|e| ApiError::Parsing(e, url.to_owned())),
            Err(e) if e.status() == Some(StatusCode::NOT_FOUND) => {
                Err(ApiError::NotFound(url.to_owned()))
            }
            Err(e) => Err(ApiError::Api(e, url.to_owned())),
        }
    }
}
