use anyhow::Context;
use log::{debug, warn};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use yahoo_fantasy_api::client::YahooApi;
use yahoo_fantasy_api::transform::{
    transform_matchups, transform_player_stats, transform_roster, transform_standings,
};
use yahoo_fantasy_api::yahoo::{LeagueResponse, TeamResponse};
use yahoo_fantasy_api::{Matchup, Player, PlayerStats, TransformedStandings};

/// Where raw league data comes from.
///
/// Fixture layout:
///   standings.json
///   scoreboard_week_{week}.json
///   roster_{team_key}_week_{week}.json
///   player_stats_week_{week}.json
#[derive(Debug, Clone)]
pub enum DataSource {
    Live(YahooApi),
    Fixtures(PathBuf),
}

impl DataSource {
    pub async fn standings(&self, league_key: &str) -> anyhow::Result<TransformedStandings> {
        match self {
            DataSource::Live(api) => Ok(api.fetch_standings(league_key).await?),
            DataSource::Fixtures(dir) => {
                let raw: LeagueResponse = read_json(&dir.join("standings.json"))?;
                Ok(transform_standings(&raw)?)
            }
        }
    }

    pub async fn scoreboard(&self, league_key: &str, week: u32) -> anyhow::Result<Vec<Matchup>> {
        match self {
            DataSource::Live(api) => Ok(api.fetch_scoreboard(league_key, week).await?),
            DataSource::Fixtures(dir) => {
                let path = dir.join(format!("scoreboard_week_{week}.json"));
                let raw: LeagueResponse = read_json(&path)?;
                Ok(transform_matchups(&raw))
            }
        }
    }

    /// A missing roster fixture is an empty roster, not an error.
    pub async fn roster(&self, team_key: &str, week: u32) -> anyhow::Result<Vec<Player>> {
        match self {
            DataSource::Live(api) => Ok(api.fetch_roster(team_key, week).await?),
            DataSource::Fixtures(dir) => {
                let path = dir.join(format!("roster_{team_key}_week_{week}.json"));
                if !path.exists() {
                    warn!("no roster fixture at {}", path.display());
                    return Ok(Vec::new());
                }
                let raw: TeamResponse = read_json(&path)?;
                Ok(transform_roster(&raw))
            }
        }
    }

    /// Weekly stats keyed by player id. A fixture file holds the whole week,
    /// so `player_keys` only narrows live requests.
    pub async fn player_stats(
        &self,
        league_key: &str,
        player_keys: &[String],
        week: u32,
    ) -> anyhow::Result<HashMap<String, PlayerStats>> {
        match self {
            DataSource::Live(api) => {
                Ok(api.fetch_player_stats(league_key, player_keys, week).await?)
            }
            DataSource::Fixtures(dir) => {
                let path = dir.join(format!("player_stats_week_{week}.json"));
                if !path.exists() {
                    warn!("no player stats fixture at {}", path.display());
                    return Ok(HashMap::new());
                }
                let raw: LeagueResponse = read_json(&path)?;
                Ok(transform_player_stats(&raw))
            }
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    debug!("reading fixture {}", path.display());
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("could not read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("invalid json at {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const STANDINGS_JSON: &str = include_str!("../../api/fixtures/standings.json");
    const SCOREBOARD_JSON: &str = include_str!("../../api/fixtures/scoreboard.json");
    const ROSTER_JSON: &str = include_str!("../../api/fixtures/roster.json");
    const PLAYER_STATS_JSON: &str = include_str!("../../api/fixtures/player_stats.json");

    fn fixture_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("standings.json"), STANDINGS_JSON).unwrap();
        std::fs::write(dir.path().join("scoreboard_week_10.json"), SCOREBOARD_JSON).unwrap();
        std::fs::write(dir.path().join("roster_449.l.12345.t.1_week_10.json"), ROSTER_JSON)
            .unwrap();
        std::fs::write(dir.path().join("player_stats_week_10.json"), PLAYER_STATS_JSON).unwrap();
        dir
    }

    #[tokio::test]
    async fn fixtures_are_transformed() {
        let dir = fixture_dir();
        let source = DataSource::Fixtures(dir.path().to_path_buf());

        let standings = source.standings("449.l.12345").await.unwrap();
        assert_eq!(standings.teams.len(), 4);

        let matchups = source.scoreboard("449.l.12345", 10).await.unwrap();
        assert_eq!(matchups.len(), 2);

        let roster = source.roster("449.l.12345.t.1", 10).await.unwrap();
        assert_eq!(roster.len(), 4);
    }

    #[tokio::test]
    async fn missing_roster_fixture_is_empty() {
        let dir = fixture_dir();
        let source = DataSource::Fixtures(dir.path().to_path_buf());
        assert!(source.roster("449.l.12345.t.4", 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn player_stats_come_from_the_weekly_file() {
        let dir = fixture_dir();
        let source = DataSource::Fixtures(dir.path().to_path_buf());

        let stats = source.player_stats("449.l.12345", &[], 10).await.unwrap();
        assert_eq!(stats.get("31020").map(|s| s.points), Some(24.86));

        assert!(source.player_stats("449.l.12345", &[], 11).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_scoreboard_fixture_names_the_file() {
        let dir = fixture_dir();
        let source = DataSource::Fixtures(dir.path().to_path_buf());
        let err = source.scoreboard("449.l.12345", 3).await.unwrap_err();
        assert!(err.to_string().contains("scoreboard_week_3.json"));
    }
}
