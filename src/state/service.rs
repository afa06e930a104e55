use crate::state::source::DataSource;
use anyhow::Context;
use futures_util::future::try_join_all;
use log::{debug, info, warn};
use std::collections::HashMap;
use yahoo_fantasy_api::merge::{
    attach_player_stats, attach_rosters, merge_matchup_and_standings_data,
};
use yahoo_fantasy_api::summary::{
    HeadToHeadSummary, TeamSummary, compute_head_to_head_summary, compute_team_summary_data,
};
use yahoo_fantasy_api::{Matchup, Player, PlayerStats, TeamSide, TransformedStandings};

/// Fetch, merge and summarize one league. Built once by `main` and passed
/// to whatever needs it.
pub struct RecapService {
    source: DataSource,
    league_key: String,
}

impl RecapService {
    pub fn new(source: DataSource, league_key: impl Into<String>) -> Self {
        Self { source, league_key: league_key.into() }
    }

    pub fn league_key(&self) -> &str {
        &self.league_key
    }

    pub async fn standings(&self) -> anyhow::Result<TransformedStandings> {
        debug!("loading standings for {}", self.league_key);
        self.source.standings(&self.league_key).await
    }

    /// One week's matchups with both rosters and season standings attached.
    pub async fn week_matchups(&self, week: u32) -> anyhow::Result<Vec<Matchup>> {
        let standings = self.standings().await?;
        self.week_matchups_with(&standings, week).await
    }

    async fn week_matchups_with(
        &self,
        standings: &TransformedStandings,
        week: u32,
    ) -> anyhow::Result<Vec<Matchup>> {
        let matchups = self.source.scoreboard(&self.league_key, week).await?;
        let sides: Vec<&TeamSide> = matchups.iter().flat_map(|m| m.sides()).collect();
        let rosters = self.rosters(&sides, week).await?;
        let matchups = attach_rosters(&matchups, &rosters);
        Ok(merge_matchup_and_standings_data(&matchups, &standings.teams))
    }

    /// Preview of matchup `index` in `week`, measured against every earlier
    /// week of the season.
    pub async fn head_to_head(
        &self,
        week: u32,
        index: usize,
    ) -> anyhow::Result<HeadToHeadSummary> {
        let standings = self.standings().await?;
        let current = self.week_matchups_with(&standings, week).await?;
        let matchup = current.get(index).with_context(|| {
            format!("week {week} has no matchup #{index} ({} total)", current.len())
        })?;

        let team_ids =
            [matchup.team1.team.team_id.as_str(), matchup.team2.team.team_id.as_str()];
        let season = self.season_with_lineups(week, &team_ids).await?;
        info!("summarizing {} over {} earlier matchups", matchup.id, season.len());

        Ok(compute_head_to_head_summary(matchup, &standings.teams, &season, week)?)
    }

    /// Season summary for one team through the weeks before `week`.
    pub async fn team_summary(&self, team_id: &str, week: u32) -> anyhow::Result<TeamSummary> {
        let standings = self.standings().await?;
        let team = standings
            .find_team(team_id)
            .with_context(|| format!("team {team_id} is not in {}", self.league_key))?;
        let season = self.season_with_lineups(week, &[team_id]).await?;
        let lineup = season
            .iter()
            .rev()
            .find_map(|m| m.side_for(team_id))
            .map(|side| side.players.clone())
            .unwrap_or_default();

        Ok(compute_team_summary_data(team_id, &team.team.name, &standings.teams, &season, &lineup)?)
    }

    /// Matchups for weeks `1..week` in chronological order, with weekly
    /// lineups attached for `team_ids` only.
    async fn season_with_lineups(
        &self,
        week: u32,
        team_ids: &[&str],
    ) -> anyhow::Result<Vec<Matchup>> {
        let weeks: Vec<u32> = (1..week).collect();
        let scoreboards = try_join_all(
            weeks.iter().map(|&w| self.source.scoreboard(&self.league_key, w)),
        )
        .await?;

        let mut season = Vec::new();
        for (&w, matchups) in weeks.iter().zip(scoreboards) {
            let sides: Vec<&TeamSide> = matchups
                .iter()
                .flat_map(|m| m.sides())
                .filter(|s| team_ids.contains(&s.team.team_id.as_str()))
                .collect();
            let rosters = self.rosters(&sides, w).await?;
            season.extend(attach_rosters(&matchups, &rosters));
        }
        Ok(season)
    }

    /// Rosters for the given sides, fetched concurrently, keyed by team id.
    /// Players without points get them from the week's player stats. Sides
    /// without a team key are skipped.
    async fn rosters(
        &self,
        sides: &[&TeamSide],
        week: u32,
    ) -> anyhow::Result<HashMap<String, Vec<Player>>> {
        let sides: Vec<&TeamSide> = sides
            .iter()
            .copied()
            .filter(|side| {
                let keyed = !side.team.team_key.is_empty();
                if !keyed {
                    let team_id = &side.team.team_id;
                    warn!("team {team_id} has no team key, skipping week {week} roster");
                }
                keyed
            })
            .collect();

        let fetched = try_join_all(sides.iter().map(|side| async move {
            let roster = self.source.roster(&side.team.team_key, week).await?;
            anyhow::Ok((side.team.team_id.clone(), roster))
        }))
        .await?;

        let stats = self.player_stats(fetched.iter().flat_map(|(_, r)| r), week).await?;
        Ok(fetched
            .into_iter()
            .map(|(team_id, roster)| (team_id, attach_player_stats(&roster, &stats)))
            .collect())
    }

    async fn player_stats<'a>(
        &self,
        players: impl IntoIterator<Item = &'a Player>,
        week: u32,
    ) -> anyhow::Result<HashMap<String, PlayerStats>> {
        let mut keys: Vec<String> = players
            .into_iter()
            .filter(|p| p.points.is_none() && !p.player_key.is_empty())
            .map(|p| p.player_key.clone())
            .collect();
        keys.sort();
        keys.dedup();
        if keys.is_empty() {
            return Ok(HashMap::new());
        }
        debug!("loading week {week} stats for {} players", keys.len());
        self.source.player_stats(&self.league_key, &keys, week).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yahoo_fantasy_api::Team;
    use yahoo_fantasy_api::client::YahooApi;

    const STANDINGS_JSON: &str = include_str!("../../api/fixtures/standings.json");
    const SCOREBOARD_JSON: &str = include_str!("../../api/fixtures/scoreboard.json");
    const ROSTER_JSON: &str = include_str!("../../api/fixtures/roster.json");
    const PLAYER_STATS_JSON: &str = include_str!("../../api/fixtures/player_stats.json");

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-9, "{actual} != {expected}");
    }

    /// The same scoreboard and player stats for weeks 1..=3, and team 1's
    /// roster each week.
    fn service() -> (tempfile::TempDir, RecapService) {
        let dir = tempfile::tempdir().unwrap();
        let write = |name: String, body: &str| std::fs::write(dir.path().join(name), body).unwrap();
        write("standings.json".into(), STANDINGS_JSON);
        for week in 1..=3 {
            write(format!("scoreboard_week_{week}.json"), SCOREBOARD_JSON);
            write(format!("roster_449.l.12345.t.1_week_{week}.json"), ROSTER_JSON);
            write(format!("player_stats_week_{week}.json"), PLAYER_STATS_JSON);
        }
        let source = DataSource::Fixtures(dir.path().to_path_buf());
        (dir, RecapService::new(source, "449.l.12345"))
    }

    #[tokio::test]
    async fn week_matchups_carry_rosters_and_standings() {
        let (_dir, service) = service();
        let matchups = service.week_matchups(3).await.unwrap();
        assert_eq!(matchups.len(), 2);
        let first = &matchups[0];
        assert_eq!(first.team1.players.len(), 4);
        assert!(first.team2.players.is_empty());
        assert_eq!(first.team1.standings.as_ref().map(|s| s.wins), Some(8));
        assert_eq!(first.team2.standings.as_ref().map(|s| s.wins), Some(5));
    }

    #[tokio::test]
    async fn rosters_pick_up_weekly_player_points() {
        let (_dir, service) = service();
        let matchups = service.week_matchups(3).await.unwrap();
        let points = |name: &str| {
            matchups[0].team1.players.iter().find(|p| p.name == name).and_then(|p| p.points)
        };
        assert_eq!(points("Jalen Hurts"), Some(24.86));
        assert_eq!(points("James Cook"), Some(13.4));
        assert_eq!(points("Amon-Ra St.Brown"), None);
    }

    #[tokio::test]
    async fn head_to_head_uses_earlier_weeks_only() {
        let (_dir, service) = service();
        let h2h = service.head_to_head(3, 0).await.unwrap();
        assert_eq!(h2h.current_week, 3);
        assert_eq!(h2h.team1.team_id, "1");
        assert_eq!(h2h.team2.team_id, "2");
        assert_eq!(h2h.team1.last_scores, vec![131.62, 131.62]);
        assert_eq!(h2h.team1.roster.len(), 4);
        assert_eq!(h2h.league.best_record, "8-2");
        assert_eq!(h2h.league.worst_record, "1-9");
    }

    #[tokio::test]
    async fn head_to_head_reports_performance_against_projections() {
        let (_dir, service) = service();
        let h2h = service.head_to_head(3, 0).await.unwrap();
        assert_close(h2h.team1.average_points, 131.62);
        assert_close(h2h.team1.average_over_under, 131.62 - 118.40);
        assert_close(h2h.team2.average_over_under, 98.04 - 110.71);
        // Weeks 1 and 2 both hold the same four sides.
        let week_total =
            (131.62 - 118.40) + (98.04 - 110.71) + (120.16 - 112.00) + (87.55 - 101.32);
        assert_close(h2h.league_average_over_under, week_total / 4.0);
        assert_close(h2h.league.highest_score, 131.62);
    }

    #[tokio::test]
    async fn team_summary_averages_starter_points_by_slot() {
        let (_dir, service) = service();
        let summary = service.team_summary("1", 3).await.unwrap();
        let averages = summary.positional_averages;
        assert_close(averages.qb, 24.86);
        assert_close(averages.flex, 13.4);
        assert_eq!(averages.wr, 0.0);
        assert_eq!(averages.rb, 0.0);
        assert_eq!(summary.roster.iter().filter(|p| p.points.is_some()).count(), 2);
    }

    #[tokio::test]
    async fn head_to_head_rejects_unknown_matchup_index() {
        let (_dir, service) = service();
        let err = service.head_to_head(3, 5).await.unwrap_err();
        assert!(err.to_string().contains("no matchup #5"));
    }

    #[tokio::test]
    async fn team_summary_reports_unknown_team() {
        let (_dir, service) = service();
        assert!(service.team_summary("42", 3).await.is_err());
    }

    #[tokio::test]
    async fn team_summary_uses_latest_lineup() {
        let (_dir, service) = service();
        let summary = service.team_summary("3", 3).await.unwrap();
        assert_eq!(summary.team_name, "CeeDee Bee");
        assert_eq!(summary.last_scores, vec![120.16, 120.16]);
        assert!(summary.roster.is_empty());
    }

    #[tokio::test]
    async fn sides_without_team_key_are_skipped() {
        // Nothing listens here; any request would fail the call.
        let api = YahooApi::with_base_url("http://127.0.0.1:9", "token");
        let service = RecapService::new(DataSource::Live(api), "449.l.12345");
        let side = TeamSide {
            team: Team { team_id: "7".into(), ..Default::default() },
            ..Default::default()
        };
        let rosters = service.rosters(&[&side], 3).await.unwrap();
        assert!(rosters.is_empty());
    }
}
