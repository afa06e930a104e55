//! Season analytics over transformed standings and matchups: per-team
//! summaries, league-wide context and head-to-head previews.
//!
//! Matchup lists are expected in chronological order. Nothing here sorts by
//! week; "most recent" always means "last in the slice".

use crate::client::{ApiError, ApiResult};
use crate::{Matchup, Player, StandingsTeam, TeamSide, format_record};
use serde::Serialize;

/// How many trailing scores a [`TeamSummary`] carries.
pub const RECENT_SCORES: usize = 5;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Average points per starting slot. Zero when no starter with recorded
/// points ever filled the slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PositionalAverages {
    #[serde(rename = "QB")]
    pub qb: f64,
    #[serde(rename = "RB")]
    pub rb: f64,
    #[serde(rename = "WR")]
    pub wr: f64,
    #[serde(rename = "TE")]
    pub te: f64,
    #[serde(rename = "W/R/T")]
    pub flex: f64,
    #[serde(rename = "K")]
    pub k: f64,
    #[serde(rename = "DST")]
    pub dst: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamSummary {
    pub team_id: String,
    pub team_name: String,
    pub rank: u32,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub record: String,
    /// "W3" / "L2"
    pub streak: String,
    pub points_for: f64,
    pub points_against: f64,
    pub average_points: f64,
    pub average_projected_points: f64,
    pub average_over_under: f64,
    /// Oldest first.
    pub last_scores: Vec<f64>,
    pub positional_averages: PositionalAverages,
    pub number_of_moves: u32,
    pub number_of_trades: u32,
    pub faab_balance: u32,
    pub roster: Vec<Player>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueContext {
    pub league_average_points: f64,
    pub highest_score: f64,
    pub best_record: String,
    pub worst_record: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadToHeadSummary {
    pub current_week: u32,
    pub team1: TeamSummary,
    pub team2: TeamSummary,
    pub league: LeagueContext,
    pub league_average_over_under: f64,
}

// ---------------------------------------------------------------------------
// Building blocks
// ---------------------------------------------------------------------------

fn mean(sum: f64, count: usize) -> f64 {
    if count == 0 { 0.0 } else { sum / count as f64 }
}

/// Mean of `points - projected_points`; zero for no sides.
pub fn avg_over_under_performance<'a>(sides: impl IntoIterator<Item = &'a TeamSide>) -> f64 {
    let (sum, count) = sides
        .into_iter()
        .fold((0.0, 0), |(sum, count), side| (sum + side.over_under(), count + 1));
    mean(sum, count)
}

/// League-wide over/under: both sides of every matchup, so the denominator
/// is twice the matchup count.
pub fn league_avg_over_under_performance(matchups: &[Matchup]) -> f64 {
    let sum: f64 = matchups
        .iter()
        .flat_map(|m| m.sides())
        .map(TeamSide::over_under)
        .sum();
    mean(sum, matchups.len() * 2)
}

#[derive(Debug, Clone, Copy)]
enum Slot {
    Qb,
    Rb,
    Wr,
    Te,
    Flex,
    K,
    Dst,
}

impl Slot {
    const ALL: [Slot; 7] = [Slot::Qb, Slot::Rb, Slot::Wr, Slot::Te, Slot::Flex, Slot::K, Slot::Dst];

    fn parse(s: &str) -> Option<Self> {
        match s {
            "QB" => Some(Slot::Qb),
            "RB" => Some(Slot::Rb),
            "WR" => Some(Slot::Wr),
            "TE" => Some(Slot::Te),
            "W/R/T" => Some(Slot::Flex),
            "K" => Some(Slot::K),
            "DST" => Some(Slot::Dst),
            _ => None,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Per-slot scoring averages over a set of weekly lineups. Only starters
/// with a recorded point total count; unknown slot labels are ignored.
pub fn positional_averages<'a>(
    weekly_lineups: impl IntoIterator<Item = &'a [Player]>,
) -> PositionalAverages {
    let mut totals = [(0.0_f64, 0_usize); Slot::ALL.len()];
    for lineup in weekly_lineups {
        for player in lineup.iter().filter(|p| p.is_starter) {
            let (Some(points), Some(slot)) = (player.points, Slot::parse(&player.selected_position))
            else {
                continue;
            };
            let (sum, count) = &mut totals[slot.index()];
            *sum += points;
            *count += 1;
        }
    }

    let avg = |slot: Slot| {
        let (sum, count) = totals[slot.index()];
        mean(sum, count)
    };
    PositionalAverages {
        qb: avg(Slot::Qb),
        rb: avg(Slot::Rb),
        wr: avg(Slot::Wr),
        te: avg(Slot::Te),
        flex: avg(Slot::Flex),
        k: avg(Slot::K),
        dst: avg(Slot::Dst),
    }
}

/// The team's points from the last `n` matchups it appears in, oldest first.
pub fn last_n_scores(matchups: &[Matchup], team_id: &str, n: usize) -> Vec<f64> {
    let scores: Vec<f64> = matchups
        .iter()
        .filter_map(|m| m.side_for(team_id))
        .map(|s| s.points)
        .collect();
    let skip = scores.len().saturating_sub(n);
    scores[skip..].to_vec()
}

// ---------------------------------------------------------------------------
// Summaries
// ---------------------------------------------------------------------------

/// Season summary for one team. Fails when `team_id` has no standings entry.
///
/// Moves, trades and FAAB come from the team's most recent matchup. A team
/// with no matchups yet falls back to the values on its standings entry.
pub fn compute_team_summary_data(
    team_id: &str,
    team_name: &str,
    standings: &[StandingsTeam],
    season_matchups: &[Matchup],
    team_lineup: &[Player],
) -> ApiResult<TeamSummary> {
    let entry = standings
        .iter()
        .find(|t| t.team.team_id == team_id)
        .ok_or_else(|| ApiError::NotFound(format!("team {team_id} not found in standings")))?;
    let season = &entry.standings;

    let sides: Vec<&TeamSide> = season_matchups
        .iter()
        .filter_map(|m| m.side_for(team_id))
        .collect();

    let average_points = mean(sides.iter().map(|s| s.points).sum(), sides.len());
    let average_projected_points =
        mean(sides.iter().map(|s| s.projected_points).sum(), sides.len());
    let positional_averages = positional_averages(sides.iter().map(|s| s.players.as_slice()));
    let latest = sides.last().map(|s| &s.team).unwrap_or(&entry.team);

    Ok(TeamSummary {
        team_id: team_id.to_owned(),
        team_name: team_name.to_owned(),
        rank: season.rank,
        wins: season.wins,
        losses: season.losses,
        ties: season.ties,
        record: season.record(),
        streak: season.streak.display(),
        points_for: season.points_for,
        points_against: season.points_against,
        average_points,
        average_projected_points,
        average_over_under: avg_over_under_performance(sides.iter().copied()),
        last_scores: last_n_scores(season_matchups, team_id, RECENT_SCORES),
        positional_averages,
        number_of_moves: latest.number_of_moves,
        number_of_trades: latest.number_of_trades,
        faab_balance: latest.faab_balance,
        roster: team_lineup.to_vec(),
    })
}

/// League averages and extremes. Records are ranked by wins (desc), then
/// losses (asc), then ties (desc); equal records keep standings order.
pub fn compute_league_context(
    standings: &[StandingsTeam],
    season_matchups: &[Matchup],
) -> LeagueContext {
    let league_average_points = mean(
        standings.iter().map(|t| t.standings.points_for).sum(),
        standings.len(),
    );

    let highest_score = season_matchups
        .iter()
        .flat_map(|m| m.sides())
        .map(|s| s.points)
        .fold(None, |max: Option<f64>, p| Some(max.map_or(p, |m| m.max(p))))
        .unwrap_or(0.0);

    let mut ranked: Vec<&StandingsTeam> = standings.iter().collect();
    ranked.sort_by(|a, b| {
        let (a, b) = (&a.standings, &b.standings);
        b.wins
            .cmp(&a.wins)
            .then_with(|| a.losses.cmp(&b.losses))
            .then_with(|| b.ties.cmp(&a.ties))
    });
    let record_of = |t: Option<&&StandingsTeam>| {
        t.map(|t| t.standings.record())
            .unwrap_or_else(|| format_record(0, 0, 0))
    };

    LeagueContext {
        league_average_points,
        highest_score,
        best_record: record_of(ranked.first()),
        worst_record: record_of(ranked.last()),
    }
}

/// Both sides of `matchup` summarized against the same league context.
pub fn compute_head_to_head_summary(
    matchup: &Matchup,
    standings: &[StandingsTeam],
    season_matchups: &[Matchup],
    current_week: u32,
) -> ApiResult<HeadToHeadSummary> {
    let league = compute_league_context(standings, season_matchups);
    let summarize = |side: &TeamSide| {
        compute_team_summary_data(
            &side.team.team_id,
            &side.team.name,
            standings,
            season_matchups,
            &side.players,
        )
    };

    Ok(HeadToHeadSummary {
        current_week,
        team1: summarize(&matchup.team1)?,
        team2: summarize(&matchup.team2)?,
        league,
        league_average_over_under: league_avg_over_under_performance(season_matchups),
    })
}
