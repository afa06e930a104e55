//! Combine independently fetched resources into one view. Inputs are never
//! modified; every function returns fresh values.

use crate::{Matchup, Player, PlayerStats, StandingsTeam, TeamSide, TeamStandings};
use std::collections::HashMap;

/// Embed each side's season standings. Sides whose team id has no entry are
/// left without standings. On duplicate team ids the last entry wins.
pub fn merge_matchup_and_standings_data(
    matchups: &[Matchup],
    standings: &[StandingsTeam],
) -> Vec<Matchup> {
    let by_team: HashMap<&str, &TeamStandings> = standings
        .iter()
        .map(|t| (t.team.team_id.as_str(), &t.standings))
        .collect();

    let with_standings = |side: &TeamSide| TeamSide {
        standings: by_team.get(side.team.team_id.as_str()).map(|s| (*s).clone()),
        ..side.clone()
    };

    matchups
        .iter()
        .map(|m| Matchup {
            team1: with_standings(&m.team1),
            team2: with_standings(&m.team2),
            ..m.clone()
        })
        .collect()
}

/// Fill each side's players from `rosters` (keyed by team id). Sides with no
/// roster entry keep whatever players they already had.
pub fn attach_rosters(
    matchups: &[Matchup],
    rosters: &HashMap<String, Vec<Player>>,
) -> Vec<Matchup> {
    let with_roster = |side: &TeamSide| {
        let mut side = side.clone();
        if let Some(roster) = rosters.get(&side.team.team_id) {
            side.players = roster.clone();
        }
        side
    };

    matchups
        .iter()
        .map(|m| Matchup {
            team1: with_roster(&m.team1),
            team2: with_roster(&m.team2),
            ..m.clone()
        })
        .collect()
}

/// Set weekly points and raw stats on roster players found in `stats`
/// (keyed by player id). Players without an entry are returned unchanged.
pub fn attach_player_stats(
    players: &[Player],
    stats: &HashMap<String, PlayerStats>,
) -> Vec<Player> {
    players
        .iter()
        .map(|p| match stats.get(&p.player_id) {
            Some(s) => Player {
                points: Some(s.points),
                stats: s.raw_stats.clone(),
                ..p.clone()
            },
            None => p.clone(),
        })
        .collect()
}
