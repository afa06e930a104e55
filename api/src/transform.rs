//! Transformers: one function per Yahoo resource, raw response in, domain
//! model out. Each handles a single resource; combining them is the caller's
//! job (see `merge`).

use crate::client::{ApiError, ApiResult};
use crate::extract::{
    extract_player, extract_raw_stats, extract_selected_position, extract_team,
    extract_team_points, extract_team_standings,
};
use crate::yahoo::{
    LeagueResponse, TeamResponse, at, find_field, keyed_entries, keyed_slots, parse_f64,
    parse_flag, parse_u32, text,
};
use crate::{
    BENCH_SLOT, Matchup, Player, PlayerStats, StandingsTeam, TeamSide, TransformedStandings,
};
use chrono::NaiveDate;
use log::{debug, warn};
use serde_json::Value;
use std::collections::HashMap;

/// League standings. The only hard requirement is the
/// `league[1].standings[0].teams` node; every team under it is produced,
/// with defaults for whatever fields are missing.
pub fn transform_standings(raw: &LeagueResponse) -> ApiResult<TransformedStandings> {
    let content = &raw.fantasy_content;
    let teams = content
        .resource()
        .and_then(|r| r.get("standings"))
        .and_then(|s| at(s, 0))
        .and_then(|s| s.get("teams"))
        .ok_or_else(|| ApiError::Shape("expected league[1].standings[0].teams".into()))?;

    let teams = keyed_entries(teams)
        .into_iter()
        .map(|(key, entry)| {
            let payload = payload_of(entry, "team").unwrap_or_else(|| {
                warn!("standings entry {key} has no team payload");
                &[][..]
            });
            StandingsTeam {
                team: extract_team(team_info(payload)),
                standings: extract_team_standings(payload),
            }
        })
        .collect();

    let meta = content.metadata();
    Ok(TransformedStandings {
        league_key: text(meta.and_then(|m| m.get("league_key"))),
        league_name: text(meta.and_then(|m| m.get("name"))),
        current_week: parse_u32(meta.and_then(|m| m.get("current_week"))),
        teams,
    })
}

/// Scoreboard for one week. Slots that are declared by `count` but missing,
/// or that lack either side, are skipped. Sides come back with empty rosters.
pub fn transform_matchups(raw: &LeagueResponse) -> Vec<Matchup> {
    let Some(matchups) = raw
        .fantasy_content
        .resource()
        .and_then(|r| r.get("scoreboard"))
        .and_then(|s| at(s, 0))
        .and_then(|s| s.get("matchups"))
    else {
        warn!("scoreboard response has no league[1].scoreboard[0].matchups");
        return Vec::new();
    };

    keyed_slots(matchups)
        .filter_map(|(index, entry)| {
            let Some(matchup) = entry.and_then(|e| e.get("matchup")) else {
                debug!("no matchup in slot {index}");
                return None;
            };
            let teams = at(matchup, 0).and_then(|m| m.get("teams"));
            let side = |i: usize| {
                teams
                    .and_then(|t| at(t, i))
                    .and_then(|t| payload_of(t, "team"))
                    .map(team_side)
            };
            match (side(0), side(1)) {
                (Some(team1), Some(team2)) => Some(build_matchup(matchup, team1, team2)),
                _ => {
                    warn!("matchup slot {index} is missing a team side");
                    None
                }
            }
        })
        .collect()
}

fn team_side(payload: &[Value]) -> TeamSide {
    let (points, projected_points) = extract_team_points(payload);
    TeamSide {
        team: extract_team(team_info(payload)),
        points,
        projected_points,
        players: Vec::new(),
        standings: None,
    }
}

fn build_matchup(matchup: &Value, team1: TeamSide, team2: TeamSide) -> Matchup {
    let date = |key: &str| NaiveDate::parse_from_str(&text(matchup.get(key)), "%Y-%m-%d").ok();
    let winner_team_key = Some(text(matchup.get("winner_team_key"))).filter(|k| !k.is_empty());

    Matchup {
        id: format!(
            "{}-vs-{}",
            team1.team.manager.manager_id, team2.team.manager.manager_id
        ),
        week: parse_u32(matchup.get("week")),
        week_start: date("week_start"),
        week_end: date("week_end"),
        status: text(matchup.get("status")),
        is_playoffs: parse_flag(matchup.get("is_playoffs")),
        winner_team_key,
        team1,
        team2,
    }
}

/// A team's roster for one week. Missing player records are skipped since
/// partial rosters are normal before a week completes.
pub fn transform_roster(raw: &TeamResponse) -> Vec<Player> {
    let Some(players) = find_field(&raw.fantasy_content.team, "roster")
        .and_then(|r| at(r, 0))
        .and_then(|r| r.get("players"))
    else {
        warn!("roster response has no team[1].roster[0].players");
        return Vec::new();
    };

    keyed_slots(players)
        .filter_map(|(index, entry)| {
            let record = entry.and_then(|e| e.get("player")).and_then(Value::as_array);
            let Some(info) = record.and_then(|r| r.first()).and_then(Value::as_array) else {
                warn!("skipping roster slot {index}: no player info");
                return None;
            };
            let record = record.map(Vec::as_slice).unwrap_or_default();

            let mut player = extract_player(info);
            if let Some(slot) = record.iter().find_map(extract_selected_position) {
                player.selected_position = slot;
            }
            player.is_starter = player.selected_position != BENCH_SLOT;
            // Rosters requested with `;out=stats` carry the week's points inline.
            if let Some(points) = record.iter().find_map(|e| e.get("player_points")) {
                player.points = Some(parse_f64(points.get("total")));
            }
            Some(player)
        })
        .collect()
}

/// Weekly stats keyed by player id. Entries without a resolvable
/// `player_id` are skipped.
pub fn transform_player_stats(raw: &LeagueResponse) -> HashMap<String, PlayerStats> {
    let content = &raw.fantasy_content;
    let Some(players) = content
        .players
        .as_ref()
        .or_else(|| content.resource().and_then(|r| r.get("players")))
    else {
        warn!("player stats response has no players map");
        return HashMap::new();
    };

    let mut out = HashMap::new();
    for (key, entry) in keyed_entries(players) {
        let record = payload_of(entry, "player").unwrap_or_default();
        let info = record
            .first()
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let player_id = text(find_field(info, "player_id"));
        if player_id.is_empty() {
            warn!("skipping player stats entry {key}: no player_id");
            continue;
        }

        let points = parse_f64(
            record
                .iter()
                .find_map(|e| e.get("player_points"))
                .and_then(|p| p.get("total")),
        );
        let raw_stats = record
            .iter()
            .find_map(|e| e.get("player_stats"))
            .map(extract_raw_stats);

        out.insert(player_id, PlayerStats { points, raw_stats });
    }
    out
}

/// The `team` / `player` array wrapped in a keyed-map entry.
fn payload_of<'a>(entry: &'a Value, key: &str) -> Option<&'a [Value]> {
    entry.get(key).and_then(Value::as_array).map(Vec::as_slice)
}

/// Index 0 of a team payload is the info array.
fn team_info(payload: &[Value]) -> &[Value] {
    payload
        .first()
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}
