//! Entity extractors: pull typed fields out of Yahoo's info arrays by key,
//! never by position. Missing fields fall back to defaults; nothing here
//! fails.

use crate::yahoo::{at, find_field, lookup, parse_f64, parse_u32, text};
use crate::{Manager, Player, RawStat, Streak, StreakKind, Team, TeamStandings, BENCH_SLOT};
use serde_json::Value;

/// Team identity and season aggregates from a team info array (`team[0]`).
pub fn extract_team(info: &[Value]) -> Team {
    let logo_url = find_field(info, "team_logos")
        .and_then(|logos| at(logos, 0))
        .and_then(|entry| entry.get("team_logo"))
        .map(|logo| text(logo.get("url")))
        .unwrap_or_default();

    Team {
        team_id: text(find_field(info, "team_id")),
        team_key: text(find_field(info, "team_key")),
        name: text(find_field(info, "name")),
        logo_url,
        url: text(find_field(info, "url")),
        manager: extract_manager(info),
        number_of_moves: parse_u32(find_field(info, "number_of_moves")),
        number_of_trades: parse_u32(find_field(info, "number_of_trades")),
        faab_balance: parse_u32(find_field(info, "faab_balance")),
        waiver_priority: parse_u32(find_field(info, "waiver_priority")),
    }
}

/// First manager listed on the team. Co-managed teams list more than one;
/// only the primary is kept.
pub fn extract_manager(info: &[Value]) -> Manager {
    let Some(manager) = find_field(info, "managers")
        .and_then(|managers| at(managers, 0))
        .and_then(|entry| entry.get("manager"))
    else {
        return Manager::default();
    };

    Manager {
        manager_id: text(manager.get("manager_id")),
        nickname: text(manager.get("nickname")),
        felo_score: parse_u32(manager.get("felo_score")),
        felo_tier: text(manager.get("felo_tier")),
        image_url: text(manager.get("image_url")),
    }
}

/// `(points, projected_points)` from a team payload (the whole `team` array).
pub fn extract_team_points(payload: &[Value]) -> (f64, f64) {
    let total = |key: &str| parse_f64(find_field(payload, key).and_then(|p| p.get("total")));
    (total("team_points"), total("team_projected_points"))
}

/// Season standings from a team payload. Yahoo puts `team_standings` at
/// index 2 on the standings endpoint; it is located by key regardless.
pub fn extract_team_standings(payload: &[Value]) -> TeamStandings {
    let Some(standings) = find_field(payload, "team_standings") else {
        return TeamStandings::default();
    };
    let outcomes = standings.get("outcome_totals");
    let outcome = |key: &str| outcomes.and_then(|o| o.get(key));

    TeamStandings {
        rank: parse_u32(standings.get("rank")),
        wins: parse_u32(outcome("wins")),
        losses: parse_u32(outcome("losses")),
        ties: parse_u32(outcome("ties")),
        win_percentage: parse_f64(outcome("percentage")),
        points_for: parse_f64(standings.get("points_for")),
        points_against: parse_f64(standings.get("points_against")),
        streak: extract_streak(standings.get("streak")),
        playoff_seed: parse_u32(standings.get("playoff_seed")),
    }
}

fn extract_streak(streak: Option<&Value>) -> Streak {
    let Some(streak) = streak else {
        return Streak::default();
    };
    Streak {
        kind: StreakKind::parse(&text(streak.get("type"))),
        value: parse_u32(streak.get("value")),
    }
}

/// Player identity from a player info array (`player[0]`). The selected
/// slot defaults to the listed position until a `selected_position` entry
/// says otherwise.
pub fn extract_player(info: &[Value]) -> Player {
    let position = text(find_field(info, "display_position"));
    let name = find_field(info, "name")
        .map(|n| match n {
            Value::Object(_) => text(n.get("full")),
            other => text(Some(other)),
        })
        .unwrap_or_default();
    let headshot_url = find_field(info, "headshot")
        .map(|h| text(h.get("url")))
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| text(find_field(info, "image_url")));
    let eligible_positions = find_field(info, "eligible_positions")
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .map(|p| text(lookup(p, "position")))
                .filter(|p| !p.is_empty())
                .collect()
        })
        .unwrap_or_default();
    let injury_status = find_field(info, "status")
        .map(|s| text(Some(s)))
        .filter(|s| !s.is_empty());

    Player {
        player_id: text(find_field(info, "player_id")),
        player_key: text(find_field(info, "player_key")),
        name,
        selected_position: position.clone(),
        is_starter: position != BENCH_SLOT,
        position,
        eligible_positions,
        headshot_url,
        nfl_team: text(find_field(info, "editorial_team_full_name")),
        nfl_team_abbr: text(find_field(info, "editorial_team_abbr")),
        uniform_number: text(find_field(info, "uniform_number")),
        bye_week: parse_u32(find_field(info, "bye_weeks").and_then(|b| b.get("week"))),
        injury_status,
        points: None,
        stats: None,
    }
}

/// Slot from a `{"selected_position": [...]}` element: the first entry in
/// the list that exposes `position`.
pub fn extract_selected_position(element: &Value) -> Option<String> {
    let slots = element.get("selected_position")?;
    let position = match slots {
        Value::Array(items) => find_field(items, "position"),
        other => other.get("position"),
    };
    position.map(|p| text(Some(p))).filter(|p| !p.is_empty())
}

/// Raw `stat_id`/`value` pairs from a `player_stats` object.
pub fn extract_raw_stats(player_stats: &Value) -> Vec<RawStat> {
    player_stats
        .get("stats")
        .and_then(Value::as_array)
        .map(|stats| {
            stats
                .iter()
                .filter_map(|s| s.get("stat"))
                .map(|stat| RawStat {
                    stat_id: text(stat.get("stat_id")),
                    value: text(stat.get("value")),
                })
                .collect()
        })
        .unwrap_or_default()
}
