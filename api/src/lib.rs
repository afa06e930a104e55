pub mod client;
pub mod extract;
pub mod merge;
pub mod summary;
pub mod transform;
pub mod yahoo;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Domain types: clean model, independent of Yahoo wire format
// ---------------------------------------------------------------------------
//
// Serialized field names are the names the HTTP layer hands to the front end,
// so everything here is camelCase on the wire.

/// Slot value Yahoo uses for bench players.
pub const BENCH_SLOT: &str = "BN";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub team_id: String,
    pub team_key: String,
    pub name: String,
    pub logo_url: String,
    pub url: String,
    pub manager: Manager,
    pub number_of_moves: u32,
    pub number_of_trades: u32,
    pub faab_balance: u32,
    pub waiver_priority: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manager {
    pub manager_id: String,
    pub nickname: String,
    /// Yahoo's manager rating ("felo").
    pub felo_score: u32,
    pub felo_tier: String,
    pub image_url: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StreakKind {
    Win,
    #[default]
    Loss,
}

impl StreakKind {
    /// Case-insensitive; anything that isn't "win" counts as a losing streak.
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("win") {
            StreakKind::Win
        } else {
            StreakKind::Loss
        }
    }

    pub fn prefix(&self) -> char {
        match self {
            StreakKind::Win => 'W',
            StreakKind::Loss => 'L',
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Streak {
    #[serde(rename = "type")]
    pub kind: StreakKind,
    pub value: u32,
}

impl Streak {
    /// "W3" / "L2"
    pub fn display(&self) -> String {
        format!("{}{}", self.kind.prefix(), self.value)
    }
}

/// Season state for one team as of a standings snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamStandings {
    pub rank: u32,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub win_percentage: f64,
    pub points_for: f64,
    pub points_against: f64,
    pub streak: Streak,
    pub playoff_seed: u32,
}

impl TeamStandings {
    /// "7-3", or "7-3-1" when the team has ties.
    pub fn record(&self) -> String {
        format_record(self.wins, self.losses, self.ties)
    }
}

pub fn format_record(wins: u32, losses: u32, ties: u32) -> String {
    if ties > 0 {
        format!("{wins}-{losses}-{ties}")
    } else {
        format!("{wins}-{losses}")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingsTeam {
    #[serde(flatten)]
    pub team: Team,
    pub standings: TeamStandings,
}

/// Teams are in extraction order, which is not necessarily rank order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformedStandings {
    pub league_key: String,
    pub league_name: String,
    pub current_week: u32,
    pub teams: Vec<StandingsTeam>,
}

impl TransformedStandings {
    pub fn find_team(&self, team_id: &str) -> Option<&StandingsTeam> {
        self.teams.iter().find(|t| t.team.team_id == team_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub player_id: String,
    pub player_key: String,
    pub name: String,
    /// Listed position ("WR", "QB,RB" for multi-eligible players).
    pub position: String,
    /// Slot the player was actually used in that week.
    pub selected_position: String,
    pub is_starter: bool,
    pub eligible_positions: Vec<String>,
    pub headshot_url: String,
    pub nfl_team: String,
    pub nfl_team_abbr: String,
    pub uniform_number: String,
    pub bye_week: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub injury_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<Vec<RawStat>>,
}

/// Undecoded Yahoo stat line entry: stat id and its value as sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStat {
    pub stat_id: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    pub points: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_stats: Option<Vec<RawStat>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamSide {
    #[serde(flatten)]
    pub team: Team,
    pub points: f64,
    pub projected_points: f64,
    pub players: Vec<Player>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub standings: Option<TeamStandings>,
}

impl TeamSide {
    pub fn over_under(&self) -> f64 {
        self.points - self.projected_points
    }
}

/// One head-to-head pairing. Side order is stable but carries no home/away
/// meaning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Matchup {
    /// "{managerIdA}-vs-{managerIdB}". Not unique across weeks.
    pub id: String,
    pub week: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week_start: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week_end: Option<NaiveDate>,
    pub status: String,
    pub is_playoffs: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner_team_key: Option<String>,
    pub team1: TeamSide,
    pub team2: TeamSide,
}

impl Matchup {
    pub fn sides(&self) -> [&TeamSide; 2] {
        [&self.team1, &self.team2]
    }

    pub fn involves(&self, team_id: &str) -> bool {
        self.side_for(team_id).is_some()
    }

    /// The side belonging to `team_id`, checking team1 first.
    pub fn side_for(&self, team_id: &str) -> Option<&TeamSide> {
        self.sides().into_iter().find(|s| s.team.team_id == team_id)
    }

    pub fn opponent_of(&self, team_id: &str) -> Option<&TeamSide> {
        if self.team1.team.team_id == team_id {
            Some(&self.team2)
        } else if self.team2.team.team_id == team_id {
            Some(&self.team1)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn streak_kind_parses_case_insensitively() {
        assert_eq!(StreakKind::parse("win"), StreakKind::Win);
        assert_eq!(StreakKind::parse("WIN"), StreakKind::Win);
        assert_eq!(StreakKind::parse("loss"), StreakKind::Loss);
        assert_eq!(StreakKind::parse(""), StreakKind::Loss);
    }

    #[test]
    fn streak_display() {
        let s = Streak { kind: StreakKind::Win, value: 3 };
        assert_eq!(s.display(), "W3");
        let s = Streak { kind: StreakKind::Loss, value: 2 };
        assert_eq!(s.display(), "L2");
    }

    #[test]
    fn record_omits_zero_ties() {
        assert_eq!(format_record(7, 3, 0), "7-3");
        assert_eq!(format_record(6, 3, 1), "6-3-1");
    }

    #[test]
    fn team_side_serializes_flat_with_camel_case() {
        let side = TeamSide {
            team: Team { team_id: "4".into(), name: "Gridiron Gang".into(), ..Default::default() },
            points: 101.5,
            projected_points: 98.0,
            ..Default::default()
        };
        let v = serde_json::to_value(&side).unwrap();
        assert_eq!(v["teamId"], "4");
        assert_eq!(v["projectedPoints"], 98.0);
        assert!(v.get("standings").is_none(), "absent standings must be omitted");
    }

    #[test]
    fn streak_serializes_as_type_and_value() {
        let s = Streak { kind: StreakKind::Win, value: 4 };
        let v = serde_json::to_value(s).unwrap();
        assert_eq!(v, serde_json::json!({ "type": "Win", "value": 4 }));
    }

    #[test]
    fn matchup_side_lookup() {
        let mut m = Matchup::default();
        m.team1.team.team_id = "1".into();
        m.team2.team.team_id = "2".into();
        assert!(m.involves("2"));
        assert!(!m.involves("3"));
        assert_eq!(m.opponent_of("1").map(|s| s.team.team_id.as_str()), Some("2"));
        assert!(m.opponent_of("3").is_none());
    }
}
