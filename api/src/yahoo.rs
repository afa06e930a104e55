/// Yahoo Fantasy Sports raw wire types.
///
/// Only the outer envelopes are stable enough for serde structs. Everything
/// below `fantasy_content.league` / `fantasy_content.team` is a mix of
/// arrays-of-arrays, `{"0": .., "1": .., "count": n}` keyed maps and
/// single-key objects whose position varies between endpoints and seasons,
/// so it stays as `serde_json::Value` and is read with the helpers below.
use serde::Deserialize;
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Envelopes
// ---------------------------------------------------------------------------

/// `/league/{key}/standings`, `/league/{key}/scoreboard` and
/// `/league/{key}/players;.../stats` all share this shape:
/// `league[0]` is league metadata, `league[1]` holds the sub-resource.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct LeagueResponse {
    #[serde(default)]
    pub fantasy_content: LeagueContent,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct LeagueContent {
    #[serde(default)]
    pub league: Vec<Value>,
    /// Present instead of `league` when players are requested directly.
    pub players: Option<Value>,
}

impl LeagueContent {
    pub fn metadata(&self) -> Option<&Value> {
        self.league.first()
    }

    pub fn resource(&self) -> Option<&Value> {
        self.league.get(1)
    }
}

/// `/team/{key}/roster;week={w}`: `team[0]` is team info, `team[1]` the roster.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct TeamResponse {
    #[serde(default)]
    pub fantasy_content: TeamContent,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct TeamContent {
    #[serde(default)]
    pub team: Vec<Value>,
}

// ---------------------------------------------------------------------------
// Tolerant reader
// ---------------------------------------------------------------------------

/// One element of a Yahoo info array.
#[derive(Debug, Clone, Copy)]
pub enum Element<'a> {
    List(&'a [Value]),
    Record(&'a Map<String, Value>),
    Scalar(&'a Value),
}

impl<'a> Element<'a> {
    pub fn classify(value: &'a Value) -> Self {
        match value {
            Value::Array(items) => Element::List(items),
            Value::Object(map) => Element::Record(map),
            other => Element::Scalar(other),
        }
    }

    pub fn field(&self, key: &str) -> Option<&'a Value> {
        match *self {
            Element::Record(map) => map.get(key),
            _ => None,
        }
    }
}

/// First element satisfying `pred`, searching nested lists depth-first.
pub fn find_element<'a>(
    elements: &'a [Value],
    pred: &dyn Fn(&Element<'a>) -> bool,
) -> Option<Element<'a>> {
    for value in elements {
        let element = Element::classify(value);
        if pred(&element) {
            return Some(element);
        }
        if let Element::List(nested) = element
            && let Some(found) = find_element(nested, pred)
        {
            return Some(found);
        }
    }
    None
}

/// Value of the first record in `elements` that carries `key`.
pub fn find_field<'a>(elements: &'a [Value], key: &str) -> Option<&'a Value> {
    find_element(elements, &|e| e.field(key).is_some()).and_then(|e| e.field(key))
}

/// Same as [`find_field`] but starting from an arbitrary value: arrays are
/// scanned, objects are looked up directly.
pub fn lookup<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    match value {
        Value::Array(items) => find_field(items, key),
        Value::Object(map) => map.get(key),
        _ => None,
    }
}

/// Positional access that accepts both `[a, b]` and `{"0": a, "1": b}`.
pub fn at(value: &Value, index: usize) -> Option<&Value> {
    match value {
        Value::Array(items) => items.get(index),
        Value::Object(map) => map.get(&index.to_string()),
        _ => None,
    }
}

/// The declared `count` of a keyed map. Yahoo sends it as a number, but
/// string counts show up in older seasons.
pub fn keyed_count(map: &Value) -> usize {
    map.get("count")
        .map(|c| parse_u32(Some(c)) as usize)
        .unwrap_or(0)
}

/// Slots `0..count` of a keyed map. A slot is `None` when the key is missing.
/// The declared count is capped at the number of entries actually present.
pub fn keyed_slots(map: &Value) -> impl Iterator<Item = (usize, Option<&Value>)> {
    let present = match map {
        Value::Object(obj) => obj.len(),
        Value::Array(items) => items.len(),
        _ => 0,
    };
    (0..keyed_count(map).min(present)).map(move |i| (i, at(map, i)))
}

/// Every entry of a keyed map except `count`, in numeric key order.
pub fn keyed_entries(map: &Value) -> Vec<(&str, &Value)> {
    let Some(obj) = map.as_object() else {
        return Vec::new();
    };
    let mut entries: Vec<(&str, &Value)> = obj
        .iter()
        .filter(|(k, _)| k.as_str() != "count")
        .map(|(k, v)| (k.as_str(), v))
        .collect();
    entries.sort_by_key(|(k, _)| (k.parse::<usize>().unwrap_or(usize::MAX), k.to_string()));
    entries
}

// ---------------------------------------------------------------------------
// Scalars: Yahoo sends almost every number as a string
// ---------------------------------------------------------------------------

pub fn text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

pub fn parse_f64(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(Value::Number(n)) => n.as_f64(),
        _ => None,
    };
    parsed.filter(|f| f.is_finite()).unwrap_or(0.0)
}

pub fn parse_u32(value: Option<&Value>) -> u32 {
    let parsed = match value {
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<u32>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite() && *f >= 0.0)
                    .map(|f| f as u32)
            })
        }
        Some(Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        _ => None,
    };
    parsed.unwrap_or(0)
}

/// Yahoo flags are "1"/"0" strings, occasionally real booleans.
pub fn parse_flag(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        other => parse_u32(other) != 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn find_field_ignores_order_and_empty_lists() {
        let info = json!([
            {"team_key": "449.l.1.t.3"},
            [],
            {"name": "Dak to the Future"},
            {"team_id": "3"}
        ]);
        let items = info.as_array().unwrap();
        assert_eq!(text(find_field(items, "team_id")), "3");
        assert_eq!(text(find_field(items, "name")), "Dak to the Future");
        assert!(find_field(items, "team_logos").is_none());
    }

    #[test]
    fn find_field_descends_into_nested_lists() {
        let info = json!([[{"player_key": "449.p.1"}], [[{"player_id": "30977"}]]]);
        assert_eq!(text(find_field(info.as_array().unwrap(), "player_id")), "30977");
    }

    #[test]
    fn at_accepts_arrays_and_keyed_objects() {
        let arr = json!([{"a": 1}]);
        let obj = json!({"0": {"a": 1}, "count": 1});
        assert_eq!(at(&arr, 0), at(&obj, 0));
        assert!(at(&arr, 1).is_none());
        assert!(at(&json!("x"), 0).is_none());
    }

    #[test]
    fn keyed_slots_reports_missing_keys() {
        let map = json!({"0": "a", "2": "c", "count": 3});
        let slots: Vec<_> = keyed_slots(&map).map(|(i, v)| (i, v.is_some())).collect();
        assert_eq!(slots, vec![(0, true), (1, false), (2, true)]);
    }

    #[test]
    fn keyed_slots_ignore_inflated_counts() {
        let map = json!({"0": "a", "1": "b", "count": "4294967295"});
        assert_eq!(keyed_slots(&map).count(), 3);
        assert_eq!(keyed_slots(&map).filter(|(_, v)| v.is_some()).count(), 2);
    }

    #[test]
    fn keyed_count_accepts_string_counts() {
        assert_eq!(keyed_count(&json!({"count": "4"})), 4);
        assert_eq!(keyed_count(&json!({"count": 2})), 2);
        assert_eq!(keyed_count(&json!({})), 0);
    }

    #[test]
    fn keyed_entries_skip_count_and_sort_numerically() {
        let map = json!({"10": "k", "2": "c", "0": "a", "count": 3});
        let keys: Vec<&str> = keyed_entries(&map).into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["0", "2", "10"]);
    }

    #[test]
    fn numeric_strings_parse_leniently() {
        assert_eq!(parse_u32(Some(&json!("188"))), 188);
        assert_eq!(parse_u32(Some(&json!(""))), 0);
        assert_eq!(parse_u32(Some(&json!("n/a"))), 0);
        assert_eq!(parse_u32(None), 0);
        assert_eq!(parse_f64(Some(&json!("0.700"))), 0.7);
        assert_eq!(parse_f64(Some(&json!("NaN"))), 0.0);
        assert_eq!(parse_f64(Some(&json!("-"))), 0.0);
        assert_eq!(parse_f64(Some(&json!(12.5))), 12.5);
    }

    #[test]
    fn flags() {
        assert!(parse_flag(Some(&json!("1"))));
        assert!(!parse_flag(Some(&json!("0"))));
        assert!(parse_flag(Some(&json!(true))));
        assert!(!parse_flag(None));
    }

    #[test]
    fn envelopes_tolerate_missing_content() {
        let raw: LeagueResponse = serde_json::from_str("{}").unwrap();
        assert!(raw.fantasy_content.metadata().is_none());
        let raw: TeamResponse = serde_json::from_str(r#"{"fantasy_content": {}}"#).unwrap();
        assert!(raw.fantasy_content.team.is_empty());
    }
}
