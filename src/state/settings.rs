use std::path::PathBuf;

pub const ENV_ACCESS_TOKEN: &str = "YAHOO_ACCESS_TOKEN";
pub const ENV_LEAGUE_KEY: &str = "FANTASY_LEAGUE_KEY";
pub const ENV_API_BASE: &str = "YAHOO_API_BASE";
pub const ENV_FIXTURE_DIR: &str = "FANTASY_FIXTURE_DIR";

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Settings {
    pub access_token: Option<String>,
    pub league_key: Option<String>,
    pub api_base: Option<String>,
    /// Read raw Yahoo payloads from this directory instead of the network.
    pub fixture_dir: Option<PathBuf>,
}

impl Settings {
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());
        Self {
            access_token: get(ENV_ACCESS_TOKEN),
            league_key: get(ENV_LEAGUE_KEY).map(|k| normalize_league_key(&k)),
            api_base: get(ENV_API_BASE),
            fixture_dir: get(ENV_FIXTURE_DIR).map(PathBuf::from),
        }
    }
}

/// A bare league id ("12345") resolves against the current NFL season.
pub fn normalize_league_key(key: &str) -> String {
    if !key.is_empty() && key.chars().all(|c| c.is_ascii_digit()) {
        format!("nfl.l.{key}")
    } else {
        key.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Settings {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Settings::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn reads_every_variable() {
        let s = settings(&[
            (ENV_ACCESS_TOKEN, "tok"),
            (ENV_LEAGUE_KEY, "449.l.12345"),
            (ENV_API_BASE, "http://localhost:9000"),
            (ENV_FIXTURE_DIR, "/tmp/fixtures"),
        ]);
        assert_eq!(s.access_token.as_deref(), Some("tok"));
        assert_eq!(s.league_key.as_deref(), Some("449.l.12345"));
        assert_eq!(s.api_base.as_deref(), Some("http://localhost:9000"));
        assert_eq!(s.fixture_dir, Some(PathBuf::from("/tmp/fixtures")));
    }

    #[test]
    fn blank_values_are_unset() {
        let s = settings(&[(ENV_ACCESS_TOKEN, "  "), (ENV_FIXTURE_DIR, "")]);
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn bare_league_id_gets_nfl_prefix() {
        assert_eq!(normalize_league_key("12345"), "nfl.l.12345");
        assert_eq!(normalize_league_key("449.l.12345"), "449.l.12345");
        let s = settings(&[(ENV_LEAGUE_KEY, " 777 ")]);
        assert_eq!(s.league_key.as_deref(), Some("nfl.l.777"));
    }
}
