mod state;

use crate::state::service::RecapService;
use crate::state::settings::{ENV_ACCESS_TOKEN, ENV_LEAGUE_KEY, Settings};
use crate::state::source::DataSource;
use anyhow::Context;
use log::info;
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use yahoo_fantasy_api::client::YahooApi;

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Standings,
    Matchups { week: u32 },
    Summary { week: u32, index: usize },
    Team { team_id: String, week: u32 },
}

#[derive(Debug, Clone, PartialEq)]
enum CliAction {
    Help,
    Version,
    Run(Command),
}

/// Everything printed to stdout is wrapped in this.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Report<T: Serialize> {
    league_key: String,
    generated_at: String,
    data: T,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let command = match parse_args(std::env::args().skip(1)) {
        Ok(CliAction::Help) => {
            println!("{}", usage_text());
            return Ok(());
        }
        Ok(CliAction::Version) => {
            println!("fantasy-recap {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Ok(CliAction::Run(command)) => command,
        Err(message) => {
            eprintln!("{message}\n\n{}", usage_text());
            std::process::exit(2);
        }
    };

    better_panic::install();
    setup_logging();

    let settings = Settings::load();
    let service = build_service(&settings)?;
    info!("running {command:?} against {}", service.league_key());

    match command {
        Command::Standings => print_report(&service, service.standings().await?),
        Command::Matchups { week } => print_report(&service, service.week_matchups(week).await?),
        Command::Summary { week, index } => {
            print_report(&service, service.head_to_head(week, index).await?)
        }
        Command::Team { team_id, week } => {
            print_report(&service, service.team_summary(&team_id, week).await?)
        }
    }
}

/// Logs go to stderr so stdout stays valid JSON. `RUST_LOG` overrides the
/// default `warn` level.
fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_service(settings: &Settings) -> anyhow::Result<RecapService> {
    let league_key = settings
        .league_key
        .clone()
        .with_context(|| format!("{ENV_LEAGUE_KEY} is not set"))?;

    let source = match &settings.fixture_dir {
        Some(dir) => DataSource::Fixtures(dir.clone()),
        None => {
            let token = settings
                .access_token
                .clone()
                .with_context(|| format!("{ENV_ACCESS_TOKEN} is not set"))?;
            let api = match &settings.api_base {
                Some(base) => YahooApi::with_base_url(base, token),
                None => YahooApi::new(token),
            };
            DataSource::Live(api)
        }
    };

    Ok(RecapService::new(source, league_key))
}

fn print_report<T: Serialize>(service: &RecapService, data: T) -> anyhow::Result<()> {
    let report = Report {
        league_key: service.league_key().to_owned(),
        generated_at: chrono::Utc::now().to_rfc3339(),
        data,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<CliAction, String> {
    let args: Vec<String> = args.into_iter().collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    let command = match args.as_slice() {
        [] | ["-h" | "--help", ..] => return Ok(CliAction::Help),
        ["-V" | "--version", ..] => return Ok(CliAction::Version),
        ["standings"] => Command::Standings,
        ["matchups", week] => Command::Matchups { week: parse_number("week", week)? },
        ["summary", week, index] => Command::Summary {
            week: parse_number("week", week)?,
            index: parse_number("index", index)?,
        },
        ["team", team_id, week] => Command::Team {
            team_id: (*team_id).to_owned(),
            week: parse_number("week", week)?,
        },
        [other, ..] => return Err(format!("Unknown or incomplete command: {other}")),
    };
    Ok(CliAction::Run(command))
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, String> {
    value
        .parse()
        .map_err(|_| format!("Invalid {name}: {value}"))
}

fn usage_text() -> &'static str {
    "fantasy-recap - Yahoo Fantasy Football league recaps as JSON

Usage:
  fantasy-recap standings
  fantasy-recap matchups <week>
  fantasy-recap summary <week> <matchup-index>
  fantasy-recap team <team-id> <week>
  fantasy-recap --help
  fantasy-recap --version

Environment:
  YAHOO_ACCESS_TOKEN    OAuth bearer token for the Yahoo Fantasy API
  FANTASY_LEAGUE_KEY    League key (e.g. 449.l.12345) or bare league id
  YAHOO_API_BASE        Override the API base URL
  FANTASY_FIXTURE_DIR   Read saved Yahoo payloads from this directory instead
  RUST_LOG              Log filter for stderr output (default warn)"
}
