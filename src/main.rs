use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use indicatif::ProgressBar;
use nba_compare::analysis::comparison::MetricSet;
use nba_compare::api::client::NbaStatsClient;
use nba_compare::cache::DatasetCache;
use nba_compare::config::Config;
use nba_compare::display::output::{
    display_chart, display_comparison, display_entities, display_error, display_full_rows,
    display_info, display_success,
};
use nba_compare::error::AppError;
use nba_compare::pipeline;
use nba_compare::repository::StatsRepository;
use nba_compare::table::{AggregationMode, EntityKind};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindArg {
    Team,
    Player,
}

impl From<KindArg> for EntityKind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Team => EntityKind::Team,
            KindArg::Player => EntityKind::Player,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    PerGame,
    Totals,
}

impl From<ModeArg> for AggregationMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::PerGame => AggregationMode::PerGame,
            ModeArg::Totals => AggregationMode::Totals,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "NBA Compare")]
#[command(about = "Compare season stats of two NBA teams or players", long_about = None)]
struct Args {
    /// First team or player name
    entity_a: Option<String>,

    /// Second team or player name
    entity_b: Option<String>,

    /// Compare teams or players
    #[arg(short, long, value_enum, default_value = "team")]
    kind: KindArg,

    /// Per-game averages or season totals
    #[arg(short, long, value_enum, default_value = "per-game")]
    mode: ModeArg,

    /// List selectable names and exit
    #[arg(short, long)]
    list: bool,

    /// Season, e.g. 2024-25 (overrides NBA_STATS_SEASON)
    #[arg(long)]
    season: Option<String>,

    /// Season type, e.g. "Regular Season" or "Playoffs"
    #[arg(long)]
    season_type: Option<String>,

    /// Comma separated metric columns (overrides NBA_COMPARE_METRICS)
    #[arg(long)]
    metrics: Option<String>,

    /// Also print every column of both rows
    #[arg(long)]
    full: bool,

    /// Skip the bar chart
    #[arg(long)]
    no_chart: bool,
}

fn main() {
    let args = Args::parse();
    init_logging();

    if let Err(e) = run(args) {
        display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,nba_compare=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(args: Args) -> Result<()> {
    let mut config = Config::from_env().context("loading configuration")?;
    if let Some(season) = args.season {
        config.season = season;
    }
    if let Some(season_type) = args.season_type {
        config.season_type = season_type;
    }
    if let Some(raw) = args.metrics.as_deref() {
        config.metrics = MetricSet::parse_list(raw)?;
    }

    let kind = EntityKind::from(args.kind);
    let mode = AggregationMode::from(args.mode);

    let cache = match config.cache_ttl_minutes {
        Some(minutes) => DatasetCache::with_ttl(chrono::Duration::minutes(i64::from(minutes))),
        None => DatasetCache::new(),
    };
    let client = NbaStatsClient::new(&config);
    let mut repo = StatsRepository::new(client, cache)
        .with_season(config.season.clone(), config.season_type.clone());

    display_info(&format!(
        "{} stats, {} {} ({})",
        kind, config.season, config.season_type, mode
    ));

    let (name_a, name_b) = match (args.entity_a, args.entity_b) {
        (Some(a), Some(b)) if !args.list => (a, b),
        _ => {
            let names = with_spinner("Fetching stats", || {
                pipeline::entity_names(&mut repo, kind, mode)
            })?;
            display_entities(kind, &names);
            if !args.list {
                display_info("Pass two names to compare them");
            }
            return Ok(());
        }
    };

    let report = with_spinner("Fetching stats", || {
        pipeline::compare(&mut repo, kind, mode, &name_a, &name_b, &config.metrics)
    });

    let report = match report {
        Ok(report) => report,
        Err(AppError::EntityNotFound(name)) => {
            suggest_names(&mut repo, kind, mode, &name);
            return Err(AppError::EntityNotFound(name).into());
        }
        Err(e) => return Err(e.into()),
    };

    display_success(&format!("Loaded {} and {}", name_a, name_b));
    display_comparison(&report.result);
    if !args.no_chart {
        display_chart(&report.result.long);
    }
    if args.full {
        let (row_a, row_b) = &report.rows;
        display_full_rows(&name_a, row_a, &name_b, row_b);
    }

    Ok(())
}

fn with_spinner<T>(message: &'static str, f: impl FnOnce() -> T) -> T {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    let out = f();
    pb.finish_and_clear();
    out
}

fn suggest_names(
    repo: &mut StatsRepository<NbaStatsClient>,
    kind: EntityKind,
    mode: AggregationMode,
    query: &str,
) {
    let Ok(names) = pipeline::entity_names(repo, kind, mode) else {
        return;
    };
    let needle = query.to_lowercase();
    let close: Vec<String> = names
        .into_iter()
        .filter(|name| name.to_lowercase().contains(&needle))
        .collect();

    if close.is_empty() {
        display_info(&format!("Run with --list to see every {} name", kind));
    } else {
        display_info(&format!("Did you mean: {}", close.join(", ")));
    }
}
