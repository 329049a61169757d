use std::{path::PathBuf, time::Duration};

use anyhow::Context as _;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "bgwrapped", version, about = "Render a board-game year in review")]
struct Cli {
    /// Play-log export JSON.
    #[arg(long = "in", default_value = "BGStatsExport.json")]
    in_path: PathBuf,

    /// Calendar year to report on. All-time when omitted.
    #[arg(short, long)]
    year: Option<i32>,

    /// Output directory. Defaults to `wrapped<YEAR>` or `wrappedAllTime`.
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Discard the entity cache before resolving.
    #[arg(short = 'n', long = "new")]
    refresh: bool,

    /// Neither read nor write the entity cache.
    #[arg(long)]
    no_cache: bool,

    /// Entity cache file.
    #[arg(long, default_value = "cache/entities.json")]
    cache: PathBuf,

    /// Game metadata JSON keyed by external id, used when entities must be resolved.
    #[arg(long)]
    metadata: Option<PathBuf>,

    /// Root directory for templates, fonts and cover art.
    #[arg(long, default_value = ".")]
    assets: PathBuf,

    /// Report layout JSON replacing the built-in layout for `--style`.
    #[arg(long)]
    layout: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = StyleChoice::Panels)]
    style: StyleChoice,

    /// Fixed delay between sequential metadata lookups.
    #[arg(long, default_value_t = 0)]
    lookup_delay_ms: u64,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StyleChoice {
    Panels,
    StoryCard,
}

impl From<StyleChoice> for bgwrapped::ReportStyle {
    fn from(c: StyleChoice) -> Self {
        match c {
            StyleChoice::Panels => Self::Panels,
            StyleChoice::StoryCard => Self::StoryCard,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    run(cli)
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let period = bgwrapped::Period::from_year(cli.year);
    let log = bgwrapped::PlayLog::from_path(&cli.in_path)
        .with_context(|| format!("load play log '{}'", cli.in_path.display()))?;

    let metadata = match &cli.metadata {
        Some(p) => bgwrapped::MetadataFileResolver::from_path(p)
            .with_context(|| format!("load metadata '{}'", p.display()))?,
        None => bgwrapped::MetadataFileResolver::from_entries([]),
    };
    let mut resolver =
        bgwrapped::ThrottledResolver::new(metadata, Duration::from_millis(cli.lookup_delay_ms));
    let mut cache = bgwrapped::JsonFileCache::new(&cli.cache);
    let policy = bgwrapped::CachePolicy {
        use_cache: !cli.no_cache,
        refresh: cli.refresh,
    };
    let entities = bgwrapped::load_or_resolve(policy, &mut cache, &log, &mut resolver)?;

    let aggregate = bgwrapped::aggregate(&log, &entities)?;

    let mut req = bgwrapped::ReportRequest::new(period, &cli.assets, cli.style.into());
    if let Some(out) = cli.out {
        req.output_dir = out;
    }
    if let Some(p) = &cli.layout {
        req.layout = bgwrapped::ReportLayout::from_path(p)
            .with_context(|| format!("load layout '{}'", p.display()))?;
    }

    let written = bgwrapped::generate_report(&req, &aggregate)?;
    for w in &written {
        eprintln!("wrote {}", w.path.display());
    }
    Ok(())
}
