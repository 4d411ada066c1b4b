use anyhow::{anyhow, Context};
use clap::Parser;
use dom_locator::{resolve_with_report, Dialect, HtmlDocument, ResolverConfig};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "dom-locator",
    version,
    about = "Generate a stable selector for an element in an HTML page"
)]
struct Args {
    /// HTML file to load
    #[arg(long)]
    html: PathBuf,

    /// CSS query picking the target element (first match wins)
    #[arg(long)]
    target: String,

    /// Output dialect, overrides the config file
    #[arg(long)]
    dialect: Option<Dialect>,

    /// JSON resolver configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the full resolution report as JSON
    #[arg(long)]
    report: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ResolverConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ResolverConfig::default(),
    };
    if let Some(dialect) = args.dialect {
        config.dialect = dialect;
    }

    let content = std::fs::read_to_string(&args.html)
        .with_context(|| format!("reading {}", args.html.display()))?;
    let document = HtmlDocument::parse(&content);
    let target = document
        .select_first(&args.target)?
        .ok_or_else(|| anyhow!("no element matches target query {:?}", args.target))?;

    info!("Resolving {} selector for {:?}", config.dialect, args.target);
    let resolution = resolve_with_report(&document, &target, &config)?;

    if args.report {
        println!("{}", serde_json::to_string_pretty(&resolution)?);
    } else {
        println!("{}", resolution.selector);
    }
    Ok(())
}
