use std::fs::File;
use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Context;
use color_eyre::Result;
use log::info;

mod config;
mod cycle;
mod notify;
mod scraper;
mod storage;

use crate::notify::Typetalk;
use crate::scraper::{DetailStrategy, HttpFetch, ListingStrategy};
use crate::storage::RedisStore;

#[derive(Parser, Debug)]
#[command(
    name = "lsf_notifier",
    about = "Posts a Typetalk message when a watched lsf.jp listing's vacancy count changes"
)]
struct Args {
    /// Config file path; defaults to conf.json next to the executable
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log file path; stderr when omitted
    #[arg(long)]
    log: Option<PathBuf>,

    /// Where to read vacancy counts from
    #[arg(long, value_enum, default_value_t = StrategyChoice::Listing)]
    strategy: StrategyChoice,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum StrategyChoice {
    /// One shared listing page for all houses
    Listing,
    /// One detail page per house
    Detail,
}

fn init_logging(log_path: Option<&PathBuf>) -> Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(path) = log_path {
        let file = File::create(path)
            .wrap_err_with(|| format!("failed to open log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let config_path = match args.config {
        Some(path) => path,
        None => config::default_path()?,
    };
    let config = config::Config::load(&config_path)?;
    init_logging(args.log.as_ref())?;

    let mut store = RedisStore::connect(&config)?;
    let notifier = Typetalk::new(config.typetalk_topic_id, config.typetalk_token.clone());

    info!("Checking {} house(s)", config.house_ids.len());
    let changed = match args.strategy {
        StrategyChoice::Listing => cycle::run(
            &ListingStrategy,
            &HttpFetch,
            &mut store,
            &notifier,
            &config.house_ids,
        ),
        StrategyChoice::Detail => cycle::run(
            &DetailStrategy,
            &HttpFetch,
            &mut store,
            &notifier,
            &config.house_ids,
        ),
    };
    info!("Run complete: {changed} change(s) detected");

    Ok(())
}
