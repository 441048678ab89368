use std::{
    fs::create_dir_all,
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use anyhow::{Context, Result};
use chrono::{Duration, Local};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use pagecount_arch::{Archive, ArchiveConfig, HttpDirectory, TimeWindow};

/// Batch download hourly page view count archives for a date range.
#[derive(Debug, Parser)]
#[command(name = "pagecount-fetch", version)]
struct Args {
    /// First day of the window, YYYYMMDD. Defaults to yesterday.
    #[arg(short, long)]
    start: Option<String>,

    /// Last day of the window, YYYYMMDD. Defaults to today.
    #[arg(short, long)]
    end: Option<String>,

    /// Local archive root. Defaults to ./Data
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// TOML file overriding the remote layout and download settings.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Concurrent downloads within a month.
    #[arg(short, long)]
    jobs: Option<usize>,
}

fn main() {
    init_logging();

    if let Err(err) = run(Args::parse()) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Args) -> Result<()> {
    let today = Local::now().date_naive();
    let start = args
        .start
        .unwrap_or_else(|| (today - Duration::days(1)).format("%Y%m%d").to_string());
    let end = args.end.unwrap_or_else(|| today.format("%Y%m%d").to_string());
    let window = TimeWindow::parse(&start, &end)?;

    let mut config = match &args.config {
        Some(path) => ArchiveConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ArchiveConfig::default(),
    };
    if let Some(jobs) = args.jobs {
        config.download_threads = jobs;
    }
    let config = config.validated()?;

    let root = match args.dir {
        Some(dir) => dir,
        None => std::env::current_dir()?.join("Data"),
    };
    create_dir_all(&root).with_context(|| format!("creating {}", root.display()))?;

    let interrupt = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&interrupt);
    ctrlc::set_handler(move || {
        eprintln!("Received interrupt, stopping after the current file...");
        handler_flag.store(true, Ordering::SeqCst);
    })
    .context("installing interrupt handler")?;

    let remote = HttpDirectory::connect(&config)?;
    let archive = Archive::connect(root, remote, config)?.with_interrupt(interrupt);
    let report = archive.retrieve_range(window)?;

    println!("{}", report);
    Ok(())
}
