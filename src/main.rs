mod cache;
mod config;
mod news;
mod open_url;
mod render;
mod ui;
mod util;

use anyhow::{Context, Result};
use std::{
    env, fs,
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Arc,
};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use cache::{CacheStore, FileStore};
use news::{FetchOutcome, NewsFetcher};
use render::Surface;

#[derive(Debug, Default)]
struct Args {
    config: Option<String>,
    refresh: bool,
    once: bool,
    html: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let Some(args) = parse_args(env::args().skip(1)) else {
        print_help();
        return Ok(ExitCode::SUCCESS);
    };

    let cfg = config::load(args.config.clone())?;

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .parse_lossy(&cfg.log_level),
        )
        .init();

    tracing::debug!(cache_dir = %cfg.cache_dir.display(), "starting news-desk");

    let surface = Arc::new(Surface::new());
    let cache = CacheStore::new(Arc::new(FileStore::new(&cfg.cache_dir)));
    let fetcher = Arc::new(NewsFetcher::new(cfg.api.clone(), cache, surface.clone())?);

    if args.once || args.html.is_some() {
        let outcome = fetcher.fetch_news(args.refresh).await;
        tracing::debug!(state = ?fetcher.state(), "fetch finished");
        if let Some(path) = &args.html {
            export_html(&surface, cfg.header.as_deref(), path)?;
        }
        if args.once {
            render::terminal::paint(&surface.snapshot(), cfg.header.as_deref());
        }
        return Ok(match outcome {
            FetchOutcome::Misconfigured(_) | FetchOutcome::Unavailable(_) => ExitCode::FAILURE,
            _ => ExitCode::SUCCESS,
        });
    }

    let mut force_next = args.refresh;
    loop {
        let items: Vec<String> = ["Headlines", "Refresh", "Export HTML", "Quit"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let banner = render::terminal::banner_lines(&surface.snapshot(), cfg.header.as_deref());
        let choice = ui::Menu::new("Main Menu (b = back/quit)", &items)
            .with_default(0)
            .with_banner(&banner)
            .choose()?;
        match choice {
            ui::MenuChoice::Back | ui::MenuChoice::Quit | ui::MenuChoice::Index(3) => break,
            ui::MenuChoice::Index(0) => {
                fetcher.fetch_news(std::mem::take(&mut force_next)).await;
                if news::browse(&cfg, &surface)? {
                    break;
                }
            }
            ui::MenuChoice::Index(1) => {
                fetcher.fetch_news(true).await;
                if news::browse(&cfg, &surface)? {
                    break;
                }
            }
            ui::MenuChoice::Index(2) => {
                let path = cfg.cache_dir.join("headlines.html");
                fetcher.fetch_news(std::mem::take(&mut force_next)).await;
                if let Err(err) = export_html(&surface, cfg.header.as_deref(), &path) {
                    tracing::error!(error = %format!("{err:#}"), "export failed");
                }
            }
            _ => {}
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn export_html(surface: &Surface, header: Option<&str>, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let html = render::html::page(&surface.snapshot(), header);
    fs::write(path, html).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "wrote headlines page");
    Ok(())
}

/// `None` when help was requested.
fn parse_args(mut it: impl Iterator<Item = String>) -> Option<Args> {
    let mut args = Args::default();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--config" => args.config = it.next(),
            "--refresh" => args.refresh = true,
            "--once" => args.once = true,
            "--html" => args.html = it.next().map(PathBuf::from),
            "-h" | "--help" => return None,
            other => eprintln!("ignoring unknown argument: {other}"),
        }
    }
    Some(args)
}

fn print_help() {
    println!("news-desk");
    println!("Usage: news-desk [--config <path>] [--refresh] [--once] [--html <path>]");
    println!("  --config <path>  Path to a config.toml");
    println!("  --refresh        Skip the cache for the first fetch");
    println!("  --once           Print the headlines page and exit");
    println!("  --html <path>    Write the headlines page as HTML and exit");
}
