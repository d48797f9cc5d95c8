use std::{num::NonZeroU32, path::PathBuf, sync::Arc};

use anyhow::Result;
use clap::Parser;
use client_core::{CollectionStore, FilterState, HttpRecordService, RecordManager, RecordService};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod render;
mod session;

use commands::parse_command;
use config::load_settings;
use session::{Flow, Session};

#[derive(Parser, Debug)]
#[command(about = "Browse, add, edit and delete freelancer records")]
struct Args {
    /// Record service base URL; overrides config file and environment.
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long, default_value = "freelancer.toml")]
    config: PathBuf,
    #[arg(long)]
    page_size: Option<NonZeroU32>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings(&args.config);
    if let Some(url) = args.server_url {
        settings.base_url = url;
    }
    if let Some(size) = args.page_size {
        settings.page_size = size;
    }
    info!(base_url = %settings.base_url, page_size = settings.page_size.get(), "record service");

    let service: Arc<dyn RecordService> = Arc::new(HttpRecordService::new(&settings.base_url)?);
    let store = CollectionStore::with_filters(
        service.clone(),
        FilterState::with_page_size(settings.page_size),
    );
    let mut session = Session::new(RecordManager::with_store(service, store));

    let mut stdout = tokio::io::stdout();
    let mut out = String::new();
    session.handle(commands::Command::Refresh, &mut out).await;
    out.push_str("type 'help' for commands\n");
    stdout.write_all(out.as_bytes()).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        let mut out = String::new();
        let flow = match parse_command(&line) {
            Ok(Some(command)) => session.handle(command, &mut out).await,
            Ok(None) => Flow::Continue,
            Err(err) => {
                out.push_str(&format!("error: {err:#}\n"));
                Flow::Continue
            }
        };
        stdout.write_all(out.as_bytes()).await?;
        if flow == Flow::Quit {
            break;
        }
    }

    Ok(())
}
