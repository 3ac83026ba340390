//! `brigada`: command-line front end for the brigade roster and citations.
//!
//! # Usage
//!
//! ```
//! brigada login --demo admin
//! brigada personnel list --status Todos
//! brigada citations confirm 3 --yes
//! brigada shell
//! ```
//!
//! Configuration is read from `brigada.toml` (or `--config FILE`) and
//! `BRIGADA_*` environment variables. Records live in memory only; use
//! `brigada shell` to keep changes across commands.

mod app;
mod cli;
mod config;
mod render;
mod session;

use anyhow::Result;
use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::{
  app::App,
  cli::{Args, Command},
  config::AppConfig,
};

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();
  let config = AppConfig::load(args.config)?;
  tracing::debug!(?config, "configuration loaded");

  let app = App::new(&config, args.json);
  match args.command {
    Command::Shell => app.shell().await,
    command => app.run(command).await,
  }
}
