//! Layered configuration: defaults, then an optional TOML file, then
//! `BRIGADA_*` environment variables.

use std::{path::PathBuf, time::Duration};

use anyhow::Context as _;
use serde::Deserialize;

use brigada_repository::Latency;
use brigada_store_memory::{RejectAttendance, StoreOptions};

/// Config file read when `--config` is not given.
pub const DEFAULT_FILE: &str = "brigada.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
  /// Uniform simulated latency. Unset keeps the per-operation defaults.
  pub latency_ms:        Option<u64>,
  pub reject_attendance: RejectAttendance,
  /// Where the login session is kept between invocations.
  pub session_path:      PathBuf,
  /// Start from the demo roster instead of an empty store.
  pub seed:              bool,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      latency_ms:        None,
      reject_attendance: RejectAttendance::default(),
      session_path:      PathBuf::from(".brigada-session.json"),
      seed:              true,
    }
  }
}

impl AppConfig {
  /// Read `path` (or [`DEFAULT_FILE`] if absent) and the environment. An
  /// explicitly named file must exist.
  pub fn load(path: Option<PathBuf>) -> anyhow::Result<Self> {
    let required = path.is_some();
    let path = path.unwrap_or_else(|| PathBuf::from(DEFAULT_FILE));
    let builder = config::Config::builder()
      .add_source(config::File::from(path.clone()).required(required))
      .add_source(config::Environment::with_prefix("BRIGADA"));
    Self::from_builder(builder)
      .with_context(|| format!("failed to load configuration from {}", path.display()))
  }

  fn from_builder(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
  ) -> anyhow::Result<Self> {
    builder
      .build()
      .context("failed to read configuration")?
      .try_deserialize()
      .context("failed to deserialise AppConfig")
  }

  pub fn latency(&self) -> Latency {
    match self.latency_ms {
      None => Latency::default(),
      Some(ms) => {
        let d = Duration::from_millis(ms);
        Latency {
          list:       d,
          get:        d,
          mutate:     d,
          attendance: d,
          stats:      d,
          login:      d,
        }
      }
    }
  }

  pub fn store_options(&self) -> StoreOptions {
    StoreOptions {
      reject_attendance: self.reject_attendance,
    }
  }
}

#[cfg(test)]
mod tests {
  use config::{File, FileFormat};

  use super::*;

  fn parse(toml: &str) -> AppConfig {
    AppConfig::from_builder(
      config::Config::builder().add_source(File::from_str(toml, FileFormat::Toml)),
    )
    .unwrap()
  }

  #[test]
  fn empty_file_gives_defaults() {
    assert_eq!(parse(""), AppConfig::default());
    assert_eq!(AppConfig::default().latency(), Latency::default());
  }

  #[test]
  fn file_values_override_defaults() {
    let cfg = parse(
      r#"
        latency_ms = 0
        reject_attendance = "decrement"
        session_path = "/tmp/s.json"
        seed = false
      "#,
    );
    assert_eq!(cfg.latency(), Latency::none());
    assert_eq!(cfg.store_options().reject_attendance, RejectAttendance::Decrement);
    assert_eq!(cfg.session_path, PathBuf::from("/tmp/s.json"));
    assert!(!cfg.seed);
  }

  #[test]
  fn uniform_latency() {
    let cfg = parse("latency_ms = 20");
    assert_eq!(cfg.latency().login, Duration::from_millis(20));
    assert_eq!(cfg.latency().get, Duration::from_millis(20));
  }

  #[test]
  fn named_file_must_exist() {
    assert!(AppConfig::load(Some(PathBuf::from("/nonexistent/brigada.toml"))).is_err());
  }
}
