//! Command-line grammar, shared by one-shot invocations and the shell.

use std::path::PathBuf;

use chrono::NaiveDateTime;
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};

use brigada_core::{
  citation::{ActivityType, CitationStatus},
  personnel::StatusFilter,
};

#[derive(Parser, Debug)]
#[command(name = "brigada", version, about = "Fire brigade roster and citations")]
pub struct Args {
  /// Path to a TOML config file.
  #[arg(short, long, value_name = "FILE")]
  pub config: Option<PathBuf>,

  /// Print results as JSON.
  #[arg(long, global = true)]
  pub json: bool,

  #[command(subcommand)]
  pub command: Command,
}

/// One line typed into `brigada shell`.
#[derive(Parser, Debug)]
#[command(name = "brigada", no_binary_name = true, disable_version_flag = true)]
pub struct ShellLine {
  /// Print this line's result as JSON.
  #[arg(long, global = true)]
  pub json: bool,

  #[command(subcommand)]
  pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Log in and keep the session for later invocations.
  Login {
    identifier: Option<String>,
    secret:     Option<String>,
    /// Use one of the demo accounts.
    #[arg(long, value_enum, conflicts_with_all = ["identifier", "secret"])]
    demo:       Option<DemoAccount>,
  },
  Logout,
  /// Show the logged-in user.
  Whoami,
  /// Roster statistics.
  Stats,
  #[command(subcommand)]
  Personnel(PersonnelCommand),
  #[command(subcommand)]
  Citations(CitationCommand),
  /// Interactive session sharing one store across commands.
  Shell,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoAccount {
  Admin,
  Member,
}

// ─── Personnel ────────────────────────────────────────────────────────────────

#[derive(Subcommand, Debug)]
pub enum PersonnelCommand {
  /// List members. A search ignores the status filter.
  List {
    #[arg(short, long)]
    search: Option<String>,
    /// Activo, Licencia, Inactivo or Todos.
    #[arg(long, default_value = "Activo")]
    status: StatusFilter,
  },
  Show {
    id: i64,
  },
  Add(PersonnelFields),
  Edit {
    id:     i64,
    #[command(flatten)]
    fields: PersonnelFields,
  },
  Remove {
    id:  i64,
    /// Skip the confirmation prompt.
    #[arg(short, long)]
    yes: bool,
  },
}

/// Form fields. Omitted fields keep the form's current value.
#[derive(ClapArgs, Debug, Default)]
pub struct PersonnelFields {
  #[arg(long)]
  pub given_names: Option<String>,
  #[arg(long)]
  pub surnames:    Option<String>,
  #[arg(long)]
  pub rank:        Option<String>,
  #[arg(long)]
  pub specialty:   Option<String>,
  #[arg(long)]
  pub status:      Option<String>,
  #[arg(long)]
  pub phone:       Option<String>,
  #[arg(long)]
  pub email:       Option<String>,
  #[arg(long)]
  pub address:     Option<String>,
  #[arg(long)]
  pub photo:       Option<String>,
}

// ─── Citations ────────────────────────────────────────────────────────────────

#[derive(Subcommand, Debug)]
pub enum CitationCommand {
  List {
    #[arg(long, value_parser = CitationStatus::lookup)]
    status:   Option<CitationStatus>,
    #[arg(long, value_parser = ActivityType::lookup)]
    activity: Option<ActivityType>,
  },
  Show {
    id: i64,
  },
  Add {
    #[arg(long)]
    title:       String,
    #[arg(long, default_value = "")]
    description: String,
    /// Local date and time, e.g. `2026-03-01T19:30:00`.
    #[arg(long)]
    at:          NaiveDateTime,
    #[arg(long)]
    location:    String,
    #[arg(long, value_parser = ActivityType::lookup)]
    activity:    ActivityType,
    #[arg(long, default_value_t = 0)]
    required:    u32,
    /// Comma-separated personnel ids.
    #[arg(long, value_delimiter = ',')]
    cited:       Vec<i64>,
    #[arg(long)]
    remarks:     Option<String>,
  },
  /// Change only the given fields.
  Update {
    id:          i64,
    #[arg(long)]
    title:       Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    at:          Option<NaiveDateTime>,
    #[arg(long)]
    location:    Option<String>,
    #[arg(long, value_parser = ActivityType::lookup)]
    activity:    Option<ActivityType>,
    #[arg(long, value_parser = CitationStatus::lookup)]
    status:      Option<CitationStatus>,
    #[arg(long)]
    required:    Option<u32>,
    #[arg(long, value_delimiter = ',')]
    cited:       Option<Vec<i64>>,
    #[arg(long)]
    remarks:     Option<String>,
  },
  Delete {
    id: i64,
  },
  Confirm {
    id:  i64,
    #[arg(short, long)]
    yes: bool,
  },
  Reject {
    id:  i64,
    #[arg(short, long)]
    yes: bool,
  },
}

/// Split a shell line into words. Single or double quotes group words.
pub fn split_words(line: &str) -> Result<Vec<String>, &'static str> {
  let mut words = Vec::new();
  let mut current = String::new();
  let mut in_word = false;
  let mut quote = None;

  for c in line.chars() {
    match (quote, c) {
      (Some(q), c) if c == q => quote = None,
      (Some(_), c) => current.push(c),
      (None, '"' | '\'') => {
        quote = Some(c);
        in_word = true;
      }
      (None, c) if c.is_whitespace() => {
        if in_word {
          words.push(std::mem::take(&mut current));
          in_word = false;
        }
      }
      (None, c) => {
        current.push(c);
        in_word = true;
      }
    }
  }
  if quote.is_some() {
    return Err("unterminated quote");
  }
  if in_word {
    words.push(current);
  }
  Ok(words)
}
