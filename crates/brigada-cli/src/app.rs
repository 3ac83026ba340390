//! Command dispatcher.
//!
//! Each command drives the state holder of the screen it stands in for and
//! prints the settled state. In the shell the same [`App`] serves every line,
//! so filters and store contents carry over between commands.

use std::{
  io::{self, BufRead as _, Write as _},
  sync::Arc,
};

use anyhow::{Context as _, anyhow, bail};
use chrono::Utc;
use clap::Parser as _;
use futures::StreamExt as _;
use serde::Serialize;
use tracing::debug;

use brigada_core::{
  Resource,
  citation::{CitationUpdate, NewCitation},
};
use brigada_repository::{AuthRepository, CitationRepository, PersonnelRepository, ResourceStream};
use brigada_state::{
  CitationDetailHolder, CitationListHolder, DashboardHolder, FormField, LoginHolder,
  PersonnelDetailHolder, PersonnelFormHolder, PersonnelFormState, PersonnelListHolder,
};
use brigada_store_memory::{MemoryStore, StaticCredentials};

use crate::{
  cli::{CitationCommand, Command, DemoAccount, PersonnelCommand, PersonnelFields, ShellLine, split_words},
  config::AppConfig,
  render,
  session::FileSession,
};

type Store = MemoryStore;

/// Clones share the store, the session and every holder.
#[derive(Clone)]
pub struct App {
  personnel: PersonnelRepository<Store>,
  citations: CitationRepository<Store>,
  auth:      AuthRepository<StaticCredentials, FileSession>,
  roster:    PersonnelListHolder<Store>,
  agenda:    CitationListHolder<Store>,
  dashboard: DashboardHolder<Store, StaticCredentials, FileSession>,
  json:      bool,
}

impl App {
  pub fn new(config: &AppConfig, json: bool) -> Self {
    let options = config.store_options();
    let store = Arc::new(if config.seed {
      MemoryStore::seeded_with(Utc::now(), options)
    } else {
      MemoryStore::with_rows(Vec::new(), Vec::new(), 1, options)
    });
    let latency = config.latency();

    let personnel = PersonnelRepository::new(store.clone(), latency);
    let citations = CitationRepository::new(store, latency);
    let auth = AuthRepository::new(
      Arc::new(StaticCredentials::demo()),
      Arc::new(FileSession::new(&config.session_path)),
      latency,
    );

    Self {
      roster: PersonnelListHolder::new(personnel.clone()),
      agenda: CitationListHolder::new(citations.clone()),
      dashboard: DashboardHolder::new(personnel.clone(), auth.clone()),
      personnel,
      citations,
      auth,
      json,
    }
  }

  /// The same app printing JSON when `json` is set.
  fn with_json(&self, json: bool) -> Self {
    Self {
      json: self.json || json,
      ..self.clone()
    }
  }

  pub async fn run(&self, command: Command) -> anyhow::Result<()> {
    debug!(?command, "running command");
    match command {
      Command::Login {
        identifier,
        secret,
        demo,
      } => self.login(identifier, secret, demo).await,
      Command::Logout => {
        self.dashboard.logout().context("failed to clear the session")?;
        self.say("Logged out.")
      }
      Command::Whoami => match self.auth.current_user().context("failed to read the session")? {
        Some(user) => self.emit(&user, render::user),
        None => self.say("Not logged in."),
      },
      Command::Stats => {
        self.dashboard.load().await;
        let stats = settle(self.dashboard.snapshot().stats)?;
        self.emit(&stats, render::stats)
      }
      Command::Personnel(cmd) => self.personnel(cmd).await,
      Command::Citations(cmd) => self.citations(cmd).await,
      Command::Shell => bail!("already in the shell"),
    }
  }

  /// Read commands from stdin until EOF or `exit`.
  pub async fn shell(&self) -> anyhow::Result<()> {
    while let Some(line) = prompt_line("brigada> ")? {
      let words = match split_words(&line) {
        Ok(words) => words,
        Err(e) => {
          eprintln!("error: {e}");
          continue;
        }
      };
      match words.first().map(String::as_str) {
        None => continue,
        Some("exit" | "quit") => break,
        Some(_) => {}
      }
      match ShellLine::try_parse_from(words) {
        Ok(ShellLine { json, command }) => {
          if let Err(e) = self.with_json(json).run(command).await {
            eprintln!("error: {e:#}");
          }
        }
        Err(e) => e.print().context("failed to print the usage error")?,
      }
    }
    Ok(())
  }

  // ── Output ────────────────────────────────────────────────────────────────

  fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce(&T) -> String) -> anyhow::Result<()> {
    if self.json {
      println!("{}", serde_json::to_string_pretty(value)?);
    } else {
      print!("{}", text(value));
    }
    Ok(())
  }

  fn say(&self, message: &str) -> anyhow::Result<()> {
    if self.json {
      println!("{}", serde_json::json!({ "message": message }));
    } else {
      println!("{message}");
    }
    Ok(())
  }

  // ── Auth ──────────────────────────────────────────────────────────────────

  async fn login(
    &self,
    identifier: Option<String>,
    secret: Option<String>,
    demo: Option<DemoAccount>,
  ) -> anyhow::Result<()> {
    let holder = LoginHolder::new(self.auth.clone());
    match demo {
      Some(DemoAccount::Admin) => holder.fill_demo_admin(),
      Some(DemoAccount::Member) => holder.fill_demo_member(),
      None => {
        holder.set_identifier(identifier.unwrap_or_default());
        holder.set_secret(secret.unwrap_or_default());
      }
    }

    if let Some(user) = holder.login().await {
      return self.emit(&user, render::user);
    }
    let s = holder.snapshot();
    let reasons: Vec<String> = [s.identifier_error, s.secret_error]
      .into_iter()
      .flatten()
      .chain(s.result.as_ref().and_then(Resource::message).map(str::to_owned))
      .collect();
    bail!("login failed: {}", reasons.join("; "))
  }

  // ── Personnel ─────────────────────────────────────────────────────────────

  async fn personnel(&self, cmd: PersonnelCommand) -> anyhow::Result<()> {
    match cmd {
      PersonnelCommand::List { search, status } => {
        let search = search.unwrap_or_default();
        let current = self.roster.snapshot();
        let status_changed = current.status != status;
        let search_changed = current.search != search;
        if status_changed {
          self.roster.set_status_filter(status).await;
        }
        if search_changed {
          self.roster.set_search_query(search).await;
        }
        if !status_changed && !search_changed {
          self.roster.load().await;
        }
        let rows = settle(self.roster.snapshot().result)?;
        self.emit(&rows, |rows| render::personnel_table(rows))
      }
      PersonnelCommand::Show { id } => {
        let detail = PersonnelDetailHolder::new(self.personnel.clone(), Some(id));
        detail.load().await;
        let record = settle(detail.snapshot().result)?;
        self.emit(&record, render::personnel)
      }
      PersonnelCommand::Add(fields) => {
        let form = PersonnelFormHolder::new(self.personnel.clone(), None);
        self.save_form(&form, fields).await
      }
      PersonnelCommand::Edit { id, fields } => {
        let form = PersonnelFormHolder::new(self.personnel.clone(), Some(id));
        form.load().await;
        if let Some(error) = form.snapshot().error {
          bail!(error);
        }
        self.save_form(&form, fields).await
      }
      PersonnelCommand::Remove { id, yes } => {
        let detail = PersonnelDetailHolder::new(self.personnel.clone(), Some(id));
        detail.load().await;
        let record = settle(detail.snapshot().result)?;
        if !yes && !ask(&format!("Remove {} (#{id})?", record.full_name()))? {
          return self.say("Cancelled.");
        }
        if !detail.delete().await {
          return Err(failure(detail.snapshot().deletion));
        }
        self.say(&format!("Removed #{id}."))
      }
    }
  }

  async fn save_form(
    &self,
    form: &PersonnelFormHolder<Store>,
    fields: PersonnelFields,
  ) -> anyhow::Result<()> {
    let PersonnelFields {
      given_names,
      surnames,
      rank,
      specialty,
      status,
      phone,
      email,
      address,
      photo,
    } = fields;
    for (field, value) in [
      (FormField::GivenNames, given_names),
      (FormField::Surnames, surnames),
      (FormField::Rank, rank),
      (FormField::Specialty, specialty),
      (FormField::Status, status),
      (FormField::Phone, phone),
      (FormField::Email, email),
      (FormField::Address, address),
    ] {
      if let Some(value) = value {
        form.update_field(field, &value);
      }
    }
    if photo.is_some() {
      form.update_photo(photo);
    }

    match form.submit().await {
      Some(record) => self.emit(&record, render::personnel),
      None => Err(form_failure(&form.snapshot())),
    }
  }

  // ── Citations ─────────────────────────────────────────────────────────────

  async fn citations(&self, cmd: CitationCommand) -> anyhow::Result<()> {
    match cmd {
      CitationCommand::List { status, activity } => {
        let current = self.agenda.snapshot();
        let status_changed = current.status != status;
        let activity_changed = current.activity_type != activity;
        if status_changed {
          self.agenda.set_status_filter(status).await;
        }
        if activity_changed {
          self.agenda.set_activity_filter(activity).await;
        }
        if !status_changed && !activity_changed {
          self.agenda.load().await;
        }
        let rows = settle(self.agenda.snapshot().result)?;
        self.emit(&rows, |rows| render::citation_table(rows))
      }
      CitationCommand::Show { id } => {
        let detail = CitationDetailHolder::new(self.citations.clone(), Some(id));
        detail.load().await;
        let citation = settle(detail.snapshot().result)?;
        self.emit(&citation, render::citation)
      }
      CitationCommand::Add {
        title,
        description,
        at,
        location,
        activity,
        required,
        cited,
        remarks,
      } => {
        let created_by = self
          .auth
          .current_user()
          .context("failed to read the session")?
          .map_or_else(|| "Sistema".to_owned(), |u| u.name);
        let draft = NewCitation {
          title,
          description,
          scheduled_at: at,
          location,
          activity_type: activity,
          required_attendees: required,
          cited_personnel: cited,
          created_by,
          remarks,
        };
        let citation = finish(self.citations.create(draft)).await?;
        self.emit(&citation, render::citation)
      }
      CitationCommand::Update {
        id,
        title,
        description,
        at,
        location,
        activity,
        status,
        required,
        cited,
        remarks,
      } => {
        let update = CitationUpdate {
          title,
          description,
          scheduled_at: at,
          location,
          activity_type: activity,
          status,
          required_attendees: required,
          cited_personnel: cited,
          remarks,
        };
        let citation = finish(self.citations.update(id, update)).await?;
        self.emit(&citation, render::citation)
      }
      CitationCommand::Delete { id } => {
        finish(self.citations.delete(id)).await?;
        self.say(&format!("Deleted citation #{id}."))
      }
      CitationCommand::Confirm { id, yes } => self.attend(id, true, yes).await,
      CitationCommand::Reject { id, yes } => self.attend(id, false, yes).await,
    }
  }

  /// Run the detail screen's dialog flow for one attendance action.
  async fn attend(&self, id: i64, confirm: bool, yes: bool) -> anyhow::Result<()> {
    let detail = CitationDetailHolder::new(self.citations.clone(), Some(id));
    detail.load().await;
    let citation = settle(detail.snapshot().result)?;

    if confirm {
      detail.request_confirm();
    } else {
      detail.request_reject();
    }
    let verb = if confirm { "Confirm" } else { "Reject" };
    if !yes && !ask(&format!("{verb} attendance for \"{}\"?", citation.title))? {
      detail.dismiss_dialog();
      return self.say("Cancelled.");
    }
    if !detail.accept_dialog().await {
      return Err(failure(detail.snapshot().attendance));
    }
    let reloaded = settle(detail.snapshot().result)?;
    self.emit(&reloaded, render::citation)
  }
}

/// The value of a settled result, or its message as an error.
fn settle<T>(result: Option<Resource<T>>) -> anyhow::Result<T> {
  match result {
    Some(Resource::Success(value)) => Ok(value),
    other => Err(failure(other)),
  }
}

fn failure<T>(result: Option<Resource<T>>) -> anyhow::Error {
  match result {
    Some(Resource::Error { message, .. }) => anyhow!(message),
    Some(Resource::Success(_)) => anyhow!("operation did not report a failure"),
    Some(Resource::Loading(_)) | None => anyhow!("operation did not complete"),
  }
}

/// Drive a repository stream to its terminal value.
async fn finish<T>(stream: ResourceStream<T>) -> anyhow::Result<T> {
  settle(stream.collect::<Vec<_>>().await.pop())
}

fn form_failure(state: &PersonnelFormState) -> anyhow::Error {
  if state.errors.is_empty() {
    return anyhow!(state.error.clone().unwrap_or_else(|| "record not saved".into()));
  }
  let lines: Vec<String> = state
    .errors
    .iter()
    .map(|(field, message)| format!("  {field:?}: {message}"))
    .collect();
  anyhow!("invalid form:\n{}", lines.join("\n"))
}

/// Print `prompt` and read one line; `None` at end of input.
fn prompt_line(prompt: &str) -> anyhow::Result<Option<String>> {
  tokio::task::block_in_place(|| {
    let mut stdout = io::stdout();
    write!(stdout, "{prompt}")?;
    stdout.flush()?;
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
      return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\n', '\r']).to_owned()))
  })
}

/// Yes/no question on stderr, defaulting to no.
fn ask(question: &str) -> anyhow::Result<bool> {
  tokio::task::block_in_place(|| {
    eprint!("{question} [y/N] ");
    io::stderr().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes" | "s" | "si" | "sí"))
  })
}

#[cfg(test)]
mod tests {
  use std::path::PathBuf;

  use brigada_core::citation::CitationStatus;
  use brigada_state::FormMode;

  use super::*;

  fn config() -> AppConfig {
    AppConfig {
      latency_ms: Some(0),
      session_path: std::env::temp_dir().join(format!("brigada-app-{}.json", uuid::Uuid::new_v4())),
      ..AppConfig::default()
    }
  }

  fn app() -> (App, PathBuf) {
    let config = config();
    (App::new(&config, false), config.session_path)
  }

  fn line(words: &[&str]) -> Command {
    ShellLine::try_parse_from(words).unwrap().command
  }

  #[tokio::test]
  async fn login_then_whoami_then_logout() {
    let (app, path) = app();
    app.run(line(&["login", "--demo", "admin"])).await.unwrap();
    assert_eq!(app.auth.current_user().unwrap().map(|u| u.id), Some(1));

    app.run(line(&["whoami"])).await.unwrap();
    app.run(line(&["logout"])).await.unwrap();
    assert!(!app.auth.is_logged_in().unwrap());
    assert!(!path.exists());
  }

  #[test]
  fn json_on_a_shell_line_applies_to_that_line_only() {
    let (app, _) = app();
    let line = ShellLine::try_parse_from(["whoami", "--json"]).unwrap();
    assert!(line.json);
    assert!(app.with_json(line.json).json);
    assert!(!app.json);
  }

  #[tokio::test]
  async fn bad_login_is_an_error() {
    let (app, _) = app();
    let err = app.run(line(&["login", "admin", "0000"])).await.unwrap_err();
    assert_eq!(err.to_string(), "login failed: Invalid credentials");

    let err = app.run(line(&["login"])).await.unwrap_err();
    assert!(err.to_string().contains("Email is required"));
  }

  #[tokio::test]
  async fn personnel_add_validates_before_saving() {
    let (app, _) = app();
    let err = app
      .run(line(&["personnel", "add", "--surnames", "Soto", "--phone", "12"]))
      .await
      .unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("GivenNames: Given names are required"));
    assert!(msg.contains("Phone: Phone must have at least 8 digits"));

    app
      .run(line(&["personnel", "add", "--given-names", "Ana", "--surnames", "Soto"]))
      .await
      .unwrap();
    let form = PersonnelFormHolder::new(app.personnel.clone(), Some(11));
    assert_eq!(form.snapshot().mode, FormMode::Edit(11));
    form.load().await;
    assert_eq!(form.snapshot().given_names, "Ana");
  }

  #[tokio::test]
  async fn personnel_list_keeps_filters_between_lines() {
    let (app, _) = app();
    app.run(line(&["personnel", "list", "--status", "Todos"])).await.unwrap();
    assert_eq!(app.roster.phase(), brigada_state::ListPhase::Ready(10));

    app.run(line(&["personnel", "list", "--status", "Todos", "-s", "bombero"])).await.unwrap();
    assert_eq!(app.roster.phase(), brigada_state::ListPhase::Ready(5));
  }

  #[tokio::test]
  async fn confirm_with_yes_updates_the_count() {
    let (app, _) = app();
    app.run(line(&["citations", "confirm", "3", "--yes"])).await.unwrap();
    let detail = CitationDetailHolder::new(app.citations.clone(), Some(3));
    detail.load().await;
    assert_eq!(settle(detail.snapshot().result).unwrap().confirmed_attendees, 4);
  }

  #[tokio::test]
  async fn citation_update_merges_fields() {
    let (app, _) = app();
    app
      .run(line(&["citations", "update", "4", "--status", "CANCELADA"]))
      .await
      .unwrap();
    let updated = finish(app.citations.get(4)).await.unwrap();
    assert_eq!(updated.status, CitationStatus::Cancelled);
    assert_eq!(updated.location, "Plaza de Armas");

    app.run(line(&["citations", "delete", "4"])).await.unwrap();
    let err = app.run(line(&["citations", "show", "4"])).await.unwrap_err();
    assert_eq!(err.to_string(), "Citation not found");
  }

  #[tokio::test]
  async fn unseeded_store_starts_empty() {
    let app = App::new(&AppConfig { seed: false, ..config() }, true);
    app.run(line(&["citations", "list"])).await.unwrap();
    assert_eq!(app.agenda.phase(), brigada_state::ListPhase::Empty);

    app
      .run(line(&[
        "citations", "add", "--title", "Guardia", "--at", "2026-03-01T19:30:00", "--location",
        "Cuartel", "--activity", "GUARDIA", "--required", "4",
      ]))
      .await
      .unwrap();
    let created = finish(app.citations.get(1)).await.unwrap();
    assert_eq!(created.status, CitationStatus::Pending);
    assert_eq!(created.created_by, "Sistema");
    assert_eq!(created.required_attendees, 4);
  }
}
