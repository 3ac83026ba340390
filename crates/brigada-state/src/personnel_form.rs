//! Create/edit form for personnel records.
//!
//! Field values are kept as the user typed them. Validation runs
//! synchronously on submit; a failing form never reaches the repository and
//! keeps every typed value.

use std::{collections::BTreeMap, sync::Arc};

use chrono::Utc;
use tokio::sync::watch;
use tracing::{debug, info};

use brigada_core::{
  Resource,
  personnel::{NewPersonnel, Personnel, PersonnelStatus},
  store::PersonnelStore,
  validate::{self, PhoneError},
};
use brigada_repository::PersonnelRepository;

use crate::request::RequestTracker;

/// Whether the form creates a new record or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
  Create,
  Edit(i64),
}

impl FormMode {
  /// Edit mode for a positive id, create mode otherwise.
  pub fn for_id(id: Option<i64>) -> Self {
    match id {
      Some(id) if id > 0 => Self::Edit(id),
      _ => Self::Create,
    }
  }

  /// Parse a navigation parameter. Blank or malformed values mean create.
  pub fn from_param(param: Option<&str>) -> Self {
    Self::for_id(param.and_then(|p| p.trim().parse().ok()))
  }
}

/// Editable fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
  GivenNames,
  Surnames,
  Rank,
  Specialty,
  Status,
  Phone,
  Email,
  Address,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PersonnelFormState {
  pub mode:        FormMode,
  pub given_names: String,
  pub surnames:    String,
  pub rank:        String,
  pub specialty:   String,
  pub status:      String,
  pub phone:       String,
  pub email:       String,
  pub address:     String,
  pub photo_ref:   Option<String>,
  /// Validation messages from the last submit attempt.
  pub errors:      BTreeMap<FormField, String>,
  pub loading:     bool,
  /// Load or save failure.
  pub error:       Option<String>,
  pub saved:       bool,
  /// The record as loaded in edit mode.
  pub original:    Option<Personnel>,
}

impl PersonnelFormState {
  fn new(mode: FormMode) -> Self {
    Self {
      mode,
      given_names: String::new(),
      surnames: String::new(),
      rank: "Bombero".into(),
      specialty: String::new(),
      status: PersonnelStatus::Active.to_string(),
      phone: String::new(),
      email: String::new(),
      address: String::new(),
      photo_ref: None,
      errors: BTreeMap::new(),
      loading: false,
      error: None,
      saved: false,
      original: None,
    }
  }

  pub fn is_edit(&self) -> bool { matches!(self.mode, FormMode::Edit(_)) }

  pub fn field(&self, field: FormField) -> &str {
    match field {
      FormField::GivenNames => &self.given_names,
      FormField::Surnames => &self.surnames,
      FormField::Rank => &self.rank,
      FormField::Specialty => &self.specialty,
      FormField::Status => &self.status,
      FormField::Phone => &self.phone,
      FormField::Email => &self.email,
      FormField::Address => &self.address,
    }
  }

  fn field_mut(&mut self, field: FormField) -> &mut String {
    match field {
      FormField::GivenNames => &mut self.given_names,
      FormField::Surnames => &mut self.surnames,
      FormField::Rank => &mut self.rank,
      FormField::Specialty => &mut self.specialty,
      FormField::Status => &mut self.status,
      FormField::Phone => &mut self.phone,
      FormField::Email => &mut self.email,
      FormField::Address => &mut self.address,
    }
  }

  fn fill_from(&mut self, p: &Personnel) {
    self.given_names = p.given_names.clone();
    self.surnames = p.surnames.clone();
    self.rank = p.rank.clone();
    self.specialty = p.specialty.clone().unwrap_or_default();
    self.status = p.status.to_string();
    self.phone = p.phone.clone().unwrap_or_default();
    self.email = p.email.clone().unwrap_or_default();
    self.address = p.address.clone().unwrap_or_default();
    self.photo_ref = p.photo_ref.clone();
    self.original = Some(p.clone());
  }

  /// Check every field rule.
  pub fn validate(&self) -> BTreeMap<FormField, String> {
    let mut errors = BTreeMap::new();
    let mut require = |field: FormField, message: &str| {
      if !validate::is_not_blank(self.field(field)) {
        errors.insert(field, message.to_owned());
      }
    };
    require(FormField::GivenNames, "Given names are required");
    require(FormField::Surnames, "Surnames are required");
    require(FormField::Rank, "Rank is required");
    require(FormField::Status, "Status is required");

    if validate::is_not_blank(&self.status) && self.status.trim().parse::<PersonnelStatus>().is_err()
    {
      errors.insert(FormField::Status, format!("Unknown status: {}", self.status.trim()));
    }
    if validate::is_not_blank(&self.email) && !validate::is_valid_email(&self.email) {
      errors.insert(FormField::Email, "Invalid email".into());
    }
    if validate::is_not_blank(&self.phone) {
      match validate::validate_phone(&self.phone) {
        Ok(()) => {}
        Err(PhoneError::TooShort) => {
          errors.insert(FormField::Phone, "Phone must have at least 8 digits".into());
        }
        Err(PhoneError::TooLong) => {
          errors.insert(FormField::Phone, "Phone cannot have more than 15 digits".into());
        }
      }
    }
    errors
  }

  /// Assemble the create input. Call only on a form that validated.
  fn draft(&self, status: PersonnelStatus) -> NewPersonnel {
    NewPersonnel {
      given_names: self.given_names.trim().to_owned(),
      surnames: self.surnames.trim().to_owned(),
      rank: self.rank.trim().to_owned(),
      specialty: optional(&self.specialty),
      status,
      phone: optional(&self.phone),
      email: optional(&self.email),
      address: optional(&self.address),
      joined_on: Some(Utc::now().date_naive()),
      photo_ref: self.photo_ref.clone(),
    }
  }
}

enum Save {
  Create(NewPersonnel),
  Replace(Personnel),
}

fn optional(s: &str) -> Option<String> {
  let s = s.trim();
  (!s.is_empty()).then(|| s.to_owned())
}

pub struct PersonnelFormHolder<S> {
  inner: Arc<Inner<S>>,
}

struct Inner<S> {
  repo:     PersonnelRepository<S>,
  state:    watch::Sender<PersonnelFormState>,
  requests: RequestTracker,
}

impl<S> Clone for PersonnelFormHolder<S> {
  fn clone(&self) -> Self {
    Self {
      inner: self.inner.clone(),
    }
  }
}

impl<S> PersonnelFormHolder<S>
where
  S: PersonnelStore + 'static,
{
  pub fn new(repo: PersonnelRepository<S>, id: Option<i64>) -> Self {
    let (state, _) = watch::channel(PersonnelFormState::new(FormMode::for_id(id)));
    Self {
      inner: Arc::new(Inner {
        repo,
        state,
        requests: RequestTracker::default(),
      }),
    }
  }

  pub fn subscribe(&self) -> watch::Receiver<PersonnelFormState> { self.inner.state.subscribe() }

  pub fn snapshot(&self) -> PersonnelFormState { self.inner.state.borrow().clone() }

  /// In edit mode, fetch the record and pre-populate every field.
  pub async fn load(&self) {
    let FormMode::Edit(id) = self.inner.state.borrow().mode else {
      return;
    };
    let state = &self.inner.state;
    self
      .inner
      .requests
      .drive(self.inner.repo.get(id), |emission| {
        state.send_modify(|s| match emission {
          Resource::Loading(_) => s.loading = true,
          Resource::Success(p) => {
            s.fill_from(&p);
            s.loading = false;
          }
          Resource::Error { message, .. } => {
            s.loading = false;
            s.error = Some(message);
          }
        })
      })
      .await;
  }

  /// Set a field. Phone input keeps only digits and formatting characters.
  pub fn update_field(&self, field: FormField, value: &str) {
    let value = match field {
      FormField::Phone => value.chars().filter(|c| validate::is_phone_char(*c)).collect(),
      _ => value.to_owned(),
    };
    self.inner.state.send_modify(|s| *s.field_mut(field) = value);
  }

  pub fn update_photo(&self, photo_ref: Option<String>) {
    self.inner.state.send_modify(|s| s.photo_ref = photo_ref);
  }

  pub fn clear_error(&self) { self.inner.state.send_modify(|s| s.error = None) }

  /// Validate and save. Returns the stored record on success.
  ///
  /// Create sets the join date to today. Edit replaces the whole record but
  /// keeps the loaded join date.
  pub async fn submit(&self) -> Option<Personnel> {
    let mut prepared = None;
    self.inner.state.send_modify(|s| {
      s.errors = s.validate();
      if !s.errors.is_empty() {
        debug!(fields = s.errors.len(), "personnel form rejected");
        return;
      }
      let Ok(status) = s.status.trim().parse::<PersonnelStatus>() else {
        return;
      };
      let draft = s.draft(status);
      prepared = match (s.mode, &s.original) {
        (FormMode::Create, _) => Some(Save::Create(draft)),
        (FormMode::Edit(id), Some(original)) => {
          let mut record = draft.into_personnel(id, Utc::now());
          record.joined_on = original.joined_on;
          record.created_at = original.created_at;
          Some(Save::Replace(record))
        }
        (FormMode::Edit(_), None) => {
          s.error = Some("Record not loaded".into());
          None
        }
      };
      if prepared.is_some() {
        s.loading = true;
        s.error = None;
      }
    });
    let prepared = prepared?;

    let stream = match prepared {
      Save::Create(draft) => self.inner.repo.create(draft),
      Save::Replace(record) => self.inner.repo.update(record),
    };
    let state = &self.inner.state;
    let mut saved = None;
    self
      .inner
      .requests
      .drive(stream, |emission| {
        state.send_modify(|s| match emission {
          Resource::Loading(_) => {}
          Resource::Success(p) => {
            info!(id = p.id, "personnel saved");
            s.loading = false;
            s.saved = true;
            saved = Some(p);
          }
          Resource::Error { message, .. } => {
            s.loading = false;
            s.error = Some(message);
          }
        })
      })
      .await;
    saved
  }
}

#[cfg(test)]
mod tests {
  use std::sync::atomic::{AtomicUsize, Ordering};

  use brigada_core::{personnel::StatusFilter, store::PersonnelStore};
  use brigada_repository::Latency;
  use brigada_store_memory::MemoryStore;

  use super::*;

  /// Counts mutating calls on the way to a [`MemoryStore`].
  struct Spy {
    store:     MemoryStore,
    mutations: AtomicUsize,
  }

  impl PersonnelStore for Spy {
    type Error = brigada_store_memory::Error;

    fn list_all(&self) -> Result<Vec<Personnel>, Self::Error> { self.store.list_all() }

    fn list_by_status(&self, f: StatusFilter) -> Result<Vec<Personnel>, Self::Error> {
      self.store.list_by_status(f)
    }

    fn search(&self, q: &str) -> Result<Vec<Personnel>, Self::Error> { self.store.search(q) }

    fn get(&self, id: i64) -> Result<Option<Personnel>, Self::Error> {
      PersonnelStore::get(&self.store, id)
    }

    fn create(&self, draft: NewPersonnel) -> Result<Personnel, Self::Error> {
      self.mutations.fetch_add(1, Ordering::SeqCst);
      PersonnelStore::create(&self.store, draft)
    }

    fn update(&self, record: Personnel) -> Result<Option<Personnel>, Self::Error> {
      self.mutations.fetch_add(1, Ordering::SeqCst);
      PersonnelStore::update(&self.store, record)
    }

    fn delete(&self, id: i64) -> Result<bool, Self::Error> {
      self.mutations.fetch_add(1, Ordering::SeqCst);
      PersonnelStore::delete(&self.store, id)
    }
  }

  fn holder(id: Option<i64>) -> (PersonnelFormHolder<Spy>, Arc<Spy>) {
    let spy = Arc::new(Spy {
      store:     MemoryStore::seeded(Utc::now()),
      mutations: AtomicUsize::new(0),
    });
    let repo = PersonnelRepository::new(spy.clone(), Latency::none());
    (PersonnelFormHolder::new(repo, id), spy)
  }

  fn fill(h: &PersonnelFormHolder<Spy>) {
    h.update_field(FormField::GivenNames, "Ana");
    h.update_field(FormField::Surnames, "Soto");
  }

  #[test]
  fn mode_detection() {
    assert_eq!(FormMode::from_param(Some("7")), FormMode::Edit(7));
    assert_eq!(FormMode::from_param(Some(" ")), FormMode::Create);
    assert_eq!(FormMode::from_param(Some("abc")), FormMode::Create);
    assert_eq!(FormMode::from_param(Some("0")), FormMode::Create);
    assert_eq!(FormMode::from_param(None), FormMode::Create);
  }

  #[tokio::test]
  async fn blank_given_names_block_submission() {
    let (h, spy) = holder(None);
    h.update_field(FormField::Surnames, "Soto");

    assert_eq!(h.submit().await, None);
    let s = h.snapshot();
    assert!(s.errors.contains_key(&FormField::GivenNames));
    assert!(!s.loading);
    assert_eq!(s.surnames, "Soto");
    assert_eq!(spy.mutations.load(Ordering::SeqCst), 0);
  }

  #[tokio::test]
  async fn email_and_phone_rules() {
    let (h, spy) = holder(None);
    fill(&h);
    h.update_field(FormField::Email, "not-an-email");
    h.update_field(FormField::Phone, "123-45");
    assert_eq!(h.submit().await, None);
    let errors = h.snapshot().errors;
    assert_eq!(errors.keys().copied().collect::<Vec<_>>(), vec![
      FormField::Phone,
      FormField::Email
    ]);
    assert_eq!(errors[&FormField::Phone], "Phone must have at least 8 digits");

    h.update_field(FormField::Phone, "+56 9 1234 5678 9999 0");
    assert_eq!(h.snapshot().validate()[&FormField::Phone], "Phone cannot have more than 15 digits");
    assert_eq!(spy.mutations.load(Ordering::SeqCst), 0);
  }

  #[tokio::test]
  async fn phone_input_is_filtered() {
    let (h, _) = holder(None);
    h.update_field(FormField::Phone, "+56 (9) abc 1234-5678");
    assert_eq!(h.snapshot().phone, "+56 (9)  1234-5678");
  }

  #[tokio::test]
  async fn create_dispatches_and_sets_saved() {
    let (h, spy) = holder(None);
    fill(&h);
    h.update_field(FormField::Specialty, "   ");
    h.update_field(FormField::Email, " ana.soto@bomberos.cl ");

    assert!(h.submit().await.is_some());
    let s = h.snapshot();
    assert!(s.saved);
    assert!(s.errors.is_empty());
    assert_eq!(spy.mutations.load(Ordering::SeqCst), 1);

    let created = PersonnelStore::get(&spy.store, 11).unwrap().unwrap();
    assert_eq!(created.full_name(), "Ana Soto");
    assert_eq!(created.rank, "Bombero");
    assert_eq!(created.status, PersonnelStatus::Active);
    assert_eq!(created.specialty, None);
    assert_eq!(created.email.as_deref(), Some("ana.soto@bomberos.cl"));
    assert_eq!(created.joined_on, Some(Utc::now().date_naive()));
  }

  #[tokio::test]
  async fn edit_prefills_and_replaces_keeping_join_date() {
    let (h, spy) = holder(Some(4));
    assert!(h.snapshot().is_edit());
    h.load().await;

    let s = h.snapshot();
    assert_eq!(s.given_names, "Ana Isabel");
    assert_eq!(s.specialty, "Primeros Auxilios");
    assert_eq!(s.status, "Activo");
    let joined = s.original.as_ref().and_then(|p| p.joined_on);

    h.update_field(FormField::Status, "Licencia");
    h.update_field(FormField::Specialty, "");
    assert!(h.submit().await.is_some());

    let stored = PersonnelStore::get(&spy.store, 4).unwrap().unwrap();
    assert_eq!(stored.status, PersonnelStatus::OnLeave);
    assert_eq!(stored.specialty, None);
    assert_eq!(stored.joined_on, joined);
    assert_eq!(stored.photo_ref, s.photo_ref);
  }

  #[tokio::test]
  async fn edit_of_missing_record_reports_load_error() {
    let (h, spy) = holder(Some(99));
    h.load().await;
    assert_eq!(h.snapshot().error.as_deref(), Some("Personnel not found"));

    fill(&h);
    assert_eq!(h.submit().await, None);
    assert_eq!(h.snapshot().error.as_deref(), Some("Record not loaded"));
    assert_eq!(spy.mutations.load(Ordering::SeqCst), 0);

    h.clear_error();
    assert_eq!(h.snapshot().error, None);
  }

  #[tokio::test]
  async fn unknown_status_is_a_field_error() {
    let (h, _) = holder(None);
    fill(&h);
    h.update_field(FormField::Status, "Retirado");
    assert_eq!(h.submit().await, None);
    assert_eq!(h.snapshot().errors[&FormField::Status], "Unknown status: Retirado");
  }
}
