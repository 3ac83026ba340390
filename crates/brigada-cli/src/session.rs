//! Session persisted as a small JSON file so that `brigada login` survives
//! across invocations.

use std::{
  fs, io,
  path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use brigada_core::auth::{SessionStore, User};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
  #[error("session file I/O: {0}")]
  Io(#[from] io::Error),

  #[error("malformed session file: {0}")]
  Json(#[from] serde_json::Error),
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionFile {
  user:  User,
  token: String,
}

/// A [`SessionStore`] backed by one JSON file. A missing file means nobody is
/// logged in.
#[derive(Debug, Clone)]
pub struct FileSession {
  path: PathBuf,
}

impl FileSession {
  pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

  pub fn path(&self) -> &Path { &self.path }

  fn read(&self) -> Result<Option<SessionFile>, SessionError> {
    match fs::read(&self.path) {
      Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
      Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
      Err(e) => Err(e.into()),
    }
  }
}

impl SessionStore for FileSession {
  type Error = SessionError;

  fn save(&self, user: &User, token: &str) -> Result<(), SessionError> {
    let file = SessionFile {
      user:  user.clone(),
      token: token.to_owned(),
    };
    fs::write(&self.path, serde_json::to_vec_pretty(&file)?)?;
    Ok(())
  }

  fn current_user(&self) -> Result<Option<User>, SessionError> {
    Ok(self.read()?.map(|f| f.user))
  }

  fn is_logged_in(&self) -> Result<bool, SessionError> { Ok(self.read()?.is_some()) }

  fn clear(&self) -> Result<(), SessionError> {
    match fs::remove_file(&self.path) {
      Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
      _ => Ok(()),
    }
  }
}

#[cfg(test)]
mod tests {
  use brigada_core::auth::UserKind;

  use super::*;

  fn scratch() -> FileSession {
    FileSession::new(std::env::temp_dir().join(format!("brigada-{}.json", uuid::Uuid::new_v4())))
  }

  fn user() -> User {
    User {
      id:     2,
      email:  "bombero@bomberos.cl".into(),
      name:   "Usuario Bombero".into(),
      role:   "Bombero".into(),
      kind:   UserKind::Member,
      active: true,
    }
  }

  #[test]
  fn save_read_clear() {
    let s = scratch();
    assert!(!s.is_logged_in().unwrap());

    s.save(&user(), "tok").unwrap();
    assert!(s.is_logged_in().unwrap());
    assert_eq!(s.current_user().unwrap(), Some(user()));

    s.clear().unwrap();
    assert_eq!(s.current_user().unwrap(), None);
    s.clear().unwrap();
  }

  #[test]
  fn garbage_is_reported() {
    let s = scratch();
    fs::write(s.path(), b"not json").unwrap();
    assert!(matches!(s.current_user(), Err(SessionError::Json(_))));
    s.clear().unwrap();
  }
}
