use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::SessionError;

pub const DEFAULT_SESSION_FILE: &str = "session_config.json";

/// The three directories chosen last time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub pool: PathBuf,
    #[serde(default)]
    pub horizontal: PathBuf,
    #[serde(default)]
    pub vertical: PathBuf,
}

impl Session {
    /// Read a session file. A missing file is an empty session.
    pub fn try_load(path: &Path) -> Result<Self, SessionError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(SessionError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        serde_json::from_str(&content).map_err(|source| SessionError::Format {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Like [`Session::try_load`], but a broken file only costs a warning.
    pub fn load(path: &Path) -> Self {
        Self::try_load(path).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "error loading session, starting empty");
            Self::default()
        })
    }

    /// Write the session as indented JSON, replacing the file atomically.
    pub fn save(&self, path: &Path) -> Result<(), SessionError> {
        let io_err = |source| SessionError::Io {
            path: path.to_path_buf(),
            source,
        };
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut serializer)
            .map_err(|source| SessionError::Format {
                path: path.to_path_buf(),
                source,
            })?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
        tmp.write_all(&buf).map_err(io_err)?;
        tmp.persist(path).map_err(|e| io_err(e.error))?;
        Ok(())
    }

    /// Fill the fields `overrides` leaves empty from `self`.
    pub fn merged(&self, overrides: Session) -> Session {
        let pick = |given: PathBuf, saved: &PathBuf| {
            if given.as_os_str().is_empty() {
                saved.clone()
            } else {
                given
            }
        };
        Session {
            pool: pick(overrides.pool, &self.pool),
            horizontal: pick(overrides.horizontal, &self.horizontal),
            vertical: pick(overrides.vertical, &self.vertical),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_empty_session() {
        let dir = tempdir().unwrap();
        let session = Session::try_load(&dir.path().join("none.json")).unwrap();
        assert_eq!(session, Session::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session_config.json");
        let session = Session {
            pool: "/data/pool".into(),
            horizontal: "/data/h".into(),
            vertical: "/data/v".into(),
        };

        session.save(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n    \"pool\": \"/data/pool\""));
        assert_eq!(Session::try_load(&path).unwrap(), session);
    }

    #[test]
    fn test_partial_and_broken_files() {
        let dir = tempdir().unwrap();
        let partial = dir.path().join("partial.json");
        std::fs::write(&partial, r#"{"pool": "/p"}"#).unwrap();
        let loaded = Session::load(&partial);
        assert_eq!(loaded.pool, PathBuf::from("/p"));
        assert!(loaded.vertical.as_os_str().is_empty());

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{").unwrap();
        assert!(Session::try_load(&broken).is_err());
        assert_eq!(Session::load(&broken), Session::default());
    }

    #[test]
    fn test_merge_prefers_overrides() {
        let saved = Session {
            pool: "/saved/pool".into(),
            horizontal: "/saved/h".into(),
            vertical: "/saved/v".into(),
        };
        let merged = saved.merged(Session {
            pool: "/cli/pool".into(),
            ..Session::default()
        });
        assert_eq!(merged.pool, PathBuf::from("/cli/pool"));
        assert_eq!(merged.horizontal, PathBuf::from("/saved/h"));
    }
}
