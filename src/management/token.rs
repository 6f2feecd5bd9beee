use std::{io::ErrorKind, path::PathBuf};

use chrono::{DateTime, Local};

use crate::{Error, Result, types::TokenRecord};

/// A token loaded from disk together with the time it was issued.
///
/// The issue time is the token file's modification time, which is rewritten
/// on every save.
#[derive(Debug, Clone)]
pub struct StoredToken {
    pub record: TokenRecord,
    pub issued_at: DateTime<Local>,
}

impl StoredToken {
    /// A token is stale once `expires_in` seconds have elapsed since it was
    /// issued. A modification time in the future counts as no time elapsed.
    pub fn is_stale(&self, now: DateTime<Local>) -> bool {
        let elapsed = now.signed_duration_since(self.issued_at).num_seconds().max(0) as u64;
        elapsed >= self.record.expires_in
    }
}

pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TokenStore { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Loads the persisted token, or `None` if no token file exists yet.
    ///
    /// # Errors
    ///
    /// An unreadable file is an [`Error::Io`], malformed content an
    /// [`Error::Decode`]. Neither is recovered from.
    pub async fn load(&self) -> Result<Option<StoredToken>> {
        let content = match async_fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::io(&self.path, e)),
        };

        let record: TokenRecord = serde_json::from_str(&content)
            .map_err(|e| Error::Decode(format!("{}: {}", self.path.display(), e)))?;

        let modified = async_fs::metadata(&self.path)
            .await
            .and_then(|m| m.modified())
            .map_err(|e| Error::io(&self.path, e))?;

        Ok(Some(StoredToken {
            record,
            issued_at: DateTime::<Local>::from(modified),
        }))
    }

    /// Writes the token as a single JSON line, creating parent directories
    /// as needed. On Unix the file is restricted to the owner.
    pub async fn save(&self, record: &TokenRecord) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::io(parent, e))?;
        }

        let mut json = serde_json::to_string(record)?;
        json.push('\n');
        async_fs::write(&self.path, json)
            .await
            .map_err(|e| Error::io(&self.path, e))?;

        #[cfg(unix)]
        {
            use std::{fs::Permissions, os::unix::fs::PermissionsExt};

            async_fs::set_permissions(&self.path, Permissions::from_mode(0o600))
                .await
                .map_err(|e| Error::io(&self.path, e))?;
        }

        Ok(())
    }
}
