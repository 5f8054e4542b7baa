//! Dotenv-backed credential store.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::result::{FormError, FormResult};

/// Key holding the user name
pub const USERNAME_KEY: &str = "USERNAME";
/// Key holding the password
pub const PASSWORD_KEY: &str = "PASSWORD";

/// A user name and password pair
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Create a credential pair
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Read both keys through a lookup function
    ///
    /// # Errors
    ///
    /// [`FormError::CredentialMissing`] naming the first absent or empty key.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> FormResult<Self> {
        let get = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| FormError::CredentialMissing {
                    key: key.to_string(),
                })
        };
        Ok(Self::new(get(USERNAME_KEY)?, get(PASSWORD_KEY)?))
    }
}

/// Credentials persisted as `KEY=value` lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialStore {
    path: PathBuf,
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new(".env")
    }
}

impl CredentialStore {
    /// Store backed by `path`
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the file with exactly the two credential keys
    pub fn save(&self, credentials: &Credentials) -> FormResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let content = format!(
            "{USERNAME_KEY}={}\n{PASSWORD_KEY}={}\n",
            encode_value(&credentials.username),
            encode_value(&credentials.password)
        );
        fs::write(&self.path, content)?;
        tracing::info!(path = %self.path.display(), "credentials saved");
        Ok(())
    }

    /// Parse the file and return both keys
    ///
    /// # Errors
    ///
    /// [`FormError::CredentialMissing`] when the file or either key is absent.
    pub fn load(&self) -> FormResult<Credentials> {
        let entries = match dotenv::from_path_iter(&self.path) {
            Ok(iter) => iter,
            Err(dotenv::Error::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                return Err(FormError::CredentialMissing {
                    key: USERNAME_KEY.to_string(),
                })
            }
            Err(e) => return Err(invalid_data(e)),
        };

        let mut pairs = Vec::new();
        for entry in entries {
            pairs.push(entry.map_err(invalid_data)?);
        }
        Credentials::from_lookup(|key| {
            pairs
                .iter()
                .rev()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        })
    }
}

fn invalid_data(e: dotenv::Error) -> FormError {
    FormError::Io(io::Error::new(io::ErrorKind::InvalidData, e.to_string()))
}

/// Quote a value so the dotenv parser reads it back verbatim
fn encode_value(value: &str) -> String {
    let plain = |c: char| c.is_ascii_alphanumeric() || "-_.@+/:,".contains(c);
    if value.chars().all(plain) {
        value.to_string()
    } else if !value.contains('\'') {
        format!("'{value}'")
    } else {
        let escaped = value
            .replace('\\', "\\\\")
            .replace('"', "\\\"")
            .replace('$', "\\$");
        format!("\"{escaped}\"")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_password() {
        let creds = Credentials::new("maya", "hunter2");
        let debug = format!("{creds:?}");
        assert!(debug.contains("maya"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join(".env"));
        store.save(&Credentials::new("maya", "s3cr3t")).unwrap();

        let content = fs::read_to_string(store.path()).unwrap();
        assert_eq!(content, "USERNAME=maya\nPASSWORD=s3cr3t\n");
        assert_eq!(store.load().unwrap(), Credentials::new("maya", "s3cr3t"));
    }

    #[test]
    fn test_save_overwrites_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, "ENV=staging\nUSERNAME=old\nPASSWORD=old\n").unwrap();

        let store = CredentialStore::new(&path);
        store.save(&Credentials::new("new", "pw")).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(!content.contains("ENV="));
        assert_eq!(store.load().unwrap().username, "new");
    }

    #[test]
    fn test_values_with_spaces_survive() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join(".env"));
        store.save(&Credentials::new("maya rossi", "pass word")).unwrap();
        assert_eq!(store.load().unwrap(), Credentials::new("maya rossi", "pass word"));
    }

    #[test]
    fn test_missing_password_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, "USERNAME=maya\n").unwrap();

        let err = CredentialStore::new(&path).load().unwrap_err();
        assert!(matches!(err, FormError::CredentialMissing { ref key } if key == "PASSWORD"));
        assert!(err.to_string().contains("Run the register test first"));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = CredentialStore::new(dir.path().join("absent.env")).load().unwrap_err();
        assert!(matches!(err, FormError::CredentialMissing { ref key } if key == "USERNAME"));
    }

    #[test]
    fn test_encode_value() {
        assert_eq!(encode_value("abc"), "abc");
        assert_eq!(encode_value("a b"), "'a b'");
        assert_eq!(encode_value("it's $5"), "\"it's \\$5\"");
    }
}
