// Bearer token persistence

use crate::exchange::error::{ExchangeError, ExchangeResult};
use std::fmt;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};

/// Default token artifact, relative to the working directory
pub const DEFAULT_TOKEN_FILE: &str = "token.dat";

/// Opaque bearer credential
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    /// Wrap a raw token string, rejecting blank input
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// The raw token string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(<redacted>)")
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Storage for the single bearer token of this client
pub trait TokenStore {
    /// Previously saved token, or `None` if there is none
    fn load(&self) -> ExchangeResult<Option<Token>>;

    /// Replace the saved token
    fn save(&self, token: &Token) -> ExchangeResult<()>;
}

/// Token kept in a plain text file
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileTokenStore {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_FILE)
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> ExchangeResult<Option<Token>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                debug!("Read token file {:?}", self.path);
                Ok(Token::new(contents))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No token file at {:?}", self.path);
                Ok(None)
            }
            Err(e) => Err(ExchangeError::io(
                format!("Failed to read token file {}", self.path.display()),
                e,
            )),
        }
    }

    fn save(&self, token: &Token) -> ExchangeResult<()> {
        let write_error = |e| {
            ExchangeError::io(
                format!("Failed to write token file {}", self.path.display()),
                e,
            )
        };

        // Truncate so a shorter token never leaves a stale tail
        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&self.path).map_err(write_error)?;

        // mode() only applies on creation; tighten an existing file before writing
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600))
                .map_err(|e| {
                    ExchangeError::io(
                        format!("Failed to restrict token file {}", self.path.display()),
                        e,
                    )
                })?;
        }

        file.write_all(token.as_str().as_bytes())
            .map_err(write_error)?;

        info!("Saved token to {:?}", self.path);
        Ok(())
    }
}

/// In-memory store for tests and one-shot sessions
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<Token>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `token`
    pub fn with_token(token: Token) -> Self {
        Self {
            token: Mutex::new(Some(token)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> ExchangeResult<Option<Token>> {
        Ok(self
            .token
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone())
    }

    fn save(&self, token: &Token) -> ExchangeResult<()> {
        *self
            .token
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(token.clone());
        Ok(())
    }
}

impl<S: TokenStore + ?Sized> TokenStore for &S {
    fn load(&self) -> ExchangeResult<Option<Token>> {
        (**self).load()
    }

    fn save(&self, token: &Token) -> ExchangeResult<()> {
        (**self).save(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_token_rejects_blank() {
        assert!(Token::new("").is_none());
        assert!(Token::new("  \n").is_none());
        assert_eq!(Token::new("abc\n").unwrap().as_str(), "abc");
    }

    #[test]
    fn test_token_debug_redacted() {
        let token = Token::new("secret-value").unwrap();
        assert!(!format!("{:?}", token).contains("secret-value"));
        assert_eq!(token.to_string(), "secret-value");
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("token.dat"));

        assert!(store.load().unwrap().is_none());

        let token = Token::new("eyJhbGciOi.long.token").unwrap();
        store.save(&token).unwrap();
        assert_eq!(store.load().unwrap(), Some(token));
    }

    #[test]
    fn test_file_store_overwrites() {
        let dir = tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("token.dat"));

        store.save(&Token::new("a-much-longer-first-token").unwrap()).unwrap();
        store.save(&Token::new("short").unwrap()).unwrap();

        assert_eq!(store.load().unwrap().unwrap().as_str(), "short");
    }

    #[test]
    fn test_file_store_write_failure_reported() {
        let dir = tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("missing").join("token.dat"));

        let err = store.save(&Token::new("t").unwrap()).unwrap_err();
        assert!(matches!(err, ExchangeError::Io { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_file_store_owner_only_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let fresh = dir.path().join("fresh.dat");
        FileTokenStore::new(&fresh).save(&Token::new("t").unwrap()).unwrap();
        assert_eq!(fs::metadata(&fresh).unwrap().permissions().mode() & 0o777, 0o600);

        let existing = dir.path().join("existing.dat");
        fs::write(&existing, "old-token").unwrap();
        fs::set_permissions(&existing, fs::Permissions::from_mode(0o644)).unwrap();
        let store = FileTokenStore::new(&existing);
        store.save(&Token::new("new").unwrap()).unwrap();

        assert_eq!(fs::metadata(&existing).unwrap().permissions().mode() & 0o777, 0o600);
        assert_eq!(store.load().unwrap().unwrap().as_str(), "new");
    }

    #[test]
    fn test_file_store_empty_file_is_no_token() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("token.dat");
        fs::write(&path, "").unwrap();

        assert!(FileTokenStore::new(path).load().unwrap().is_none());
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryTokenStore::new();
        assert!(store.load().unwrap().is_none());

        let token = Token::new("t1").unwrap();
        store.save(&token).unwrap();
        assert_eq!(store.load().unwrap(), Some(token));
    }
}
