use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use mockall::automock;
use tracing::debug;

use super::SessionError;
use crate::domain::Session;

/// Local key-value storage for the signed-in account.
#[automock]
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self) -> Result<Option<Session>, SessionError>;

    async fn save(&self, session: &Session) -> Result<(), SessionError>;

    /// Remove every session key.
    async fn clear(&self) -> Result<(), SessionError>;
}

/// Stores the session as one JSON object on disk.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> Result<Option<Session>, SessionError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    async fn save(&self, session: &Session) -> Result<(), SessionError> {
        let bytes = serde_json::to_vec_pretty(session)?;
        tokio::fs::write(&self.path, bytes).await?;
        debug!(path = %self.path.display(), "Session saved");
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use testresult::TestResult;

    #[tokio::test]
    async fn round_trips_and_clears() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("session.json");
        let store = FileSessionStore::new(&path);

        assert_eq!(store.load().await?, None);

        let session = Session {
            token: "jwt".to_string(),
            role: Role::User,
            user_id: "u7".to_string(),
            name: "Carla".to_string(),
            email: None,
        };
        store.save(&session).await?;

        let raw: serde_json::Value = serde_json::from_slice(&std::fs::read(&path)?)?;
        assert_eq!(raw["jwt_token"], "jwt");
        assert_eq!(raw["user_role"], "user");
        assert_eq!(raw["user_id"], "u7");
        assert_eq!(raw["name"], "Carla");

        assert_eq!(store.load().await?, Some(session));

        store.clear().await?;
        store.clear().await?;
        assert_eq!(store.load().await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn malformed_file_is_an_error() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("session.json");
        std::fs::write(&path, b"not json")?;

        let result = FileSessionStore::new(&path).load().await;
        assert!(matches!(result, Err(SessionError::Malformed(_))));
        Ok(())
    }
}
