//! Session-scoped registry of uploaded files
//!
//! Records live for the process lifetime with no expiry or size bound.
//! Operations on the same session are not serialized across requests.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::models::UploadedFile;

#[async_trait]
pub trait FileStore: Send + Sync {
    async fn append(&self, session_id: &str, file: UploadedFile);

    /// Files of a session in upload order; empty for unknown sessions
    async fn list(&self, session_id: &str) -> Vec<UploadedFile>;

    /// Remove a file by provider name, returning the removed record
    async fn remove(&self, session_id: &str, file_name: &str) -> Option<UploadedFile>;

    /// Look a file up by its URI within a session
    async fn find_by_uri(&self, session_id: &str, uri: &str) -> Option<UploadedFile> {
        self.list(session_id)
            .await
            .into_iter()
            .find(|file| file.uri == uri)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryFileStore {
    sessions: DashMap<String, Vec<UploadedFile>>,
}

impl InMemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

#[async_trait]
impl FileStore for InMemoryFileStore {
    async fn append(&self, session_id: &str, file: UploadedFile) {
        self.sessions
            .entry(session_id.to_string())
            .or_default()
            .push(file);
    }

    async fn list(&self, session_id: &str) -> Vec<UploadedFile> {
        self.sessions
            .get(session_id)
            .map(|files| files.value().clone())
            .unwrap_or_default()
    }

    async fn remove(&self, session_id: &str, file_name: &str) -> Option<UploadedFile> {
        let mut files = self.sessions.get_mut(session_id)?;
        let index = files.iter().position(|file| file.name == file_name)?;
        Some(files.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(name: &str) -> UploadedFile {
        UploadedFile {
            name: name.to_string(),
            uri: format!("https://files.test/{}", name),
            mime_type: "image/png".to_string(),
            display_name: "cat.png".to_string(),
            size: 10,
            uploaded_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_append_and_list_in_order() {
        let store = InMemoryFileStore::new();
        store.append("s1", record("files/a")).await;
        store.append("s1", record("files/b")).await;
        store.append("s2", record("files/c")).await;

        let names: Vec<String> = store.list("s1").await.into_iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["files/a".to_string(), "files/b".to_string()]);
        assert_eq!(store.session_count(), 2);
    }

    #[tokio::test]
    async fn test_unknown_session_is_empty() {
        let store = InMemoryFileStore::new();
        assert!(store.list("nobody").await.is_empty());
        assert_eq!(store.remove("nobody", "files/a").await, None);
        assert_eq!(store.session_count(), 0);
    }

    #[tokio::test]
    async fn test_remove_by_name() {
        let store = InMemoryFileStore::new();
        store.append("s1", record("files/a")).await;
        store.append("s1", record("files/b")).await;

        let removed = store.remove("s1", "files/a").await;
        assert_eq!(removed.map(|f| f.name), Some("files/a".to_string()));
        assert_eq!(store.list("s1").await.len(), 1);
        assert_eq!(store.remove("s1", "files/a").await, None);
    }

    #[tokio::test]
    async fn test_find_by_uri() {
        let store = InMemoryFileStore::new();
        store.append("s1", record("files/a")).await;
        let found = store.find_by_uri("s1", "https://files.test/files/a").await;
        assert_eq!(found.map(|f| f.name), Some("files/a".to_string()));
        assert!(store.find_by_uri("s2", "https://files.test/files/a").await.is_none());
    }
}
