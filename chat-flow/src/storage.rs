use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

use crate::error::Result;

/// Trait for storing and retrieving chat sessions
#[async_trait]
pub trait SessionStorage<S>: Send + Sync
where
    S: Clone + Send + Sync + 'static,
{
    async fn save(&self, id: String, session: S) -> Result<()>;
    async fn get(&self, id: &str) -> Result<Option<S>>;
    async fn delete(&self, id: &str) -> Result<()>;
    async fn ids(&self) -> Result<Vec<String>>;
}

/// In-memory implementation of SessionStorage
pub struct InMemorySessionStorage<S> {
    sessions: Arc<DashMap<String, S>>,
}

impl<S> InMemorySessionStorage<S> {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl<S> Default for InMemorySessionStorage<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<S> SessionStorage<S> for InMemorySessionStorage<S>
where
    S: Clone + Send + Sync + 'static,
{
    async fn save(&self, id: String, session: S) -> Result<()> {
        self.sessions.insert(id, session);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<S>> {
        Ok(self.sessions.get(id).map(|entry| entry.clone()))
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.sessions.remove(id);
        Ok(())
    }

    async fn ids(&self) -> Result<Vec<String>> {
        Ok(self
            .sessions
            .iter()
            .map(|entry| entry.key().clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_storage_roundtrip() {
        let storage: InMemorySessionStorage<String> = InMemorySessionStorage::new();
        assert!(storage.is_empty());

        storage
            .save("session1".to_string(), "state".to_string())
            .await
            .unwrap();
        assert_eq!(storage.len(), 1);

        let retrieved = storage.get("session1").await.unwrap();
        assert_eq!(retrieved.as_deref(), Some("state"));
        assert!(storage.get("missing").await.unwrap().is_none());
        assert_eq!(storage.ids().await.unwrap(), vec!["session1".to_string()]);

        storage.delete("session1").await.unwrap();
        assert!(storage.get("session1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_shared_handles_see_updates() {
        let storage: InMemorySessionStorage<Arc<tokio::sync::Mutex<Vec<u32>>>> =
            InMemorySessionStorage::new();
        storage
            .save("s".to_string(), Arc::new(tokio::sync::Mutex::new(Vec::new())))
            .await
            .unwrap();

        let handle = storage.get("s").await.unwrap().unwrap();
        handle.lock().await.push(7);

        let again = storage.get("s").await.unwrap().unwrap();
        assert_eq!(*again.lock().await, vec![7]);
    }
}
