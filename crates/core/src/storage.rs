//! Opaque key-value storage for persisted frontend state

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{CoreError, CoreResult};

/// Durable string key-value store the session state is written through.
///
/// The frontend treats persistence as an opaque side effect; implementations
/// only have to round-trip whatever string was stored under a key.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    async fn get(&self, key: &str) -> CoreResult<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> CoreResult<()>;
    async fn remove(&self, key: &str) -> CoreResult<()>;
}

/// In-process backend for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StorageBackend for MemoryStorage {
    async fn get(&self, key: &str) -> CoreResult<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> CoreResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

/// Backend storing all entries as one JSON object in a file.
///
/// The whole map is rewritten on every mutation, via a temp file and rename
/// so readers never observe a half-written file. A missing file reads as an
/// empty store.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn read_entries(&self) -> CoreResult<HashMap<String, String>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(err) => Err(err.into()),
        }
    }

    async fn write_entries(&self, entries: &HashMap<String, String>) -> CoreResult<()> {
        let bytes = serde_json::to_vec_pretty(entries)?;
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl StorageBackend for JsonFileStorage {
    async fn get(&self, key: &str) -> CoreResult<Option<String>> {
        Ok(self.read_entries().await?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        let mut entries = self.read_entries().await?;
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries).await
    }

    async fn remove(&self, key: &str) -> CoreResult<()> {
        let mut entries = self.read_entries().await?;
        if entries.remove(key).is_some() {
            self.write_entries(&entries).await?;
        }
        Ok(())
    }
}

// Mock implementation for testing
#[cfg(any(test, feature = "tests"))]
pub mod mock {
    use super::*;
    use mockall::mock;

    mock! {
        pub StorageBackend {}

        #[async_trait]
        impl StorageBackend for StorageBackend {
            async fn get(&self, key: &str) -> CoreResult<Option<String>>;
            async fn set(&self, key: &str, value: &str) -> CoreResult<()>;
            async fn remove(&self, key: &str) -> CoreResult<()>;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::StorageBackendTestSuite;

    fn temp_file(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("panel-storage-{}-{name}.json", std::process::id()))
    }

    #[tokio::test]
    async fn memory_storage_conformance() {
        StorageBackendTestSuite::new(MemoryStorage::new())
            .run_all_tests()
            .await
            .expect("memory backend conformance");
    }

    #[tokio::test]
    async fn json_file_storage_conformance() {
        let path = temp_file("conformance");
        let _ = tokio::fs::remove_file(&path).await;

        StorageBackendTestSuite::new(JsonFileStorage::new(&path))
            .run_all_tests()
            .await
            .expect("file backend conformance");

        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn json_file_storage_survives_reopen() {
        let path = temp_file("reopen");
        let _ = tokio::fs::remove_file(&path).await;

        let storage = JsonFileStorage::new(&path);
        storage.set("session", "{\"ok\":true}").await.unwrap();
        drop(storage);

        let reopened = JsonFileStorage::new(&path);
        assert_eq!(
            reopened.get("session").await.unwrap().as_deref(),
            Some("{\"ok\":true}")
        );

        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn mock_propagates_backend_errors() {
        let mut backend = mock::MockStorageBackend::new();
        backend
            .expect_get()
            .returning(|_| Err(CoreError::storage_error("backend offline")));

        let err = backend.get("session").await.unwrap_err();
        assert!(matches!(err, CoreError::Storage { .. }));
    }
}
