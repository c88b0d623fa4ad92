//! Durable JSON record stores and application state.
//!
//! Each record type lives as one JSON array in one file under the data
//! directory. Every mutation is a whole-array read-modify-write executed
//! inside a per-store critical section and re-serialized atomically (temp
//! file + rename), so concurrent writers serialize instead of losing
//! updates — two racing approvals cannot both succeed.

use crate::error::ComplianceError;
use crate::models::{AssessmentRecord, DocumentMetadata};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// A JSON-array-in-a-file repository for one record type.
pub struct JsonStore<T> {
    path: PathBuf,
    records: Mutex<Vec<T>>,
}

impl<T: Serialize + DeserializeOwned + Clone> JsonStore<T> {
    /// Open the store, loading existing records if the file is present.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ComplianceError> {
        let path = path.into();
        let records: Vec<T> = if path.exists() {
            serde_json::from_slice(&std::fs::read(&path)?)?
        } else {
            Vec::new()
        };
        Ok(Self {
            path,
            records: Mutex::new(records),
        })
    }

    /// Snapshot of all records.
    pub async fn read(&self) -> Vec<T> {
        self.records.lock().await.clone()
    }

    /// Apply `f` to the full record set and persist the result, all inside
    /// one critical section. All-or-nothing: if `f` fails or the write
    /// fails, the in-memory records are left as they were.
    pub async fn mutate<R>(
        &self,
        f: impl FnOnce(&mut Vec<T>) -> Result<R, ComplianceError>,
    ) -> Result<R, ComplianceError> {
        let mut guard = self.records.lock().await;
        let mut working = guard.clone();
        let out = f(&mut working)?;
        self.persist(&working).await?;
        *guard = working;
        Ok(out)
    }

    async fn persist(&self, records: &[T]) -> Result<(), ComplianceError> {
        let bytes = serde_json::to_vec_pretty(records)?;
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

/// Shared application state injected into every Axum handler.
pub struct AppState {
    pub documents: JsonStore<DocumentMetadata>,
    pub assessments: JsonStore<AssessmentRecord>,
}

impl AppState {
    /// Open both stores under `data_dir`, creating the directory if needed.
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self, ComplianceError> {
        let dir = data_dir.as_ref();
        std::fs::create_dir_all(dir)?;

        let state = Self {
            documents: JsonStore::open(dir.join("documents.json"))?,
            assessments: JsonStore::open(dir.join("assessments.json"))?,
        };
        tracing::info!("record stores opened under {}", dir.display());
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle;

    fn sample_doc(title: &str) -> DocumentMetadata {
        lifecycle::create_document(
            title.into(),
            "Policy".into(),
            "Governance".into(),
            "Body text.".into(),
            "alice".into(),
        )
    }

    #[tokio::test]
    async fn records_survive_a_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("documents.json");

        let store: JsonStore<DocumentMetadata> = JsonStore::open(&path).unwrap();
        let id = store
            .mutate(|docs| {
                let doc = sample_doc("Retention Policy");
                let id = doc.id;
                docs.push(doc);
                Ok(id)
            })
            .await
            .unwrap();

        drop(store);
        let reopened: JsonStore<DocumentMetadata> = JsonStore::open(&path).unwrap();
        let docs = reopened.read().await;
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, id);
        assert_eq!(docs[0].audit_trail.len(), 1);
    }

    #[tokio::test]
    async fn failed_mutation_leaves_store_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let store: JsonStore<DocumentMetadata> =
            JsonStore::open(dir.path().join("documents.json")).unwrap();

        store
            .mutate(|docs| {
                docs.push(sample_doc("Kept"));
                Ok(())
            })
            .await
            .unwrap();

        let result: Result<(), _> = store
            .mutate(|docs| {
                docs.push(sample_doc("Rolled back"));
                Err(ComplianceError::Validation("boom".into()))
            })
            .await;

        assert!(result.is_err());
        let docs = store.read().await;
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].title, "Kept");
    }

    #[tokio::test]
    async fn state_open_creates_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("registry-data");
        let state = AppState::open(&nested).unwrap();
        assert!(nested.is_dir());
        assert!(state.documents.read().await.is_empty());
        assert!(state.assessments.read().await.is_empty());
    }
}
