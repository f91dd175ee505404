//! [`FileEnrichmentStore`]: annotations in a local JSON file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use triage::{
    Annotation, AnnotationFilter, AnnotationId, AnnotationKind, EnrichableItem, EnrichmentStore,
    TriageError,
};
use uuid::Uuid;

use crate::errors::EnrichmentError;

// ---------------------------------------------------------------------------
// On-disk format
// ---------------------------------------------------------------------------

/// One stored annotation with the descriptor it was written for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    pub id: AnnotationId,
    pub kind: AnnotationKind,
    pub item: EnrichableItem,
    pub created_at: DateTime<Utc>,
}

impl AnnotationRecord {
    fn annotation(&self) -> Annotation {
        Annotation {
            id: self.id.clone(),
            entity_id: self.item.entity_id.clone(),
            kind: self.kind,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct AnnotationFile {
    #[serde(default)]
    annotations: Vec<AnnotationRecord>,
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Persists annotations as JSON, keeping at most one per entity.
///
/// Every operation reads the file, and writes replace it through a temporary
/// sibling and a rename. Operations on one instance are serialized; separate
/// processes sharing the file are not coordinated.
#[derive(Debug)]
pub struct FileEnrichmentStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileEnrichmentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every stored record, including the descriptors.
    pub async fn records(&self) -> Result<Vec<AnnotationRecord>, EnrichmentError> {
        let _guard = self.lock.lock().await;
        Ok(self.read().await?.annotations)
    }

    async fn read(&self) -> Result<AnnotationFile, EnrichmentError> {
        let contents = match tokio::fs::read(&self.path).await {
            Ok(contents) => contents,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                return Ok(AnnotationFile::default())
            }
            Err(source) => return Err(self.io_error(source)),
        };
        serde_json::from_slice(&contents).map_err(|source| EnrichmentError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    async fn write(&self, file: &AnnotationFile) -> Result<(), EnrichmentError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| self.io_error(source))?;
        }

        let encoded = serde_json::to_vec_pretty(file).map_err(EnrichmentError::Encode)?;
        let staging = self.path.with_extension("json.tmp");
        tokio::fs::write(&staging, encoded)
            .await
            .map_err(|source| self.io_error(source))?;
        tokio::fs::rename(&staging, &self.path)
            .await
            .map_err(|source| self.io_error(source))
    }

    fn io_error(&self, source: std::io::Error) -> EnrichmentError {
        EnrichmentError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// Replaces any annotation on `item`'s entity with a new one of `kind`.
    async fn annotate(
        &self,
        item: &EnrichableItem,
        kind: AnnotationKind,
    ) -> Result<Annotation, EnrichmentError> {
        let _guard = self.lock.lock().await;
        let mut file = self.read().await?;

        file.annotations
            .retain(|record| record.item.entity_id != item.entity_id);
        let record = AnnotationRecord {
            id: new_annotation_id()?,
            kind,
            item: item.clone(),
            created_at: Utc::now(),
        };
        let annotation = record.annotation();
        file.annotations.push(record);

        self.write(&file).await?;
        tracing::debug!(
            entity_id = %item.entity_id,
            annotation_id = %annotation.id,
            ?kind,
            "Annotation stored"
        );
        Ok(annotation)
    }

    /// Deletes the annotation `id` if it is of `kind`. Deleting an annotation
    /// that no longer exists succeeds.
    async fn remove(&self, id: &AnnotationId, kind: AnnotationKind) -> Result<(), EnrichmentError> {
        let _guard = self.lock.lock().await;
        let mut file = self.read().await?;

        let before = file.annotations.len();
        file.annotations
            .retain(|record| !(&record.id == id && record.kind == kind));
        if file.annotations.len() == before {
            tracing::debug!(annotation_id = %id, ?kind, "Annotation already removed");
            return Ok(());
        }

        self.write(&file).await?;
        tracing::debug!(annotation_id = %id, ?kind, "Annotation removed");
        Ok(())
    }
}

fn new_annotation_id() -> Result<AnnotationId, EnrichmentError> {
    AnnotationId::new(Uuid::new_v4().to_string()).ok_or(EnrichmentError::EmptyId)
}

#[async_trait]
impl EnrichmentStore for FileEnrichmentStore {
    async fn get(
        &self,
        filter: Option<&AnnotationFilter>,
        cancellation: &CancellationToken,
    ) -> Result<Vec<Annotation>, TriageError> {
        if cancellation.is_cancelled() {
            return Err(TriageError::Cancelled);
        }
        let records = self.records().await?;
        Ok(records
            .iter()
            .map(AnnotationRecord::annotation)
            .filter(|annotation| filter.is_none_or(|filter| filter.matches(annotation)))
            .collect())
    }

    async fn pin_item(&self, item: &EnrichableItem) -> Result<Annotation, TriageError> {
        Ok(self.annotate(item, AnnotationKind::Pin).await?)
    }

    async fn unpin_item(&self, id: &AnnotationId) -> Result<(), TriageError> {
        Ok(self.remove(id, AnnotationKind::Pin).await?)
    }

    async fn snooze_item(&self, item: &EnrichableItem) -> Result<Annotation, TriageError> {
        Ok(self.annotate(item, AnnotationKind::Snooze).await?)
    }

    async fn unsnooze_item(&self, id: &AnnotationId) -> Result<(), TriageError> {
        Ok(self.remove(id, AnnotationKind::Snooze).await?)
    }
}
