//! Pin and snooze annotations owned by the enrichment store.

use serde::{Deserialize, Serialize};

use crate::{AnnotationId, EntityId, ProviderId};

/// What an annotation does to its item.
///
/// An entity carries at most one annotation, so pin and snooze are mutually
/// exclusive: writing one replaces the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationKind {
    Pin,
    Snooze,
}

/// A stored pin or snooze marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: AnnotationId,
    pub entity_id: EntityId,
    pub kind: AnnotationKind,
}

impl Annotation {
    pub fn is_pin(&self) -> bool {
        self.kind == AnnotationKind::Pin
    }

    pub fn is_snooze(&self) -> bool {
        self.kind == AnnotationKind::Snooze
    }
}

/// Kind of item an annotation is written against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnrichableKind {
    #[serde(rename = "pr")]
    PullRequest,
    #[serde(rename = "issue")]
    Issue,
}

/// Descriptor sent to the enrichment store when pinning or snoozing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichableItem {
    pub kind: EnrichableKind,
    pub entity_id: EntityId,
    pub url: String,
    pub provider: ProviderId,
}

/// Narrows an enrichment store read. An empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationFilter {
    pub entity_id: Option<EntityId>,
    pub kind: Option<AnnotationKind>,
}

impl AnnotationFilter {
    /// Filter matching every annotation on one entity.
    pub fn for_entity(entity_id: EntityId) -> Self {
        Self {
            entity_id: Some(entity_id),
            kind: None,
        }
    }

    /// Restricts the filter to one annotation kind.
    pub fn with_kind(mut self, kind: AnnotationKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn matches(&self, annotation: &Annotation) -> bool {
        self.entity_id
            .as_ref()
            .is_none_or(|id| *id == annotation.entity_id)
            && self.kind.is_none_or(|kind| kind == annotation.kind)
    }
}
