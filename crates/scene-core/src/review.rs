//! Review sessions over published aggregation results.
//!
//! A session holds the immutable result of one run plus the edits a
//! reviewer applied afterwards. Publishing a new result for the same
//! document replaces the previous session.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use serde::{Deserialize, Serialize};
use tracing::debug;

use scene_model::{AggregationResult, DocumentId, Fingerprint, Scene, TimeOfDay};

use crate::error::ReviewError;

/// A post-hoc field replacement on one scene.
///
/// Fingerprint, position and length are never touched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum SceneEdit {
    Ordinal(String),
    MasterLocation(String),
    SubLocation(String),
    Time(TimeOfDay),
    Flagged(bool),
    Notes(String),
}

impl SceneEdit {
    fn apply(&self, scene: &mut Scene) {
        match self {
            Self::Ordinal(value) => scene.ordinal.canonical = value.clone(),
            Self::MasterLocation(value) => scene.location.master_canonical = value.clone(),
            Self::SubLocation(value) => scene.location.sub_canonical = value.clone(),
            Self::Time(value) => scene.time.canonical = *value,
            Self::Flagged(value) => scene.review.flagged = *value,
            Self::Notes(value) => scene.review.notes = value.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReviewSession {
    result: AggregationResult,
    revision: u64,
}

impl ReviewSession {
    pub fn new(result: AggregationResult) -> Self {
        Self {
            result,
            revision: 0,
        }
    }

    pub fn document_id(&self) -> &DocumentId {
        &self.result.document_id
    }

    /// Number of edits applied since the session was published.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn scene(&self, fingerprint: &Fingerprint) -> Option<&Scene> {
        self.result
            .scenes
            .iter()
            .find(|scene| &scene.fingerprint == fingerprint)
    }

    pub fn apply(&mut self, fingerprint: &Fingerprint, edit: SceneEdit) -> Result<(), ReviewError> {
        let scene = self
            .result
            .scenes
            .iter_mut()
            .find(|scene| &scene.fingerprint == fingerprint)
            .ok_or(ReviewError::UnknownScene(*fingerprint))?;
        edit.apply(scene);
        self.result.statistics.flagged_for_review = self
            .result
            .scenes
            .iter()
            .filter(|scene| scene.review.flagged)
            .count();
        self.revision += 1;
        debug!(
            document_id = %self.result.document_id,
            fingerprint = %fingerprint,
            revision = self.revision,
            "applied scene edit"
        );
        Ok(())
    }

    /// Current state of the result, edits included.
    pub fn snapshot(&self) -> &AggregationResult {
        &self.result
    }
}

/// Review sessions keyed by document.
#[derive(Debug, Default)]
pub struct ReviewStore {
    sessions: HashMap<DocumentId, ReviewSession>,
}

impl ReviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a session for a finished run, invalidating any earlier one for
    /// the same document.
    pub fn publish(&mut self, result: AggregationResult) -> &mut ReviewSession {
        let session = ReviewSession::new(result);
        match self.sessions.entry(session.document_id().clone()) {
            Entry::Occupied(mut entry) => {
                debug!(document_id = %entry.key(), "replacing review session");
                entry.insert(session);
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(session),
        }
    }

    pub fn get(&self, document_id: &DocumentId) -> Option<&ReviewSession> {
        self.sessions.get(document_id)
    }

    pub fn apply(
        &mut self,
        document_id: &DocumentId,
        fingerprint: &Fingerprint,
        edit: SceneEdit,
    ) -> Result<(), ReviewError> {
        self.sessions
            .get_mut(document_id)
            .ok_or_else(|| ReviewError::UnknownDocument(document_id.clone()))?
            .apply(fingerprint, edit)
    }

    pub fn clear(&mut self, document_id: &DocumentId) -> Option<ReviewSession> {
        self.sessions.remove(document_id)
    }

    pub fn clear_all(&mut self) {
        self.sessions.clear();
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
