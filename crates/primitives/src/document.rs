//! Document snapshots and merged edit state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One stored copy of a document (either the draft or the published copy).
///
/// System fields use the underscore-prefixed wire names; everything else is
/// schema-defined content and kept as raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
	/// Document id, including the `drafts.` prefix for draft copies.
	#[serde(rename = "_id")]
	pub id: String,
	/// Schema type name.
	#[serde(rename = "_type")]
	pub doc_type: String,
	/// Revision identifier of this snapshot.
	#[serde(rename = "_rev")]
	pub rev: String,
	#[serde(rename = "_createdAt")]
	pub created_at: DateTime<Utc>,
	#[serde(rename = "_updatedAt")]
	pub updated_at: DateTime<Utc>,
	/// Schema-defined content fields.
	#[serde(flatten)]
	pub content: Map<String, Value>,
}

impl Document {
	/// Returns a content field by name, if present.
	pub fn field(&self, name: &str) -> Option<&Value> {
		self.content.get(name)
	}
}

/// Lock state reported by the store while a transaction is being synced.
///
/// Carried through edit state verbatim; consumers other than the editor UI
/// do not interpret it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionSyncLock {
	pub enabled: bool,
}

/// Merged draft/published snapshot for one logical document, as emitted by
/// the edit-state store.
///
/// `draft` and `published` may each be absent when that copy does not exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditState {
	/// Published id of the document.
	pub id: String,
	/// Schema type name.
	#[serde(rename = "type")]
	pub schema_type: String,
	pub draft: Option<Document>,
	pub published: Option<Document>,
	/// Whether the type edits the published copy directly.
	pub live_edit: bool,
	/// Whether the store has seen both copies at least once.
	pub ready: bool,
	pub transaction_sync_lock: Option<TransactionSyncLock>,
}

impl EditState {
	/// Returns the snapshot to operate on: the draft when present, otherwise
	/// the published copy.
	pub fn value(&self) -> Option<&Document> {
		self.draft.as_ref().or(self.published.as_ref())
	}

	/// Returns the revision of [`Self::value`], if any snapshot exists.
	pub fn revision(&self) -> Option<&str> {
		self.value().map(|doc| doc.rev.as_str())
	}

	/// Returns true when neither a draft nor a published copy exists.
	pub fn is_empty(&self) -> bool {
		self.draft.is_none() && self.published.is_none()
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use serde_json::json;

	use super::*;

	fn snapshot(id: &str, rev: &str, title: Value) -> Document {
		serde_json::from_value(json!({
			"_id": id,
			"_type": "movie",
			"_rev": rev,
			"_createdAt": "2021-09-07T16:23:52.256Z",
			"_updatedAt": "2021-09-07T16:23:52.256Z",
			"title": title,
		}))
		.expect("valid document json")
	}

	#[test]
	fn document_keeps_content_fields_through_serde() {
		let doc = snapshot("movie-1", "rev1", json!("Seven Samurai"));
		assert_eq!(doc.field("title"), Some(&json!("Seven Samurai")));

		let round_tripped: Document =
			serde_json::from_value(serde_json::to_value(&doc).expect("serialize")).expect("deserialize");
		assert_eq!(round_tripped, doc);
	}

	#[test]
	fn edit_state_prefers_draft_over_published() {
		let state = EditState {
			id: "movie-1".into(),
			schema_type: "movie".into(),
			draft: Some(snapshot("drafts.movie-1", "rev2", json!("Draft title"))),
			published: Some(snapshot("movie-1", "rev1", json!("Published title"))),
			live_edit: false,
			ready: true,
			transaction_sync_lock: None,
		};
		assert_eq!(state.revision(), Some("rev2"));
		assert!(!state.is_empty());
	}

	#[test]
	fn edit_state_without_snapshots_is_empty() {
		let state = EditState {
			id: "movie-1".into(),
			schema_type: "movie".into(),
			draft: None,
			published: None,
			live_edit: false,
			ready: true,
			transaction_sync_lock: None,
		};
		assert!(state.is_empty());
		assert_eq!(state.revision(), None);
	}
}
