//! Draft/published id conventions.
//!
//! Every logical document is addressed by a pair of ids: the published id
//! (`movie-123`) and the draft id carrying the `drafts.` prefix
//! (`drafts.movie-123`). Only one prefix level exists; a draft id never
//! nests.

/// Prefix that marks the draft copy of a document.
pub const DRAFTS_PREFIX: &str = "drafts.";

/// Returns true when `id` addresses a draft copy.
pub fn is_draft_id(id: &str) -> bool {
	id.starts_with(DRAFTS_PREFIX)
}

/// Returns the draft id for a published id.
///
/// Ids that already carry the prefix are returned unchanged.
pub fn draft_id_of(id: &str) -> String {
	if is_draft_id(id) {
		id.to_string()
	} else {
		format!("{DRAFTS_PREFIX}{id}")
	}
}

/// Returns the published id for any id, stripping the draft prefix if present.
pub fn published_id_of(id: &str) -> &str {
	id.strip_prefix(DRAFTS_PREFIX).unwrap_or(id)
}

/// The id pair addressing one logical document.
///
/// Equality is structural; the pair is used as a cache and subscription key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdPair {
	/// Id of the published copy.
	pub published_id: String,
	/// Id of the draft copy (`drafts.` + published id).
	pub draft_id: String,
}

impl IdPair {
	/// Creates a pair from a published id, deriving the draft id.
	pub fn new(published_id: impl Into<String>) -> Self {
		let published_id = published_id.into();
		let published_id = published_id_of(&published_id).to_string();
		let draft_id = draft_id_of(&published_id);
		Self { published_id, draft_id }
	}

	/// Creates a pair from explicit ids.
	pub fn from_ids(published_id: impl Into<String>, draft_id: impl Into<String>) -> Self {
		Self {
			published_id: published_id.into(),
			draft_id: draft_id.into(),
		}
	}
}
