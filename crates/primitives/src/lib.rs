//! Core types for the document store: ids, snapshots, edit state, and validation markers.

/// Availability records for draft/published document pairs.
pub mod availability;
/// Document snapshots and merged edit state.
pub mod document;
/// Draft/published id conventions.
pub mod id;
/// Validation markers and the emitted validation status.
pub mod marker;

pub use availability::{AvailabilityReason, DocumentAvailability, PairAvailability};
pub use document::{Document, EditState, TransactionSyncLock};
pub use id::{IdPair, draft_id_of, is_draft_id, published_id_of};
pub use marker::{
	MarkerItem, MarkerLevel, MarkerType, Path, PathSegment, ValidationMarker, ValidationStatus,
};
