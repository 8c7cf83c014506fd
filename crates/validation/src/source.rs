//! Collaborator seams: the edit-state store and the availability transport.
//!
//! The pipeline never talks to a backend directly. It reads edit-state
//! snapshots from an [`EditStateSource`] and resolves referenced-document
//! availability through an [`AvailabilitySource`]; both are injected as
//! `Arc<dyn …>` when the [`ValidationRegistry`](crate::ValidationRegistry)
//! is built.

use async_trait::async_trait;
use futures::stream::BoxStream;
use strata_primitives::{EditState, IdPair, PairAvailability};

/// Stream of edit-state snapshots for one document pair.
pub type EditStateStream = BoxStream<'static, EditState>;

/// Stream of availability updates for one document pair.
pub type AvailabilityStream = BoxStream<'static, PairAvailability>;

/// Error from a point-in-time availability check.
///
/// Treated by rules as "could not verify", never propagated to subscribers;
/// the consulted id is still tracked so a later successful check retriggers.
#[derive(Debug, Clone, thiserror::Error)]
#[error("availability check for {id} failed: {message}")]
pub struct AvailabilityError {
	/// Document id the check was issued for.
	pub id: String,
	/// Transport-provided failure description.
	pub message: String,
}

impl AvailabilityError {
	/// Creates an error for the check on `id`.
	pub fn new(id: impl Into<String>, message: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			message: message.into(),
		}
	}
}

/// The store that merges draft and published copies into edit-state
/// snapshots.
///
/// The core only reads from this source; it never writes back.
pub trait EditStateSource: Send + Sync {
	/// Stream of snapshots for `pair`.
	fn edit_state(&self, pair: &IdPair, schema_type: &str) -> EditStateStream;
}

/// Transport reporting whether referenced documents exist and are readable.
#[async_trait]
pub trait AvailabilitySource: Send + Sync {
	/// Point-in-time availability of the pair addressed by `id`.
	async fn check(&self, id: &str) -> Result<PairAvailability, AvailabilityError>;

	/// Availability updates for the pair addressed by `id`.
	///
	/// The first item reflects the current state; later items are emitted on
	/// change. Any emission is treated as "something changed".
	fn observe(&self, id: &str) -> AvailabilityStream;
}
