//! Memoized registry of per-document validation pipelines.
//!
//! The registry is the sole entry point for the editing UI. It owns every
//! pipeline and its upstream subscriptions; subscribers only ever hold a
//! reference to the shared output stream. Entries are created lazily on the
//! first request for an identity and are never evicted (the key space is
//! bounded by the documents actually opened for editing in a session), so a
//! later request replays the last computed status instead of recomputing.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use strata_primitives::IdPair;
use tracing::debug;

use crate::pipeline::Pipeline;
use crate::schema::SchemaRegistry;
use crate::source::{AvailabilitySource, EditStateSource};
use crate::status::ValidationStatusStream;
use crate::{Error, Result};

/// Structural key identifying one validated document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentIdentity {
	/// Draft/published id pair.
	pub pair: IdPair,
	/// Schema type the document is validated as.
	pub schema_type: String,
}

impl DocumentIdentity {
	/// Creates an identity for `pair` validated as `schema_type`.
	pub fn new(pair: IdPair, schema_type: impl Into<String>) -> Self {
		Self {
			pair,
			schema_type: schema_type.into(),
		}
	}
}

/// Registry handing out shared validation status streams.
///
/// Thread-safe; shared across the host via `Arc<ValidationRegistry>`. Must
/// be used from within a tokio runtime, since pipelines spawn onto it.
/// Dropping the registry cancels every pipeline; by design that happens only
/// at process shutdown.
pub struct ValidationRegistry {
	schemas: Arc<SchemaRegistry>,
	edit_states: Arc<dyn EditStateSource>,
	availability: Arc<dyn AvailabilitySource>,
	pipelines: RwLock<HashMap<DocumentIdentity, Pipeline>>,
}

impl ValidationRegistry {
	/// Creates a registry over the given collaborators.
	pub fn new(
		schemas: Arc<SchemaRegistry>,
		edit_states: Arc<dyn EditStateSource>,
		availability: Arc<dyn AvailabilitySource>,
	) -> Self {
		Self {
			schemas,
			edit_states,
			availability,
			pipelines: RwLock::new(HashMap::new()),
		}
	}

	/// Live validation status stream for one document.
	///
	/// The first call per identity builds and starts the pipeline; every
	/// later call returns a new subscription to the same shared handle,
	/// which synchronously replays the last known status. Subscriber count
	/// never affects whether validation runs.
	///
	/// # Errors
	///
	/// [`Error::UnknownSchemaType`] when no type is registered under
	/// `schema_type`. An already-constructed stream never errors.
	pub fn validation(&self, pair: &IdPair, schema_type: &str) -> Result<ValidationStatusStream> {
		let identity = DocumentIdentity::new(pair.clone(), schema_type);
		{
			let pipelines = self.pipelines.read();
			if let Some(pipeline) = pipelines.get(&identity) {
				return Ok(pipeline.subscribe());
			}
		}

		let schema_type = self
			.schemas
			.get(&identity.schema_type)
			.ok_or_else(|| Error::UnknownSchemaType(identity.schema_type.clone()))?;

		let mut pipelines = self.pipelines.write();
		let pipeline = pipelines.entry(identity.clone()).or_insert_with(|| {
			debug!(
				document = %identity.pair.published_id,
				schema_type = %identity.schema_type,
				"validation.pipeline.create"
			);
			let edit_states = self
				.edit_states
				.edit_state(&identity.pair, &identity.schema_type);
			Pipeline::spawn(
				identity.clone(),
				schema_type,
				edit_states,
				self.availability.clone(),
			)
		});
		Ok(pipeline.subscribe())
	}

	/// Number of live pipelines.
	pub fn pipeline_count(&self) -> usize {
		self.pipelines.read().len()
	}
}
