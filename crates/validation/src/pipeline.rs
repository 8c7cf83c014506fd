//! Per-document validation orchestration.
//!
//! One task runs per document identity for the life of the registry. It
//! merges edit-state emissions and dependency changes into validation runs,
//! cancelling the in-flight run whenever a newer trigger arrives, so only
//! the most recently started run can ever complete observably.

use std::collections::BTreeSet;
use std::sync::Arc;

use futures::StreamExt;
use futures::stream::Fuse;
use strata_primitives::{EditState, ValidationMarker, ValidationStatus};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::dependency::DependencyTracker;
use crate::invoke::{ValidationOutcome, validate_document};
use crate::registry::DocumentIdentity;
use crate::schema::SchemaType;
use crate::source::{AvailabilitySource, EditStateStream};
use crate::status::{StatusCell, ValidationStatusStream};
use crate::token::{RunClock, RunToken};

/// A spawned pipeline and its shared status handle.
///
/// Owned exclusively by the registry; dropping it cancels the task.
pub(crate) struct Pipeline {
	cell: Arc<StatusCell>,
	shutdown: CancellationToken,
}

impl Pipeline {
	/// Spawns the pipeline task onto the ambient runtime.
	pub fn spawn(
		identity: DocumentIdentity,
		schema_type: Arc<SchemaType>,
		edit_states: EditStateStream,
		availability: Arc<dyn AvailabilitySource>,
	) -> Self {
		let cell = Arc::new(StatusCell::new());
		let shutdown = CancellationToken::new();
		tokio::spawn(run_pipeline(
			identity,
			schema_type,
			edit_states,
			availability,
			cell.clone(),
			shutdown.clone(),
		));
		Self { cell, shutdown }
	}

	/// Subscribes to the shared status stream.
	pub fn subscribe(&self) -> ValidationStatusStream {
		self.cell.subscribe()
	}
}

impl Drop for Pipeline {
	fn drop(&mut self) {
		self.shutdown.cancel();
	}
}

/// Completion notice sent by a run task back to its pipeline.
struct RunCompletion {
	generation: u64,
	outcome: ValidationOutcome,
}

struct PipelineTask {
	identity: DocumentIdentity,
	schema_type: Arc<SchemaType>,
	availability: Arc<dyn AvailabilitySource>,
	cell: Arc<StatusCell>,
	tracker: DependencyTracker,
	clock: RunClock,
	/// Token of the in-flight run, if any.
	active: Option<RunToken>,
	/// Most recent edit-state snapshot; dependency triggers revalidate it.
	latest: Option<EditState>,
	last_markers: Vec<ValidationMarker>,
	last_revision: Option<String>,
	completions: mpsc::UnboundedSender<RunCompletion>,
}

async fn run_pipeline(
	identity: DocumentIdentity,
	schema_type: Arc<SchemaType>,
	edit_states: EditStateStream,
	availability: Arc<dyn AvailabilitySource>,
	cell: Arc<StatusCell>,
	shutdown: CancellationToken,
) {
	let mut edit_states: Fuse<EditStateStream> = edit_states.fuse();
	let mut edit_states_done = false;
	let (trigger_tx, mut triggers) = mpsc::unbounded_channel();
	let (completion_tx, mut completions) = mpsc::unbounded_channel();

	let mut task = PipelineTask {
		tracker: DependencyTracker::new(availability.clone(), trigger_tx),
		identity,
		schema_type,
		availability,
		cell,
		clock: RunClock::default(),
		active: None,
		latest: None,
		last_markers: Vec::new(),
		last_revision: None,
		completions: completion_tx,
	};

	loop {
		tokio::select! {
			biased;
			_ = shutdown.cancelled() => {
				if let Some(token) = task.active.take() {
					token.cancel();
				}
				break;
			}
			maybe = edit_states.next(), if !edit_states_done => {
				match maybe {
					Some(state) => {
						task.latest = Some(state);
						task.trigger_run();
					}
					None => {
						// The store closed the stream; keep serving replay
						// and dependency triggers for the latest snapshot.
						trace!(document = %task.identity.pair.published_id, "validation.edit_states.ended");
						edit_states_done = true;
					}
				}
			}
			Some(change) = triggers.recv() => {
				debug!(
					document = %task.identity.pair.published_id,
					dependency = %change.id,
					"validation.dependency.trigger"
				);
				task.trigger_run();
			}
			Some(done) = completions.recv() => {
				task.complete_run(done);
			}
		}
	}
}

impl PipelineTask {
	/// Starts a validation run for the latest snapshot, superseding any run
	/// still in flight.
	fn trigger_run(&mut self) {
		let Some(state) = self.latest.clone() else {
			return;
		};
		if let Some(token) = self.active.take() {
			debug!(
				document = %self.identity.pair.published_id,
				generation = token.generation(),
				"validation.run.supersede"
			);
			token.cancel();
		}

		// Nothing to validate: emit the terminal empty status directly,
		// with no in-progress emission.
		if state.is_empty() {
			self.tracker.reconcile(&BTreeSet::new());
			self.last_markers.clear();
			self.last_revision = None;
			self.cell.publish(ValidationStatus::default());
			return;
		}

		self.cell.publish(ValidationStatus {
			is_validating: true,
			markers: self.last_markers.clone(),
			revision: self.last_revision.clone(),
		});

		let generation = self.clock.next();
		let token = RunToken::new(generation);
		let run_token = token.clone();
		let schema_type = self.schema_type.clone();
		let availability = self.availability.clone();
		let completions = self.completions.clone();
		debug!(
			document = %self.identity.pair.published_id,
			schema_type = %self.identity.schema_type,
			generation,
			revision = state.revision(),
			"validation.run.start"
		);
		tokio::spawn(async move {
			tokio::select! {
				biased;
				_ = run_token.cancelled() => {}
				outcome = validate_document(&schema_type, &state, availability.as_ref()) => {
					let _ = completions.send(RunCompletion { generation, outcome });
				}
			}
		});
		self.active = Some(token);
	}

	/// Applies a run completion, unless a newer trigger superseded the run.
	fn complete_run(&mut self, done: RunCompletion) {
		let current = self.active.as_ref().map(RunToken::generation);
		if current != Some(done.generation) {
			debug!(
				document = %self.identity.pair.published_id,
				generation = done.generation,
				"validation.run.stale"
			);
			return;
		}
		self.active = None;

		let ValidationOutcome {
			markers,
			consulted,
			revision,
		} = done.outcome;
		self.tracker.reconcile(&consulted);
		debug!(
			document = %self.identity.pair.published_id,
			generation = done.generation,
			markers = markers.len(),
			dependencies = consulted.len(),
			"validation.run.complete"
		);
		self.last_markers = markers;
		self.last_revision = revision;
		self.cell.publish(ValidationStatus {
			is_validating: false,
			markers: self.last_markers.clone(),
			revision: self.last_revision.clone(),
		});
	}
}
