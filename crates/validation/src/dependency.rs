//! Availability watches for documents consulted by validation runs.
//!
//! One tracker exists per validated document. After every *completed* run it
//! is reconciled against the run's consulted-id set: a watch opens per new
//! id and closes per dropped id, so the live watch set always mirrors the
//! dependencies of the latest completed run. Each watch forwards
//! availability changes as re-validate triggers; changes are not coalesced,
//! since the orchestrator's cancel-on-supersede rule makes redundant runs
//! harmless.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::source::{AvailabilitySource, AvailabilityStream};

/// Re-validate trigger emitted when a watched dependency changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DependencyChange {
	/// Id of the document whose availability changed.
	pub id: String,
}

struct DependencyWatch {
	cancel: CancellationToken,
}

/// Tracks one availability watch per consulted document id.
pub(crate) struct DependencyTracker {
	availability: Arc<dyn AvailabilitySource>,
	triggers: mpsc::UnboundedSender<DependencyChange>,
	watches: HashMap<String, DependencyWatch>,
}

impl DependencyTracker {
	pub fn new(
		availability: Arc<dyn AvailabilitySource>,
		triggers: mpsc::UnboundedSender<DependencyChange>,
	) -> Self {
		Self {
			availability,
			triggers,
			watches: HashMap::new(),
		}
	}

	/// Diffs the live watch set against `consulted`.
	///
	/// Closes watches for ids no longer referenced, opens watches for new
	/// ids, and leaves ids present in both untouched.
	pub fn reconcile(&mut self, consulted: &BTreeSet<String>) {
		self.watches.retain(|id, watch| {
			let keep = consulted.contains(id);
			if !keep {
				debug!(dependency = %id, "validation.dependency.unwatch");
				watch.cancel.cancel();
			}
			keep
		});

		for id in consulted {
			if self.watches.contains_key(id) {
				continue;
			}
			debug!(dependency = %id, "validation.dependency.watch");
			let cancel = CancellationToken::new();
			tokio::spawn(watch_availability(
				id.clone(),
				self.availability.observe(id),
				self.triggers.clone(),
				cancel.clone(),
			));
			self.watches.insert(id.clone(), DependencyWatch { cancel });
		}
	}

	/// Number of live watches.
	#[cfg(test)]
	pub fn watch_count(&self) -> usize {
		self.watches.len()
	}
}

impl Drop for DependencyTracker {
	fn drop(&mut self) {
		for watch in self.watches.values() {
			watch.cancel.cancel();
		}
	}
}

async fn watch_availability(
	id: String,
	updates: AvailabilityStream,
	triggers: mpsc::UnboundedSender<DependencyChange>,
	cancel: CancellationToken,
) {
	let mut updates = updates.fuse();
	// The first emission mirrors the state the completed run already
	// consulted; it primes the watch without retriggering.
	let mut primed = false;
	loop {
		tokio::select! {
			biased;
			_ = cancel.cancelled() => break,
			maybe = updates.next() => {
				let Some(_snapshot) = maybe else { break };
				if !primed {
					primed = true;
					continue;
				}
				if triggers.send(DependencyChange { id: id.clone() }).is_err() {
					break;
				}
			}
		}
	}
}
