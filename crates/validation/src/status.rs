//! Shared replay-one handle for validation status streams.

use futures::StreamExt;
use futures::stream;
use parking_lot::Mutex;
use strata_primitives::ValidationStatus;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

/// Stream of validation statuses, as handed to subscribers.
pub type ValidationStatusStream = futures::stream::BoxStream<'static, ValidationStatus>;

/// Statuses buffered per subscriber before older intermediates are dropped.
const STATUS_BUFFER: usize = 256;

/// Multicast cell holding the most recently emitted status.
///
/// Publishing and subscribing synchronize on one lock, so a new subscriber
/// sees every status exactly once: either replayed (emitted before the
/// subscribe) or on the live tail (emitted after).
pub(crate) struct StatusCell {
	inner: Mutex<StatusCellInner>,
}

struct StatusCellInner {
	last: Option<ValidationStatus>,
	live: broadcast::Sender<ValidationStatus>,
}

impl StatusCell {
	pub fn new() -> Self {
		let (live, _) = broadcast::channel(STATUS_BUFFER);
		Self {
			inner: Mutex::new(StatusCellInner { last: None, live }),
		}
	}

	/// Publishes a status to all current subscribers and stores it for
	/// replay to future ones.
	pub fn publish(&self, status: ValidationStatus) {
		let mut inner = self.inner.lock();
		inner.last = Some(status.clone());
		// No receivers is fine; the pipeline runs subscriber-independent.
		let _ = inner.live.send(status);
	}

	/// Subscribes, replaying the last known status first.
	///
	/// The stream never terminates while the cell is alive; a subscriber
	/// that falls more than [`STATUS_BUFFER`] statuses behind skips the
	/// oldest intermediates but always observes the newest.
	pub fn subscribe(&self) -> ValidationStatusStream {
		let (replay, receiver) = {
			let inner = self.inner.lock();
			(inner.last.clone(), inner.live.subscribe())
		};
		stream::iter(replay)
			.chain(stream::unfold(receiver, |mut receiver| async move {
				loop {
					match receiver.recv().await {
						Ok(status) => return Some((status, receiver)),
						Err(RecvError::Lagged(_)) => continue,
						Err(RecvError::Closed) => return None,
					}
				}
			}))
			.boxed()
	}
}
