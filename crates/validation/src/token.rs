use tokio_util::sync::CancellationToken;

/// Monotonic generation clock for validation run lifecycles.
///
/// Generation 0 means no run has started; the first run is generation 1.
#[derive(Debug, Default)]
pub(crate) struct RunClock {
	next: u64,
}

impl RunClock {
	/// Returns the next generation ID.
	pub fn next(&mut self) -> u64 {
		self.next = self.next.wrapping_add(1);
		self.next
	}
}

/// Generation-scoped cancellation token for one validation run.
#[derive(Debug, Clone)]
pub(crate) struct RunToken {
	generation: u64,
	cancel: CancellationToken,
}

impl RunToken {
	/// Creates a token for the given generation.
	pub fn new(generation: u64) -> Self {
		Self {
			generation,
			cancel: CancellationToken::new(),
		}
	}

	/// Returns generation ID.
	pub const fn generation(&self) -> u64 {
		self.generation
	}

	/// Requests cancellation.
	pub fn cancel(&self) {
		self.cancel.cancel();
	}

	/// Future resolving when cancellation is requested.
	pub async fn cancelled(&self) {
		self.cancel.cancelled().await;
	}
}
