//! Availability records for draft/published document pairs.

use serde::{Deserialize, Serialize};

/// Why a document copy is or is not available to the current user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AvailabilityReason {
	/// The copy exists and is readable.
	Readable,
	/// The copy exists but the current user may not read it.
	PermissionDenied,
	/// The copy does not exist.
	NotFound,
}

/// Availability of one document copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentAvailability {
	pub available: bool,
	pub reason: AvailabilityReason,
}

impl DocumentAvailability {
	/// An existing, readable copy.
	pub const READABLE: Self = Self {
		available: true,
		reason: AvailabilityReason::Readable,
	};

	/// An existing copy the user may not read.
	pub const PERMISSION_DENIED: Self = Self {
		available: false,
		reason: AvailabilityReason::PermissionDenied,
	};

	/// A copy that does not exist.
	pub const NOT_FOUND: Self = Self {
		available: false,
		reason: AvailabilityReason::NotFound,
	};
}

/// Availability of both copies of a logical document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairAvailability {
	pub draft: DocumentAvailability,
	pub published: DocumentAvailability,
}

impl PairAvailability {
	/// Both copies present and readable.
	pub const READABLE: Self = Self {
		draft: DocumentAvailability::READABLE,
		published: DocumentAvailability::READABLE,
	};

	/// Neither copy exists.
	pub const NOT_FOUND: Self = Self {
		draft: DocumentAvailability::NOT_FOUND,
		published: DocumentAvailability::NOT_FOUND,
	};

	/// Returns true when at least one copy is available.
	pub fn any_available(&self) -> bool {
		self.draft.available || self.published.available
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn reason_uses_wire_casing() {
		assert_eq!(
			serde_json::to_value(DocumentAvailability::PERMISSION_DENIED).expect("serialize"),
			json!({"available": false, "reason": "PERMISSION_DENIED"}),
		);
	}

	#[test]
	fn any_available_checks_both_copies() {
		assert!(PairAvailability::READABLE.any_available());
		assert!(!PairAvailability::NOT_FOUND.any_available());

		let draft_only = PairAvailability {
			draft: DocumentAvailability::READABLE,
			published: DocumentAvailability::NOT_FOUND,
		};
		assert!(draft_only.any_available());
	}
}
