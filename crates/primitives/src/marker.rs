//! Validation markers and the emitted validation status.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Severity of a validation marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerLevel {
	Error,
	Warning,
	Info,
}

/// One segment of a field path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
	/// Named field of an object value.
	Field(String),
	/// Member index of an array value.
	Index(usize),
}

impl fmt::Display for PathSegment {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Field(name) => write!(f, "{name}"),
			Self::Index(index) => write!(f, "[{index}]"),
		}
	}
}

impl From<&str> for PathSegment {
	fn from(name: &str) -> Self {
		Self::Field(name.to_string())
	}
}

impl From<usize> for PathSegment {
	fn from(index: usize) -> Self {
		Self::Index(index)
	}
}

/// Ordered field path addressing the value a marker describes.
pub type Path = Vec<PathSegment>;

/// Rule-produced payload of a marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerItem {
	/// Human-readable problem description.
	pub message: String,
	/// Rule-specific payload, if the rule attaches one.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub payload: Option<Value>,
}

impl MarkerItem {
	/// Creates an item carrying only a message.
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			message: message.into(),
			payload: None,
		}
	}
}

/// One reported validation problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationMarker {
	/// Marker category; always `"validation"` on the wire.
	#[serde(rename = "type")]
	pub marker_type: MarkerType,
	pub level: MarkerLevel,
	pub path: Path,
	pub item: MarkerItem,
}

/// Marker category discriminant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerType {
	#[default]
	Validation,
}

impl ValidationMarker {
	/// Creates a marker at the given level.
	pub fn new(level: MarkerLevel, path: Path, message: impl Into<String>) -> Self {
		Self {
			marker_type: MarkerType::Validation,
			level,
			path,
			item: MarkerItem::new(message),
		}
	}

	/// Creates an error-level marker.
	pub fn error(path: Path, message: impl Into<String>) -> Self {
		Self::new(MarkerLevel::Error, path, message)
	}

	/// Creates a warning-level marker.
	pub fn warning(path: Path, message: impl Into<String>) -> Self {
		Self::new(MarkerLevel::Warning, path, message)
	}

	/// Creates an info-level marker.
	pub fn info(path: Path, message: impl Into<String>) -> Self {
		Self::new(MarkerLevel::Info, path, message)
	}

	/// Attaches a rule-specific payload.
	#[must_use]
	pub fn with_payload(mut self, payload: Value) -> Self {
		self.item.payload = Some(payload);
		self
	}

	/// Returns a copy with `segment` prepended to the path.
	#[must_use]
	pub fn prefixed(mut self, segment: PathSegment) -> Self {
		self.path.insert(0, segment);
		self
	}
}

/// The unit emitted to validation subscribers.
///
/// `revision` identifies the snapshot revision the markers describe; it is
/// absent until a first snapshot has been validated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationStatus {
	pub is_validating: bool,
	pub markers: Vec<ValidationMarker>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub revision: Option<String>,
}

impl ValidationStatus {
	/// Number of error-level markers.
	pub fn error_count(&self) -> usize {
		self.markers
			.iter()
			.filter(|marker| marker.level == MarkerLevel::Error)
			.count()
	}

	/// Number of warning-level markers.
	pub fn warning_count(&self) -> usize {
		self.markers
			.iter()
			.filter(|marker| marker.level == MarkerLevel::Warning)
			.count()
	}

	/// Returns true when any error-level marker is present.
	pub fn has_errors(&self) -> bool {
		self.error_count() > 0
	}
}
