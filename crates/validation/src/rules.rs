//! Built-in validation rules.
//!
//! A small rule library covering the common field constraints: presence,
//! primitive type, string length, and reference resolution. Hosts register
//! further rules by implementing [`Rule`] (or wrapping a closure in
//! [`FnRule`](crate::FnRule)).

use async_trait::async_trait;
use serde_json::Value;
use strata_primitives::{AvailabilityReason, ValidationMarker};

use crate::rule::{Rule, RuleContext, RuleResult};

/// Primitive value kinds, in the schema's type vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
	String,
	Number,
	Boolean,
	Array,
	Object,
}

impl ValueKind {
	/// Schema-facing name of the kind.
	pub const fn name(self) -> &'static str {
		match self {
			Self::String => "String",
			Self::Number => "Number",
			Self::Boolean => "Boolean",
			Self::Array => "Array",
			Self::Object => "Object",
		}
	}
}

/// Schema-facing name of a JSON value's kind.
fn kind_name(value: &Value) -> &'static str {
	match value {
		Value::Null => "Null",
		Value::Bool(_) => "Boolean",
		Value::Number(_) => "Number",
		Value::String(_) => "String",
		Value::Array(_) => "Array",
		Value::Object(_) => "Object",
	}
}

/// Fails when the field has no usable value.
///
/// Absent fields, explicit nulls, and empty strings all count as missing.
pub struct RequiredRule;

#[async_trait]
impl Rule for RequiredRule {
	async fn validate(&self, value: Option<&Value>, ctx: &RuleContext<'_>) -> RuleResult {
		let missing = match value {
			None | Some(Value::Null) => true,
			Some(Value::String(text)) => text.is_empty(),
			Some(_) => false,
		};
		Ok(if missing {
			vec![ValidationMarker::error(ctx.path().clone(), "Required")]
		} else {
			Vec::new()
		})
	}
}

/// Checks the value against an expected primitive kind.
///
/// Absent and null values pass; [`RequiredRule`] reports those.
pub struct TypeRule {
	expected: ValueKind,
}

impl TypeRule {
	/// Creates a rule expecting `kind`.
	pub fn new(expected: ValueKind) -> Self {
		Self { expected }
	}

	fn matches(&self, value: &Value) -> bool {
		match self.expected {
			ValueKind::String => value.is_string(),
			ValueKind::Number => value.is_number(),
			ValueKind::Boolean => value.is_boolean(),
			ValueKind::Array => value.is_array(),
			ValueKind::Object => value.is_object(),
		}
	}
}

#[async_trait]
impl Rule for TypeRule {
	async fn validate(&self, value: Option<&Value>, ctx: &RuleContext<'_>) -> RuleResult {
		let Some(value) = value else {
			return Ok(Vec::new());
		};
		if value.is_null() || self.matches(value) {
			return Ok(Vec::new());
		}
		Ok(vec![ValidationMarker::error(
			ctx.path().clone(),
			format!(
				"Expected type \"{}\", got \"{}\"",
				self.expected.name(),
				kind_name(value)
			),
		)])
	}
}

/// Bounds the length of a string value, in characters.
///
/// Non-string values pass; [`TypeRule`] reports those.
pub struct StringLengthRule {
	min: Option<usize>,
	max: Option<usize>,
}

impl StringLengthRule {
	/// Requires at least `min` characters.
	pub fn min(min: usize) -> Self {
		Self {
			min: Some(min),
			max: None,
		}
	}

	/// Allows at most `max` characters.
	pub fn max(max: usize) -> Self {
		Self {
			min: None,
			max: Some(max),
		}
	}

	/// Requires between `min` and `max` characters.
	pub fn between(min: usize, max: usize) -> Self {
		Self {
			min: Some(min),
			max: Some(max),
		}
	}
}

#[async_trait]
impl Rule for StringLengthRule {
	async fn validate(&self, value: Option<&Value>, ctx: &RuleContext<'_>) -> RuleResult {
		let Some(text) = value.and_then(Value::as_str) else {
			return Ok(Vec::new());
		};
		let length = text.chars().count();
		let mut markers = Vec::new();
		if let Some(min) = self.min
			&& length < min
		{
			markers.push(ValidationMarker::error(
				ctx.path().clone(),
				format!("Must be at least {min} characters long"),
			));
		}
		if let Some(max) = self.max
			&& length > max
		{
			markers.push(ValidationMarker::error(
				ctx.path().clone(),
				format!("Must be at most {max} characters long"),
			));
		}
		Ok(markers)
	}
}

/// Verifies that a referenced document exists and is readable.
///
/// A reference value is an object carrying the referenced document's
/// published id under `_ref`; the reference resolves against the published
/// copy. The availability check always records the id as a dependency, so a
/// later change for that document retriggers validation even when this run's
/// outcome is unaffected. A check that itself fails produces its own
/// "unable to verify" marker, distinct from a missing document.
pub struct ReferenceExistsRule;

impl ReferenceExistsRule {
	fn referenced_id(value: &Value) -> Option<&str> {
		value.as_object()?.get("_ref")?.as_str()
	}
}

#[async_trait]
impl Rule for ReferenceExistsRule {
	async fn validate(&self, value: Option<&Value>, ctx: &RuleContext<'_>) -> RuleResult {
		let Some(value) = value else {
			return Ok(Vec::new());
		};
		if value.is_null() {
			return Ok(Vec::new());
		}
		let Some(id) = Self::referenced_id(value) else {
			return Ok(vec![ValidationMarker::error(
				ctx.path().clone(),
				"Reference does not include a document id",
			)]);
		};

		let message = match ctx.document_availability(id).await {
			Ok(availability) if availability.published.available => return Ok(Vec::new()),
			Ok(availability) => match availability.published.reason {
				AvailabilityReason::PermissionDenied => "The referenced document cannot be read",
				_ => "The referenced document does not exist",
			},
			Err(_) => "Unable to verify that the referenced document exists",
		};
		Ok(vec![ValidationMarker::error(ctx.path().clone(), message)])
	}
}

#[cfg(test)]
mod tests {
	use futures::StreamExt;
	use futures::stream;
	use serde_json::json;
	use strata_primitives::{PairAvailability, Path, PathSegment};

	use super::*;
	use crate::rule::ConsultedIds;
	use crate::source::{AvailabilityError, AvailabilitySource, AvailabilityStream};

	struct StaticAvailability(Result<PairAvailability, AvailabilityError>);

	#[async_trait]
	impl AvailabilitySource for StaticAvailability {
		async fn check(&self, _id: &str) -> Result<PairAvailability, AvailabilityError> {
			self.0.clone()
		}

		fn observe(&self, _id: &str) -> AvailabilityStream {
			stream::iter(self.0.clone().ok()).boxed()
		}
	}

	fn title_path() -> Path {
		vec![PathSegment::from("title")]
	}

	async fn run_rule(
		rule: &dyn Rule,
		value: Option<&Value>,
		availability: &StaticAvailability,
	) -> Vec<ValidationMarker> {
		let path = title_path();
		let consulted = ConsultedIds::default();
		let ctx = RuleContext::new(&path, None, availability, &consulted);
		rule.validate(value, &ctx).await.expect("rule runs")
	}

	fn readable() -> StaticAvailability {
		StaticAvailability(Ok(PairAvailability::READABLE))
	}

	#[tokio::test]
	async fn required_flags_missing_null_and_empty() {
		let availability = readable();
		for value in [None, Some(json!(null)), Some(json!(""))] {
			let markers = run_rule(&RequiredRule, value.as_ref(), &availability).await;
			assert_eq!(markers.len(), 1, "value {value:?} should be missing");
			assert_eq!(markers[0].item.message, "Required");
		}

		let markers = run_rule(&RequiredRule, Some(&json!("ok")), &availability).await;
		assert!(markers.is_empty());
	}

	#[tokio::test]
	async fn type_rule_names_expected_and_actual_kinds() {
		let availability = readable();
		let markers =
			run_rule(&TypeRule::new(ValueKind::String), Some(&json!(5)), &availability).await;
		assert_eq!(markers.len(), 1);
		assert_eq!(markers[0].item.message, "Expected type \"String\", got \"Number\"");
		assert_eq!(markers[0].path, title_path());

		let markers =
			run_rule(&TypeRule::new(ValueKind::String), Some(&json!("ok")), &availability).await;
		assert!(markers.is_empty());

		// Absence is RequiredRule's concern.
		let markers = run_rule(&TypeRule::new(ValueKind::String), None, &availability).await;
		assert!(markers.is_empty());
	}

	#[tokio::test]
	async fn string_length_bounds_are_inclusive() {
		let availability = readable();
		let rule = StringLengthRule::between(2, 4);

		assert!(run_rule(&rule, Some(&json!("ab")), &availability).await.is_empty());
		assert!(run_rule(&rule, Some(&json!("abcd")), &availability).await.is_empty());

		let markers = run_rule(&rule, Some(&json!("a")), &availability).await;
		assert_eq!(markers[0].item.message, "Must be at least 2 characters long");

		let markers = run_rule(&rule, Some(&json!("abcde")), &availability).await;
		assert_eq!(markers[0].item.message, "Must be at most 4 characters long");
	}

	#[tokio::test]
	async fn reference_rule_passes_for_available_documents() {
		let availability = readable();
		let markers = run_rule(
			&ReferenceExistsRule,
			Some(&json!({"_ref": "movie-2"})),
			&availability,
		)
		.await;
		assert!(markers.is_empty());
	}

	#[tokio::test]
	async fn reference_rule_flags_missing_documents() {
		let availability = StaticAvailability(Ok(PairAvailability::NOT_FOUND));
		let markers = run_rule(
			&ReferenceExistsRule,
			Some(&json!({"_ref": "movie-2"})),
			&availability,
		)
		.await;
		assert_eq!(markers[0].item.message, "The referenced document does not exist");
	}

	#[tokio::test]
	async fn reference_rule_distinguishes_failed_checks() {
		let availability =
			StaticAvailability(Err(AvailabilityError::new("movie-2", "backend offline")));
		let markers = run_rule(
			&ReferenceExistsRule,
			Some(&json!({"_ref": "movie-2"})),
			&availability,
		)
		.await;
		assert_eq!(
			markers[0].item.message,
			"Unable to verify that the referenced document exists",
		);
	}

	#[tokio::test]
	async fn reference_rule_records_the_id_even_when_the_check_fails() {
		let availability =
			StaticAvailability(Err(AvailabilityError::new("movie-2", "backend offline")));
		let path = title_path();
		let consulted = ConsultedIds::default();
		let ctx = RuleContext::new(&path, None, &availability, &consulted);

		let value = json!({"_ref": "movie-2"});
		ReferenceExistsRule
			.validate(Some(&value), &ctx)
			.await
			.expect("rule runs");
		assert!(consulted.snapshot().contains("movie-2"));
	}

	#[tokio::test]
	async fn reference_rule_flags_malformed_references() {
		let availability = readable();
		let markers =
			run_rule(&ReferenceExistsRule, Some(&json!({"weak": true})), &availability).await;
		assert_eq!(markers[0].item.message, "Reference does not include a document id");
	}
}
