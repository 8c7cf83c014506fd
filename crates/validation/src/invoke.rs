//! Runs a schema type's rule set against one edit-state snapshot.

use std::collections::BTreeSet;

use futures::future::BoxFuture;
use serde_json::{Map, Value};
use strata_primitives::{Document, EditState, Path, PathSegment, ValidationMarker};
use tracing::warn;

use crate::rule::{ConsultedIds, RuleContext};
use crate::schema::{SchemaField, SchemaType};
use crate::source::AvailabilitySource;

/// Result of one validation run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationOutcome {
	/// Markers produced by the run, in field order.
	pub markers: Vec<ValidationMarker>,
	/// Document ids consulted while the run executed.
	pub consulted: BTreeSet<String>,
	/// Revision of the validated snapshot, if one existed.
	pub revision: Option<String>,
}

/// Validates `state` against `schema_type`.
///
/// Short-circuits to an empty outcome when the state has neither a draft nor
/// a published snapshot; no rule runs in that case. Otherwise the draft
/// snapshot takes precedence over the published one. A rule returning an
/// error is isolated: it is logged and contributes no markers, and the rest
/// of the run proceeds.
pub async fn validate_document(
	schema_type: &SchemaType,
	state: &EditState,
	availability: &dyn AvailabilitySource,
) -> ValidationOutcome {
	let Some(document) = state.value() else {
		return ValidationOutcome::default();
	};
	let consulted = ConsultedIds::default();
	let markers = validate_fields(
		schema_type.fields(),
		&document.content,
		Vec::new(),
		document,
		availability,
		&consulted,
	)
	.await;
	ValidationOutcome {
		markers,
		consulted: consulted.snapshot(),
		revision: state.revision().map(str::to_string),
	}
}

fn validate_fields<'run>(
	fields: &'run [SchemaField],
	container: &'run Map<String, Value>,
	path: Path,
	document: &'run Document,
	availability: &'run dyn AvailabilitySource,
	consulted: &'run ConsultedIds,
) -> BoxFuture<'run, Vec<ValidationMarker>> {
	Box::pin(async move {
		let mut markers = Vec::new();
		for field in fields {
			let value = container.get(field.name());
			let mut field_path = path.clone();
			field_path.push(PathSegment::Field(field.name().to_string()));

			let ctx = RuleContext::new(&field_path, Some(document), availability, consulted);
			for rule in field.rules() {
				match rule.validate(value, &ctx).await {
					Ok(found) => markers.extend(found),
					Err(error) => {
						warn!(
							path = %display_path(&field_path),
							error = %error,
							"validation.rule.failed"
						);
					}
				}
			}

			if !field.children().is_empty()
				&& let Some(child_container) = value.and_then(Value::as_object)
			{
				markers.extend(
					validate_fields(
						field.children(),
						child_container,
						field_path,
						document,
						availability,
						consulted,
					)
					.await,
				);
			}
		}
		markers
	})
}

fn display_path(path: &Path) -> String {
	path.iter()
		.map(ToString::to_string)
		.collect::<Vec<_>>()
		.join(".")
}
