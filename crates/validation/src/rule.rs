//! Validation rules and the capability they execute under.
//!
//! A rule is a function from a field value to zero or more markers. Rules may
//! suspend on external checks through [`RuleContext`]; every document id
//! consulted that way is recorded as a dependency of the running validation,
//! regardless of the check's outcome, so a later availability change for
//! that id retriggers validation.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use strata_primitives::{Document, PairAvailability, Path, ValidationMarker};

use crate::source::{AvailabilityError, AvailabilitySource};

/// Outcome of one rule application.
///
/// An `Err` reports a rule-authoring failure; the invoker isolates it and
/// treats the rule as having produced no markers.
pub type RuleResult = anyhow::Result<Vec<ValidationMarker>>;

/// Set of document ids consulted during one validation run.
///
/// Cloned into every rule context of the run; all clones share one set.
#[derive(Debug, Default, Clone)]
pub struct ConsultedIds {
	ids: Arc<Mutex<BTreeSet<String>>>,
}

impl ConsultedIds {
	/// Records a consulted id.
	pub fn record(&self, id: &str) {
		self.ids.lock().insert(id.to_string());
	}

	/// Returns the ids recorded so far.
	pub fn snapshot(&self) -> BTreeSet<String> {
		self.ids.lock().clone()
	}
}

/// Execution capability handed to each rule.
pub struct RuleContext<'run> {
	path: &'run Path,
	document: Option<&'run Document>,
	availability: &'run dyn AvailabilitySource,
	consulted: &'run ConsultedIds,
}

impl<'run> RuleContext<'run> {
	pub(crate) fn new(
		path: &'run Path,
		document: Option<&'run Document>,
		availability: &'run dyn AvailabilitySource,
		consulted: &'run ConsultedIds,
	) -> Self {
		Self {
			path,
			document,
			availability,
			consulted,
		}
	}

	/// Path of the field under validation.
	pub fn path(&self) -> &Path {
		self.path
	}

	/// The snapshot under validation.
	pub fn document(&self) -> Option<&Document> {
		self.document
	}

	/// Checks whether the document addressed by `id` exists and is readable.
	///
	/// The id is recorded as a dependency of the current run whether or not
	/// the check succeeds.
	pub async fn document_availability(
		&self,
		id: &str,
	) -> Result<PairAvailability, AvailabilityError> {
		self.consulted.record(id);
		self.availability.check(id).await
	}
}

/// One validation rule.
#[async_trait]
pub trait Rule: Send + Sync {
	/// Applies the rule to `value` at the context's path.
	///
	/// `value` is `None` when the field is absent from the snapshot.
	async fn validate(&self, value: Option<&Value>, ctx: &RuleContext<'_>) -> RuleResult;
}

/// Adapter wrapping a closure as a [`Rule`].
///
/// The closure receives the field value and path; rules that need to suspend
/// on external checks implement [`Rule`] directly instead.
pub struct FnRule<F> {
	f: F,
}

impl<F> FnRule<F>
where
	F: Fn(Option<&Value>, &Path) -> RuleResult + Send + Sync,
{
	/// Wraps `f` as a rule.
	pub fn new(f: F) -> Self {
		Self { f }
	}
}

#[async_trait]
impl<F> Rule for FnRule<F>
where
	F: Fn(Option<&Value>, &Path) -> RuleResult + Send + Sync,
{
	async fn validate(&self, value: Option<&Value>, ctx: &RuleContext<'_>) -> RuleResult {
		(self.f)(value, ctx.path())
	}
}

#[cfg(test)]
mod tests {
	use futures::StreamExt;
	use futures::stream;
	use serde_json::json;
	use strata_primitives::PathSegment;

	use super::*;
	use crate::source::AvailabilityStream;

	struct StaticAvailability(PairAvailability);

	#[async_trait]
	impl AvailabilitySource for StaticAvailability {
		async fn check(&self, _id: &str) -> Result<PairAvailability, AvailabilityError> {
			Ok(self.0)
		}

		fn observe(&self, _id: &str) -> AvailabilityStream {
			stream::iter([self.0]).boxed()
		}
	}

	#[test]
	fn consulted_ids_share_one_set_across_clones() {
		let consulted = ConsultedIds::default();
		let clone = consulted.clone();
		consulted.record("a");
		clone.record("b");
		clone.record("a");

		let ids: Vec<_> = consulted.snapshot().into_iter().collect();
		assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);
	}

	#[tokio::test]
	async fn context_records_checked_ids() {
		let path: Path = vec![PathSegment::from("exampleRef")];
		let availability = StaticAvailability(PairAvailability::READABLE);
		let consulted = ConsultedIds::default();
		let ctx = RuleContext::new(&path, None, &availability, &consulted);

		let result = ctx.document_availability("movie-2").await.expect("check succeeds");
		assert!(result.any_available());
		assert!(consulted.snapshot().contains("movie-2"));
	}

	#[tokio::test]
	async fn fn_rule_adapts_a_closure() {
		let rule = FnRule::new(|value, path| {
			Ok(match value {
				Some(_) => Vec::new(),
				None => vec![ValidationMarker::error(path.clone(), "Required")],
			})
		});

		let path: Path = vec![PathSegment::from("title")];
		let availability = StaticAvailability(PairAvailability::READABLE);
		let consulted = ConsultedIds::default();
		let ctx = RuleContext::new(&path, None, &availability, &consulted);

		let markers = rule.validate(None, &ctx).await.expect("rule runs");
		assert_eq!(markers.len(), 1);
		assert_eq!(markers[0].item.message, "Required");

		let value = json!("present");
		let markers = rule.validate(Some(&value), &ctx).await.expect("rule runs");
		assert!(markers.is_empty());
	}
}
