//! Reactive validation for draft/published document pairs.
//!
//! This crate computes the live [`ValidationStatus`](strata_primitives::ValidationStatus)
//! of a document as its content and the availability of documents it
//! references change over time. It is consumed by an editing UI that wants a
//! continuously updated "is this document valid" signal without re-running
//! full validation on every keystroke and without duplicate subscriptions
//! when several surfaces watch the same document.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐  edit states  ┌──────────────────┐    runs    ┌─────────────────┐
//! │ EditStateSource │──────────────▶│     Pipeline     │───────────▶│    validate_    │
//! │   (external)    │               │ (one per doc id) │◀───────────│    document     │
//! └─────────────────┘               └────┬────────▲────┘  outcome   └────────┬────────┘
//!                                 status │        │ re-validate              │ consulted ids
//!                                        ▼        │ triggers                 ▼
//!                               ┌──────────────────┐              ┌───────────────────┐
//!                               │    StatusCell    │              │ DependencyTracker │
//!                               │ (replay + fanout)│              │   (availability   │
//!                               └──────────────────┘              │     watches)      │
//!                                                                 └───────────────────┘
//! ```
//!
//! [`ValidationRegistry`] is the sole public entry point: it memoizes one
//! pipeline per [`DocumentIdentity`] for the life of the process, so a second
//! subscription to the same document replays the last computed status
//! synchronously instead of recomputing it.
//!
//! Collaborators are injected at the trait seams in [`source`]: the
//! edit-state store that merges draft/published copies, and the availability
//! transport that reports whether referenced documents exist and are
//! readable. Schema types and their rules live in [`schema`] and [`rule`].

mod dependency;
mod pipeline;
mod status;
mod token;

pub mod invoke;
pub mod registry;
pub mod rule;
pub mod rules;
pub mod schema;
pub mod source;

pub use invoke::{ValidationOutcome, validate_document};
pub use registry::{DocumentIdentity, ValidationRegistry};
pub use rule::{ConsultedIds, FnRule, Rule, RuleContext, RuleResult};
pub use rules::{ReferenceExistsRule, RequiredRule, StringLengthRule, TypeRule, ValueKind};
pub use schema::{SchemaField, SchemaRegistry, SchemaType};
pub use source::{
	AvailabilityError, AvailabilitySource, AvailabilityStream, EditStateSource, EditStateStream,
};
pub use status::ValidationStatusStream;

/// A convenient type alias for `Result` with `E` = [`enum@crate::Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Possible errors.
///
/// These surface only when a validation stream is constructed; an existing
/// stream never errors or terminates.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
	/// No schema type is registered under the requested name.
	#[error("unknown schema type: {0}")]
	UnknownSchemaType(String),
}
