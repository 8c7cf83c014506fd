//! Schema types and the registry resolving type names to field trees.
//!
//! This is the in-process seam for the external type system: the host
//! registers the types it knows about, and the pipeline walks a type's field
//! tree when validating a snapshot of that type.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::rule::Rule;

/// One field of a schema type.
///
/// A field carries the rules applied to its value and, for object-valued
/// fields, a nested field tree.
pub struct SchemaField {
	name: String,
	rules: Vec<Arc<dyn Rule>>,
	fields: Vec<SchemaField>,
}

impl SchemaField {
	/// Creates a field with no rules.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			rules: Vec::new(),
			fields: Vec::new(),
		}
	}

	/// Adds a validation rule.
	#[must_use]
	pub fn rule(mut self, rule: impl Rule + 'static) -> Self {
		self.rules.push(Arc::new(rule));
		self
	}

	/// Adds a nested field, making this an object-valued field.
	#[must_use]
	pub fn field(mut self, field: SchemaField) -> Self {
		self.fields.push(field);
		self
	}

	/// Field name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Rules applied to this field's value.
	pub fn rules(&self) -> &[Arc<dyn Rule>] {
		&self.rules
	}

	/// Nested fields, empty for scalar fields.
	pub fn children(&self) -> &[SchemaField] {
		&self.fields
	}
}

/// A named document type with its field tree.
pub struct SchemaType {
	name: String,
	fields: Vec<SchemaField>,
}

impl SchemaType {
	/// Creates a type with no fields.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			fields: Vec::new(),
		}
	}

	/// Adds a top-level field.
	#[must_use]
	pub fn field(mut self, field: SchemaField) -> Self {
		self.fields.push(field);
		self
	}

	/// Type name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Top-level fields.
	pub fn fields(&self) -> &[SchemaField] {
		&self.fields
	}
}

/// Registry of schema types by name.
///
/// Thread-safe; shared across pipelines via `Arc<SchemaRegistry>`.
#[derive(Default)]
pub struct SchemaRegistry {
	types: RwLock<HashMap<String, Arc<SchemaType>>>,
}

impl SchemaRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a schema type, replacing any previous type of the same name.
	pub fn register(&self, schema_type: SchemaType) {
		let schema_type = Arc::new(schema_type);
		self.types
			.write()
			.insert(schema_type.name().to_string(), schema_type);
	}

	/// Resolves a type by name.
	pub fn get(&self, name: &str) -> Option<Arc<SchemaType>> {
		self.types.read().get(name).cloned()
	}

	/// Names of all registered types.
	pub fn names(&self) -> Vec<String> {
		self.types.read().keys().cloned().collect()
	}
}
