//! Input document structures consumed by the graph model builder.

use serde::{Deserialize, Serialize};

use super::error::{GraphError, Result};

/// Dependency flavour of a link. Drives link styling only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
	/// Blocking call (default when `type` is absent).
	#[default]
	Sync,
	/// Fire-and-forget / message based dependency.
	Async,
}

impl DependencyKind {
	/// Lowercase name, as used in the input document.
	pub fn as_str(self) -> &'static str {
		match self {
			DependencyKind::Sync => "sync",
			DependencyKind::Async => "async",
		}
	}
}

/// One `depends-on` entry of a component.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct RawDependency {
	/// Id of the depended-upon component.
	pub target: String,
	/// Dependency kind. Missing or `null` means [`DependencyKind::Sync`].
	#[serde(rename = "type", default)]
	pub kind: Option<DependencyKind>,
}

impl RawDependency {
	/// Resolved kind with the `sync` default applied.
	pub fn kind(&self) -> DependencyKind {
		self.kind.unwrap_or_default()
	}
}

/// A component as it appears in the input document.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct RawComponent {
	/// Unique identifier. Referenced by `depends-on` targets.
	pub id: String,
	/// Display label. Falls back to `id` when empty.
	#[serde(default)]
	pub title: String,
	/// Outgoing dependencies. `null` and absence both mean none.
	#[serde(rename = "depends-on", default)]
	pub depends_on: Option<Vec<RawDependency>>,
}

impl RawComponent {
	/// Iterate the outgoing dependencies in document order.
	pub fn dependencies(&self) -> impl Iterator<Item = &RawDependency> {
		self.depends_on.iter().flatten()
	}
}

/// Complete input document: `{ "components": [...] }`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct GraphDocument {
	/// Every component of the diagram, in drawing order.
	pub components: Vec<RawComponent>,
}

impl GraphDocument {
	/// Parse a JSON document. `locator` names the origin for error reporting.
	pub fn from_json(locator: &str, text: &str) -> Result<Self> {
		serde_json::from_str(text).map_err(|e| GraphError::load(locator, e))
	}
}
