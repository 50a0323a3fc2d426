//! Error type shared by loading, model building and the host.

use std::fmt::Display;

use thiserror::Error;

/// Failures that prevent a graph from being installed.
#[derive(Clone, Debug, Error)]
pub enum GraphError {
	/// The input document could not be read or parsed.
	#[error("failed to load graph document `{locator}`: {reason}")]
	LoadFailure {
		/// Where the document was expected to come from.
		locator: String,
		/// Underlying I/O or parse error.
		reason: String,
	},

	/// A `depends-on` entry names a component that does not exist.
	#[error("component `{source_id}` depends on unknown component `{target_id}`")]
	UnresolvedDependency {
		/// Component declaring the dependency.
		source_id: String,
		/// Id that matched no component.
		target_id: String,
	},

	/// Two or more components share an id.
	#[error("component id `{id}` is declared {count} times")]
	DuplicateId {
		/// The shared id.
		id: String,
		/// How many components carry it.
		count: usize,
	},
}

impl GraphError {
	/// Wrap any displayable failure as a [`GraphError::LoadFailure`].
	pub fn load(locator: impl Into<String>, reason: impl Display) -> Self {
		GraphError::LoadFailure {
			locator: locator.into(),
			reason: reason.to_string(),
		}
	}
}

/// Result alias used throughout the graph module.
pub type Result<T> = std::result::Result<T, GraphError>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn messages_name_the_offending_ids() {
		let err = GraphError::UnresolvedDependency {
			source_id: "B".into(),
			target_id: "Z".into(),
		};
		assert_eq!(err.to_string(), "component `B` depends on unknown component `Z`");

		let err = GraphError::load("graph.json", "not found");
		assert_eq!(
			err.to_string(),
			"failed to load graph document `graph.json`: not found"
		);
	}
}
