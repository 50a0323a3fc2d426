//! Highlight toggle state and the opacity rules derived from it.

use log::debug;

use super::model::AdjacencyIndex;

/// Opacity of elements outside the focused neighbourhood.
pub const DIMMED_OPACITY: f64 = 0.1;
/// Opacity of everything else.
pub const FULL_OPACITY: f64 = 1.0;

/// Which part of the graph is emphasised.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum HighlightMode {
	/// Everything fully visible.
	#[default]
	Normal,
	/// Only the focused component and its direct neighbours are fully visible.
	Focused(String),
}

impl HighlightMode {
	/// Flip between `Normal` and `Focused(id)`. From any focused state the
	/// gesture returns to `Normal`, whichever node it lands on.
	pub fn toggle(&mut self, id: &str) {
		*self = match self {
			HighlightMode::Normal => HighlightMode::Focused(id.to_string()),
			HighlightMode::Focused(_) => HighlightMode::Normal,
		};
	}

	/// The focused id, if any.
	pub fn focused(&self) -> Option<&str> {
		match self {
			HighlightMode::Normal => None,
			HighlightMode::Focused(id) => Some(id.as_str()),
		}
	}
}

/// Transient view state driven by user gestures. Never touches the model.
#[derive(Clone, Debug, Default)]
pub struct InteractionState {
	/// Current highlight mode.
	pub highlight: HighlightMode,
	/// Index of the node currently being dragged.
	pub dragging: Option<usize>,
}

impl InteractionState {
	/// Apply the highlight gesture on `id`.
	pub fn toggle(&mut self, id: &str) {
		self.highlight.toggle(id);
		match self.highlight.focused() {
			Some(focus) => debug!("component-graph: focus on `{focus}`"),
			None => debug!("component-graph: focus cleared"),
		}
	}

	/// Opacity of the component `id`.
	pub fn node_opacity(&self, adjacency: &AdjacencyIndex, id: &str) -> f64 {
		match self.highlight.focused() {
			Some(focus) if !adjacency.is_connected(focus, id) => DIMMED_OPACITY,
			_ => FULL_OPACITY,
		}
	}

	/// Opacity of a link between `source_id` and `target_id`.
	pub fn link_opacity(&self, source_id: &str, target_id: &str) -> f64 {
		match self.highlight.focused() {
			Some(focus) if focus != source_id && focus != target_id => DIMMED_OPACITY,
			_ => FULL_OPACITY,
		}
	}
}
