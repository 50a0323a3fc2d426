//! Graph session state: resolved model, live simulation, and interaction.
//!
//! The three parts are kept separate and only meet here. The model is never
//! mutated after the build, the simulation owns positions, and the
//! interaction state only affects how frames are drawn. The [`ViewTransform`]
//! maps pointer coordinates into graph space and travels with every frame so
//! renderers draw with the same pan and zoom the hit tests use.

use log::debug;
use serde::Serialize;

use super::frame::{Frame, LinkFrame, NodeFrame};
use super::interaction::{HighlightMode, InteractionState};
use super::model::ResolvedGraph;
use super::simulation::{Simulation, SimulationParameters, Tick};

/// Pan and zoom transform applied to the entire graph view.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ViewTransform {
	/// Horizontal translation in screen pixels.
	pub x: f64,
	/// Vertical translation in screen pixels.
	pub y: f64,
	/// Zoom factor (1.0 = 100%, clamped to 0.1..10.0).
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	/// Map a screen point into graph coordinates.
	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	/// Zoom by `factor` keeping the screen point `(sx, sy)` stationary.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		let new_k = (self.k * factor).clamp(0.1, 10.0);
		let ratio = new_k / self.k;
		self.x = sx - (sx - self.x) * ratio;
		self.y = sy - (sy - self.y) * ratio;
		self.k = new_k;
	}

	/// Translate the view by a screen-space delta.
	pub fn pan_by(&mut self, dx: f64, dy: f64) {
		self.x += dx;
		self.y += dy;
	}
}

/// One loaded graph and everything that changes while it is displayed.
pub struct GraphState {
	graph: ResolvedGraph,
	/// Positions and the cooling schedule.
	pub simulation: Simulation,
	/// Highlight mode and the node currently held by the pointer.
	pub interaction: InteractionState,
	/// Pan and zoom of the view.
	pub view: ViewTransform,
}

impl GraphState {
	/// Start a simulation for `graph` with the default view and no highlight.
	pub fn new(graph: ResolvedGraph, params: SimulationParameters) -> Self {
		let simulation = Simulation::new(&graph, params);
		Self {
			graph,
			simulation,
			interaction: InteractionState::default(),
			view: ViewTransform::default(),
		}
	}

	/// The resolved model this state was built from.
	pub fn graph(&self) -> &ResolvedGraph {
		&self.graph
	}

	/// Current highlight mode.
	pub fn highlight(&self) -> &HighlightMode {
		&self.interaction.highlight
	}

	/// Advance the simulation by one step; `None` once it has settled or stopped.
	pub fn tick(&mut self) -> Option<Tick> {
		self.simulation.step()
	}

	/// Pin the component under the pointer. Returns `false` for unknown ids.
	pub fn on_drag_start(&mut self, id: &str) -> bool {
		let Some(idx) = self.lookup(id) else {
			return false;
		};
		self.simulation.fix(idx);
		self.simulation.resume();
		self.interaction.dragging = Some(idx);
		debug!("component-graph: drag start `{id}`");
		true
	}

	/// Move a pinned component to graph coordinates `(x, y)`.
	pub fn on_drag_move(&mut self, id: &str, x: f64, y: f64) -> bool {
		let Some(idx) = self.lookup(id) else {
			return false;
		};
		self.simulation.place(idx, x, y);
		self.simulation.resume();
		true
	}

	/// Hand the component back to the simulation, reheating it so the
	/// released node moves again even if the layout cooled while it was held.
	pub fn on_drag_end(&mut self, id: &str) -> bool {
		let Some(idx) = self.lookup(id) else {
			return false;
		};
		self.simulation.release(idx);
		self.simulation.resume();
		if self.interaction.dragging == Some(idx) {
			self.interaction.dragging = None;
		}
		debug!("component-graph: drag end `{id}`");
		true
	}

	/// Toggle the connectivity highlight around `id`.
	pub fn on_toggle(&mut self, id: &str) -> bool {
		if self.lookup(id).is_none() {
			return false;
		}
		self.interaction.toggle(id);
		true
	}

	/// Topmost component within `radius` of graph point `(x, y)`.
	pub fn node_at(&self, x: f64, y: f64, radius: f64) -> Option<usize> {
		self.simulation
			.nodes()
			.iter()
			.enumerate()
			.rev()
			.find(|(_, node)| {
				let (dx, dy) = (node.x - x, node.y - y);
				dx * dx + dy * dy <= radius * radius
			})
			.map(|(idx, _)| idx)
	}

	/// Topmost component within `radius` graph units of screen point `(sx, sy)`.
	pub fn node_at_screen(&self, sx: f64, sy: f64, radius: f64) -> Option<usize> {
		let (x, y) = self.view.screen_to_graph(sx, sy);
		self.node_at(x, y, radius)
	}

	/// Id of the component at `index`.
	pub fn id_at(&self, index: usize) -> Option<&str> {
		self.graph.components().get(index).map(|c| c.id.as_str())
	}

	/// Snapshot of the current positions and opacities.
	pub fn frame(&self) -> Frame<'_> {
		let components = self.graph.components();
		let nodes = self.simulation.nodes();
		let adjacency = self.graph.adjacency();

		let node_frames = components
			.iter()
			.zip(nodes)
			.enumerate()
			.map(|(index, (component, node))| NodeFrame {
				index,
				id: &component.id,
				title: component.label(),
				x: node.x,
				y: node.y,
				fixed: node.fixed,
				opacity: self.interaction.node_opacity(adjacency, &component.id),
			})
			.collect();

		let link_frames = self
			.graph
			.links()
			.iter()
			.map(|link| {
				let (s, t) = (&nodes[link.source], &nodes[link.target]);
				let (source_id, target_id) = (
					components[link.source].id.as_str(),
					components[link.target].id.as_str(),
				);
				LinkFrame {
					source: link.source,
					target: link.target,
					source_id,
					target_id,
					kind: link.kind,
					x1: s.x,
					y1: s.y,
					x2: t.x,
					y2: t.y,
					opacity: self.interaction.link_opacity(source_id, target_id),
				}
			})
			.collect();

		Frame {
			iteration: self.simulation.iteration(),
			alpha: self.simulation.alpha(),
			view: self.view,
			nodes: node_frames,
			links: link_frames,
		}
	}

	fn lookup(&self, id: &str) -> Option<usize> {
		let idx = self.graph.index_of(id);
		if idx.is_none() {
			debug!("component-graph: ignoring event for unknown component `{id}`");
		}
		idx
	}
}
