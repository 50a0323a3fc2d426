//! Lifetime management for the displayed graph.
//!
//! A [`GraphHost`] holds at most one [`GraphState`]. Installing a new graph
//! stops the previous simulation and advances the host's epoch; schedulers
//! remember the epoch they were started for and stop re-arming themselves
//! once [`GraphHost::frame`] reports it as stale. That guarantees a single
//! simulation drives the renderer at any time.

use log::info;

use super::error::Result;
use super::frame::RenderAdapter;
use super::loader::{DocumentLoader, GraphSource, load_graph};
use super::model::ResolvedGraph;
use super::simulation::SimulationParameters;
use super::state::GraphState;

/// Identifies one installed graph.
pub type Epoch = u64;

/// Owner of the displayed graph and the epoch that guards its schedule.
#[derive(Default)]
pub struct GraphHost {
	state: Option<GraphState>,
	epoch: Epoch,
	params: SimulationParameters,
}

impl GraphHost {
	/// Empty host laying out future graphs with `params`.
	pub fn new(params: SimulationParameters) -> Self {
		Self {
			state: None,
			epoch: 0,
			params,
		}
	}

	/// Epoch of the most recent install or teardown.
	pub fn epoch(&self) -> Epoch {
		self.epoch
	}

	/// Whether `epoch` names the graph on display.
	pub fn is_current(&self, epoch: Epoch) -> bool {
		self.state.is_some() && self.epoch == epoch
	}

	/// The installed graph, if any.
	pub fn state(&self) -> Option<&GraphState> {
		self.state.as_ref()
	}

	/// Mutable access to the installed graph, e.g. for panning the view.
	pub fn state_mut(&mut self) -> Option<&mut GraphState> {
		self.state.as_mut()
	}

	/// Resolve, build and install a graph.
	///
	/// On failure the currently displayed graph (if any) keeps running.
	pub async fn load_graph<L: DocumentLoader>(&mut self, source: GraphSource, loader: &L) -> Result<Epoch> {
		let graph = load_graph(source, loader).await?;
		Ok(self.replace(graph))
	}

	/// Install `graph`, stopping whatever was running before.
	pub fn replace(&mut self, graph: ResolvedGraph) -> Epoch {
		if let Some(previous) = self.state.as_mut() {
			previous.simulation.stop();
		}
		self.epoch += 1;
		info!(
			"component-graph: installing graph #{} ({} components)",
			self.epoch,
			graph.len()
		);
		self.state = Some(GraphState::new(graph, self.params.clone()));
		self.epoch
	}

	/// Stop the simulation and drop the graph.
	pub fn teardown(&mut self) {
		if let Some(mut previous) = self.state.take() {
			previous.simulation.stop();
			self.epoch += 1;
		}
	}

	/// Layout area for this and future graphs.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.params.width = width;
		self.params.height = height;
		if let Some(state) = self.state.as_mut() {
			state.simulation.resize(width, height);
		}
	}

	/// Scheduler callback: advance one tick and render it.
	///
	/// Returns `false` when `epoch` no longer names the installed graph, in
	/// which case nothing is stepped or drawn.
	pub fn frame<R: RenderAdapter + ?Sized>(&mut self, epoch: Epoch, renderer: &mut R) -> bool {
		if self.epoch != epoch {
			return false;
		}
		let Some(state) = self.state.as_mut() else {
			return false;
		};
		if state.tick().is_some() {
			renderer.render(&state.frame());
		}
		true
	}

	/// Draw the current state without stepping.
	pub fn render<R: RenderAdapter + ?Sized>(&self, renderer: &mut R) {
		if let Some(state) = self.state.as_ref() {
			renderer.render(&state.frame());
		}
	}

	/// Forward a drag start and redraw. `false` if nothing handled it.
	pub fn on_drag_start<R: RenderAdapter + ?Sized>(&mut self, id: &str, renderer: &mut R) -> bool {
		self.interact(renderer, |state| state.on_drag_start(id))
	}

	/// Forward a drag move and redraw.
	pub fn on_drag_move<R: RenderAdapter + ?Sized>(&mut self, id: &str, x: f64, y: f64, renderer: &mut R) -> bool {
		self.interact(renderer, |state| state.on_drag_move(id, x, y))
	}

	/// Forward a drag end and redraw.
	pub fn on_drag_end<R: RenderAdapter + ?Sized>(&mut self, id: &str, renderer: &mut R) -> bool {
		self.interact(renderer, |state| state.on_drag_end(id))
	}

	/// Forward a highlight toggle and redraw.
	pub fn on_toggle<R: RenderAdapter + ?Sized>(&mut self, id: &str, renderer: &mut R) -> bool {
		self.interact(renderer, |state| state.on_toggle(id))
	}

	fn interact<R, F>(&mut self, renderer: &mut R, event: F) -> bool
	where
		R: RenderAdapter + ?Sized,
		F: FnOnce(&mut GraphState) -> bool,
	{
		let Some(state) = self.state.as_mut() else {
			return false;
		};
		let handled = event(state);
		if handled {
			renderer.render(&state.frame());
		}
		handled
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::error::GraphError;
	use crate::components::force_graph::frame::Frame;
	use crate::components::force_graph::interaction::DIMMED_OPACITY;
	use crate::components::force_graph::loader::FileLoader;
	use crate::components::force_graph::model::build;
	use crate::components::force_graph::simulation::RunState;
	use crate::components::force_graph::types::GraphDocument;

	#[derive(Default)]
	struct Recorder {
		frames: Vec<(u64, Vec<String>, Vec<f64>)>,
	}

	impl RenderAdapter for Recorder {
		fn render(&mut self, frame: &Frame<'_>) {
			self.frames.push((
				frame.iteration,
				frame.nodes.iter().map(|n| n.id.to_string()).collect(),
				frame.nodes.iter().map(|n| n.opacity).collect(),
			));
		}
	}

	const FIRST: &str = r#"{ "components": [ { "id": "A", "title": "A" }, { "id": "B", "title": "B", "depends-on": [ { "target": "A" } ] } ] }"#;
	const SECOND: &str = r#"{ "components": [ { "id": "X", "title": "X" }, { "id": "Y", "title": "Y" }, { "id": "Z", "title": "Z" } ] }"#;

	fn graph(json: &str) -> ResolvedGraph {
		build(&GraphDocument::from_json("inline", json).unwrap().components).unwrap()
	}

	#[tokio::test]
	async fn replacing_a_graph_stops_the_old_schedule() {
		let mut host = GraphHost::default();
		let mut out = Recorder::default();

		let first = host
			.load_graph(GraphSource::Json(FIRST.into()), &FileLoader)
			.await
			.unwrap();
		assert!(host.frame(first, &mut out));
		assert_eq!(out.frames.len(), 1);

		let second = host
			.load_graph(GraphSource::Json(SECOND.into()), &FileLoader)
			.await
			.unwrap();
		assert_ne!(first, second);
		assert!(!host.is_current(first));
		assert!(!host.frame(first, &mut out));
		assert_eq!(out.frames.len(), 1);

		assert!(host.frame(second, &mut out));
		assert_eq!(out.frames[1].1, vec!["X", "Y", "Z"]);
	}

	#[tokio::test]
	async fn failed_load_keeps_the_current_graph() {
		let mut host = GraphHost::default();
		let epoch = host
			.load_graph(GraphSource::Json(FIRST.into()), &FileLoader)
			.await
			.unwrap();

		let dangling = r#"{ "components": [ { "id": "A", "title": "A", "depends-on": [ { "target": "Z" } ] } ] }"#;
		let err = host
			.load_graph(GraphSource::Json(dangling.into()), &FileLoader)
			.await
			.unwrap_err();
		assert!(matches!(err, GraphError::UnresolvedDependency { .. }));

		assert!(host.is_current(epoch));
		let state = host.state().unwrap();
		assert_eq!(state.graph().len(), 2);
		assert_eq!(state.simulation.run_state(), RunState::Running);
	}

	#[test]
	fn interactions_render_immediately() {
		let mut host = GraphHost::default();
		let mut out = Recorder::default();
		assert!(!host.on_toggle("A", &mut out));

		host.replace(graph(SECOND));

		assert!(host.on_toggle("X", &mut out));
		assert_eq!(out.frames.len(), 1);
		assert_eq!(out.frames[0].2, vec![1.0, DIMMED_OPACITY, DIMMED_OPACITY]);

		assert!(!host.on_drag_start("nope", &mut out));
		assert_eq!(out.frames.len(), 1);
		assert!(host.on_drag_start("Y", &mut out));
		assert!(host.on_drag_move("Y", 5.0, 5.0, &mut out));
		assert!(host.on_drag_end("Y", &mut out));
		assert_eq!(out.frames.len(), 4);
	}

	#[test]
	fn teardown_invalidates_the_schedule() {
		let mut host = GraphHost::default();
		let epoch = host.replace(graph(FIRST));
		host.teardown();
		assert!(host.state().is_none());
		assert!(!host.frame(epoch, &mut Recorder::default()));
	}

	#[test]
	fn resize_moves_the_centre_of_gravity() {
		let mut host = GraphHost::default();
		host.resize(200.0, 100.0);
		host.replace(graph(FIRST));
		let params = host.state().unwrap().simulation.params();
		assert_eq!(params.center(), (100.0, 50.0));
	}
}
