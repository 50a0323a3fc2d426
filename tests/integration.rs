//! End-to-end tests over the public API.
//!
//! These load documents through a host, drive the simulation the way a
//! frame scheduler would, and check what reaches the render adapter.

use std::collections::HashMap;

use component_graph::{
	DIMMED_OPACITY, DependencyKind, DocumentLoader, FULL_OPACITY, Frame, GraphError, GraphHost,
	GraphSource, RenderAdapter, RunState, SimulationParameters,
};

/// Owned copy of what a renderer was handed.
#[derive(Debug, Clone)]
struct Drawn {
	nodes: Vec<(String, f64, f64, f64)>,
	links: Vec<(String, String, DependencyKind, f64)>,
}

#[derive(Default)]
struct RecordingAdapter {
	frames: Vec<Drawn>,
}

impl RecordingAdapter {
	fn last(&self) -> &Drawn {
		self.frames.last().expect("nothing rendered")
	}

	fn opacity_of(&self, id: &str) -> f64 {
		self.last()
			.nodes
			.iter()
			.find(|(node_id, ..)| node_id == id)
			.map(|(.., opacity)| *opacity)
			.expect("unknown node")
	}
}

impl RenderAdapter for RecordingAdapter {
	fn render(&mut self, frame: &Frame<'_>) {
		self.frames.push(Drawn {
			nodes: frame
				.nodes
				.iter()
				.map(|n| (n.id.to_string(), n.x, n.y, n.opacity))
				.collect(),
			links: frame
				.links
				.iter()
				.map(|l| (l.source_id.to_string(), l.target_id.to_string(), l.kind, l.opacity))
				.collect(),
		});
	}
}

struct StaticLoader(HashMap<&'static str, &'static str>);

impl DocumentLoader for StaticLoader {
	async fn fetch(&self, locator: &str) -> component_graph::Result<String> {
		self.0
			.get(locator)
			.map(|s| s.to_string())
			.ok_or_else(|| GraphError::load(locator, "no such document"))
	}
}

const SERVICES: &str = r#"{
	"components": [
		{ "id": "web", "title": "Web frontend", "depends-on": [
			{ "target": "api" }
		]},
		{ "id": "api", "title": "API", "depends-on": [
			{ "target": "db", "type": "sync" },
			{ "target": "queue", "type": "async" }
		]},
		{ "id": "db", "title": "Database" },
		{ "id": "queue", "title": "Queue" },
		{ "id": "worker", "title": "Worker", "depends-on": [
			{ "target": "queue", "type": "async" },
			{ "target": "db" }
		]},
		{ "id": "audit", "title": "Audit log" }
	]
}"#;

fn loader() -> StaticLoader {
	StaticLoader(HashMap::from([
		("services.json", SERVICES),
		(
			"pair.json",
			r#"{"components":[{"id":"A","title":"A"},{"id":"B","title":"B","depends-on":[{"target":"A"}]}]}"#,
		),
		(
			"dangling.json",
			r#"{"components":[{"id":"A","title":"A","depends-on":[{"target":"Z"}]}]}"#,
		),
	]))
}

fn run_to_rest(host: &mut GraphHost, epoch: u64, out: &mut RecordingAdapter) -> usize {
	let mut frames = 0;
	while host.frame(epoch, out) && host.state().is_some_and(|s| s.simulation.is_running()) {
		frames += 1;
		assert!(frames < 5_000, "layout never settled");
	}
	frames
}

#[tokio::test]
async fn layout_settles_with_finite_positions() {
	let mut host = GraphHost::new(SimulationParameters::default());
	let mut out = RecordingAdapter::default();
	let epoch = host
		.load_graph(GraphSource::Locator("services.json".into()), &loader())
		.await
		.unwrap();

	let frames = run_to_rest(&mut host, epoch, &mut out);
	assert!(frames > 0);
	assert_eq!(
		host.state().unwrap().simulation.run_state(),
		RunState::Settled
	);

	let last = out.last();
	assert_eq!(last.nodes.len(), 6);
	assert_eq!(last.links.len(), 5);
	for (id, x, y, _) in &last.nodes {
		assert!(x.is_finite() && y.is_finite(), "{id} at {x},{y}");
	}
	let async_links: Vec<_> = last
		.links
		.iter()
		.filter(|(.., kind, _)| *kind == DependencyKind::Async)
		.map(|(s, t, ..)| (s.as_str(), t.as_str()))
		.collect();
	assert_eq!(async_links, vec![("api", "queue"), ("worker", "queue")]);
}

#[tokio::test]
async fn focus_shows_exactly_the_one_hop_neighbourhood() {
	let mut host = GraphHost::default();
	let mut out = RecordingAdapter::default();
	host.load_graph(GraphSource::Locator("services.json".into()), &loader())
		.await
		.unwrap();

	assert!(host.on_toggle("api", &mut out));
	for id in ["web", "api", "db", "queue"] {
		assert_eq!(out.opacity_of(id), FULL_OPACITY, "{id}");
	}
	for id in ["worker", "audit"] {
		assert_eq!(out.opacity_of(id), DIMMED_OPACITY, "{id}");
	}
	for (source, target, _, opacity) in &out.last().links {
		let touches_api = source == "api" || target == "api";
		let expected = if touches_api { FULL_OPACITY } else { DIMMED_OPACITY };
		assert_eq!(*opacity, expected, "{source} -> {target}");
	}

	// Any second double-click clears the focus.
	assert!(host.on_toggle("audit", &mut out));
	assert!(out.last().nodes.iter().all(|(.., o)| *o == FULL_OPACITY));
	assert!(out.last().links.iter().all(|(.., o)| *o == FULL_OPACITY));
}

#[tokio::test]
async fn dragged_node_follows_the_pointer_only() {
	let mut host = GraphHost::default();
	let mut out = RecordingAdapter::default();
	let epoch = host
		.load_graph(GraphSource::Locator("pair.json".into()), &loader())
		.await
		.unwrap();

	host.on_drag_start("A", &mut out);
	host.on_drag_move("A", 300.0, 120.0, &mut out);
	for _ in 0..25 {
		host.frame(epoch, &mut out);
		let (_, x, y, _) = out.last().nodes[0].clone();
		assert_eq!((x, y), (300.0, 120.0));
	}
	host.on_drag_end("A", &mut out);
	host.frame(epoch, &mut out);
	let (_, x, y, _) = out.last().nodes[0].clone();
	assert_ne!((x, y), (300.0, 120.0));
}

#[tokio::test]
async fn dangling_reference_never_reaches_the_renderer() {
	let mut host = GraphHost::default();
	let mut out = RecordingAdapter::default();

	let err = host
		.load_graph(GraphSource::Locator("dangling.json".into()), &loader())
		.await
		.unwrap_err();
	assert_eq!(
		err.to_string(),
		"component `A` depends on unknown component `Z`"
	);
	assert!(host.state().is_none());
	assert!(!host.frame(host.epoch(), &mut out));
	assert!(out.frames.is_empty());
}

#[tokio::test]
async fn reloading_switches_the_rendered_graph() {
	let mut host = GraphHost::default();
	let mut out = RecordingAdapter::default();

	let first = host
		.load_graph(GraphSource::Locator("services.json".into()), &loader())
		.await
		.unwrap();
	host.frame(first, &mut out);
	let second = host
		.load_graph(GraphSource::Locator("pair.json".into()), &loader())
		.await
		.unwrap();

	assert!(!host.frame(first, &mut out));
	assert!(host.frame(second, &mut out));
	let ids: Vec<_> = out.last().nodes.iter().map(|(id, ..)| id.as_str()).collect();
	assert_eq!(ids, vec!["A", "B"]);
}
