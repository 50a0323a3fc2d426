//! Client entrypoint for the CSR build; headless layout tool elsewhere.

// Bin target reuses lib deps, silence noisy lint.
#![allow(unused_crate_dependencies)]

#[cfg(target_arch = "wasm32")]
fn main() {
	use component_graph::{App, init_logging};
	use leptos::prelude::*;

	init_logging();

	mount_to_body(|| {
		view! { <App /> }
	})
}

/// `component-graph <document.json> [params.json]`
///
/// Runs the layout until it settles and prints the final frame as JSON.
#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
	use std::process::ExitCode;

	match headless::run(std::env::args().skip(1).collect()) {
		Ok(json) => {
			println!("{json}");
			ExitCode::SUCCESS
		}
		Err(e) => {
			eprintln!("component-graph: {e}");
			ExitCode::FAILURE
		}
	}
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
	use component_graph::{GraphDocument, GraphError, GraphState, Result, SimulationParameters, build};

	/// Upper bound on steps; the default cooling settles in about 300.
	const MAX_TICKS: usize = 100_000;

	fn read(path: &str) -> Result<String> {
		std::fs::read_to_string(path).map_err(|e| GraphError::load(path, e))
	}

	pub fn run(args: Vec<String>) -> Result<String> {
		let Some(path) = args.first() else {
			return Err(GraphError::load(
				"<args>",
				"usage: component-graph <document.json> [params.json]",
			));
		};
		let params = match args.get(1) {
			Some(params_path) => serde_json::from_str::<SimulationParameters>(&read(params_path)?)
				.map_err(|e| GraphError::load(params_path.as_str(), e))?,
			None => SimulationParameters::default(),
		};

		let doc = GraphDocument::from_json(path, &read(path)?)?;
		let graph = build(&doc.components)?;
		for diagnostic in graph.diagnostics() {
			eprintln!("component-graph: warning: {diagnostic}");
		}

		let mut state = GraphState::new(graph, params);
		let mut ticks = 0;
		while ticks < MAX_TICKS && state.tick().is_some() {
			ticks += 1;
		}

		serde_json::to_string_pretty(&state.frame()).map_err(|e| GraphError::load(path.as_str(), e))
	}
}
