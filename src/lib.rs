//! component-graph: Interactive force-directed diagram of component dependencies.
//!
//! The crate resolves a component document into a dependency graph, lays it
//! out with a spring/charge simulation, and lets users drag nodes and focus a
//! node's direct neighbourhood. The model, simulation and interaction layers
//! are platform independent; on `wasm32` the crate also ships a Leptos canvas
//! component that drives them from `requestAnimationFrame`.

pub mod components;

pub use components::force_graph::*;

#[cfg(target_arch = "wasm32")]
pub use web::{App, init_logging};

#[cfg(target_arch = "wasm32")]
mod web {
	use leptos::prelude::*;
	use leptos_meta::*;
	use log::{Level, info};

	use crate::components::force_graph::{ForceGraphCanvas, Theme};

	/// Initialize logging and panic hooks for the WASM target.
	pub fn init_logging() {
		let _ = console_log::init_with_level(Level::Debug);
		console_error_panic_hook::set_once();
		info!("component-graph: logging initialized");
	}

	/// Dark theme when the browser asks for one.
	fn preferred_theme() -> Theme {
		let dark = web_sys::window()
			.and_then(|w| w.match_media("(prefers-color-scheme: dark)").ok().flatten())
			.is_some_and(|query| query.matches());
		if dark { Theme::midnight() } else { Theme::default() }
	}

	/// Main application component.
	/// Renders the graph embedded in the page as `<script id="graph-data">`.
	#[component]
	pub fn App() -> impl IntoView {
		provide_meta_context();

		view! {
			<Html attr:lang="en" attr:dir="ltr" />
			<Title text="Component Dependencies" />
			<Meta charset="UTF-8" />
			<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

			<div class="fullscreen-graph">
				<ForceGraphCanvas locator="graph-data" fullscreen=true theme=preferred_theme() />
				<div class="graph-overlay">
					<h1>"Component Dependencies"</h1>
					<p class="subtitle">
						"Drag nodes to reposition. Double-click a node to focus its dependencies. Scroll to zoom."
					</p>
				</div>
			</div>
		}
	}
}
