//! Force-directed component-dependency graph.
//!
//! Builds a graph from a component document, lays it out with an owned
//! force simulation, and exposes drag and highlight interactions:
//! - Dependency resolution into links plus a symmetric adjacency index
//! - Explicitly stepped spring/charge/gravity simulation with cooling
//! - Drag pinning and a double-click neighbourhood highlight toggle
//! - A render adapter boundary, with a canvas implementation for the browser
//!
//! # Example
//!
//! ```
//! use component_graph::{GraphDocument, GraphState, SimulationParameters, build};
//!
//! let doc = GraphDocument::from_json(
//!     "inline",
//!     r#"{ "components": [
//!         { "id": "A", "title": "A" },
//!         { "id": "B", "title": "B", "depends-on": [ { "target": "A" } ] }
//!     ] }"#,
//! )?;
//! let mut state = GraphState::new(build(&doc.components)?, SimulationParameters::default());
//! state.on_toggle("B");
//! while state.tick().is_some() {}
//! assert!(state.frame().nodes.iter().all(|n| n.opacity == 1.0));
//! # Ok::<(), component_graph::GraphError>(())
//! ```

#[cfg(target_arch = "wasm32")]
mod component;
mod error;
mod frame;
mod host;
mod interaction;
mod loader;
mod model;
#[cfg(target_arch = "wasm32")]
mod render;
mod simulation;
mod state;
pub mod theme;
mod types;

#[cfg(target_arch = "wasm32")]
pub use component::ForceGraphCanvas;
pub use error::{GraphError, Result};
pub use frame::{ArcGeometry, Frame, LinkFrame, NodeFrame, RenderAdapter};
pub use host::{Epoch, GraphHost};
pub use interaction::{DIMMED_OPACITY, FULL_OPACITY, HighlightMode, InteractionState};
#[cfg(not(target_arch = "wasm32"))]
pub use loader::FileLoader;
#[cfg(target_arch = "wasm32")]
pub use loader::ScriptElementLoader;
pub use loader::{DocumentLoader, GraphSource, load_document, load_graph};
pub use model::{AdjacencyIndex, Component, Link, ResolvedGraph, build, build_strict};
#[cfg(target_arch = "wasm32")]
pub use render::CanvasRenderer;
pub use simulation::{NodeState, RunState, Simulation, SimulationParameters, Tick};
pub use state::{GraphState, ViewTransform};
pub use theme::Theme;
pub use types::{DependencyKind, GraphDocument, RawComponent, RawDependency};
