//! Resolving a graph source into a fully built graph.

use std::future::Future;

use log::info;

use super::error::{GraphError, Result};
use super::model::{ResolvedGraph, build};
use super::types::GraphDocument;

/// Where a graph comes from.
#[derive(Clone, Debug)]
pub enum GraphSource {
	/// An already parsed document.
	Document(GraphDocument),
	/// Raw JSON text.
	Json(String),
	/// Something a [`DocumentLoader`] knows how to fetch (path, element id, ...).
	Locator(String),
}

impl From<GraphDocument> for GraphSource {
	fn from(doc: GraphDocument) -> Self {
		GraphSource::Document(doc)
	}
}

/// Fetches the raw text of a document named by a locator.
pub trait DocumentLoader {
	/// Raw document text for `locator`, or a [`GraphError::LoadFailure`].
	fn fetch(&self, locator: &str) -> impl Future<Output = Result<String>>;
}

/// Reads documents from the local filesystem; the locator is a path.
///
/// Blocking: the future does a plain `std::fs` read on its first poll. Fine
/// for the CLI and tests, not for a reactor that must stay responsive.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Clone, Copy, Debug, Default)]
pub struct FileLoader;

#[cfg(not(target_arch = "wasm32"))]
impl DocumentLoader for FileLoader {
	async fn fetch(&self, locator: &str) -> Result<String> {
		std::fs::read_to_string(locator).map_err(|e| GraphError::load(locator, e))
	}
}

/// Reads documents embedded in the page as `<script type="application/json">`
/// elements; the locator is the element id.
#[cfg(target_arch = "wasm32")]
#[derive(Clone, Copy, Debug, Default)]
pub struct ScriptElementLoader;

#[cfg(target_arch = "wasm32")]
impl DocumentLoader for ScriptElementLoader {
	async fn fetch(&self, locator: &str) -> Result<String> {
		use wasm_bindgen::JsCast;
		use web_sys::HtmlScriptElement;

		let document = web_sys::window()
			.and_then(|w| w.document())
			.ok_or_else(|| GraphError::load(locator, "no document available"))?;
		let element = document
			.get_element_by_id(locator)
			.ok_or_else(|| GraphError::load(locator, "element not found"))?;
		let script: HtmlScriptElement = element
			.dyn_into()
			.map_err(|_| GraphError::load(locator, "element is not a <script>"))?;
		script
			.text()
			.map_err(|_| GraphError::load(locator, "script text is unreadable"))
	}
}

/// Resolve `source` to a parsed document.
pub async fn load_document<L: DocumentLoader>(source: GraphSource, loader: &L) -> Result<GraphDocument> {
	match source {
		GraphSource::Document(doc) => Ok(doc),
		GraphSource::Json(text) => GraphDocument::from_json("<inline>", &text),
		GraphSource::Locator(locator) => {
			let text = loader.fetch(&locator).await?;
			GraphDocument::from_json(&locator, &text)
		}
	}
}

/// Resolve `source` and build it. Either the whole graph or an error.
pub async fn load_graph<L: DocumentLoader>(source: GraphSource, loader: &L) -> Result<ResolvedGraph> {
	let doc = load_document(source, loader).await?;
	let graph = build(&doc.components)?;
	info!(
		"component-graph: loaded {} components, {} links",
		graph.len(),
		graph.links().len()
	);
	Ok(graph)
}
