//! Graph model construction.
//!
//! Turns the raw component list of an input document into a [`ResolvedGraph`]:
//! the component set, the links obtained by resolving every `depends-on`
//! reference, and a symmetric [`AdjacencyIndex`] used for highlight queries.
//! A graph is either built completely or not at all.

use std::collections::{HashMap, HashSet};

use log::{debug, warn};

use super::error::{GraphError, Result};
use super::types::{DependencyKind, RawComponent};

/// A node of the resolved graph.
#[derive(Clone, Debug, PartialEq)]
pub struct Component {
	/// Identifier referenced by dependencies and interaction events.
	pub id: String,
	/// Display title as given in the document, possibly empty.
	pub title: String,
}

impl Component {
	/// Text shown next to the node.
	pub fn label(&self) -> &str {
		if self.title.is_empty() { &self.id } else { &self.title }
	}
}

/// A resolved dependency. Endpoints are indices into [`ResolvedGraph::components`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Link {
	/// The depending component.
	pub source: usize,
	/// The component depended upon.
	pub target: usize,
	/// Dependency flavour, used for styling.
	pub kind: DependencyKind,
}

/// Symmetric one-hop connectivity keyed by component id.
///
/// Every inserted pair is stored in both directions, and every component is
/// connected to itself.
#[derive(Clone, Debug, Default)]
pub struct AdjacencyIndex {
	neighbors: HashMap<String, HashSet<String>>,
}

impl AdjacencyIndex {
	fn connect(&mut self, a: &str, b: &str) {
		self.neighbors
			.entry(a.to_string())
			.or_default()
			.insert(b.to_string());
		self.neighbors
			.entry(b.to_string())
			.or_default()
			.insert(a.to_string());
	}

	/// Whether `a` and `b` are the same component or share a link.
	pub fn is_connected(&self, a: &str, b: &str) -> bool {
		self.neighbors.get(a).is_some_and(|set| set.contains(b))
	}

	/// Ids connected to `id`, including `id` itself.
	pub fn neighbors(&self, id: &str) -> impl Iterator<Item = &str> {
		self.neighbors
			.get(id)
			.into_iter()
			.flat_map(|set| set.iter().map(String::as_str))
	}

	/// Number of distinct ids in the index.
	pub fn len(&self) -> usize {
		self.neighbors.len()
	}

	/// Whether no id has been indexed.
	pub fn is_empty(&self) -> bool {
		self.neighbors.is_empty()
	}
}

/// The immutable result of a successful build.
#[derive(Clone, Debug, Default)]
pub struct ResolvedGraph {
	components: Vec<Component>,
	links: Vec<Link>,
	adjacency: AdjacencyIndex,
	degrees: Vec<usize>,
	diagnostics: Vec<GraphError>,
}

impl ResolvedGraph {
	/// Components in document order.
	pub fn components(&self) -> &[Component] {
		&self.components
	}

	/// Resolved links in document order.
	pub fn links(&self) -> &[Link] {
		&self.links
	}

	/// One-hop connectivity used by the highlight rules.
	pub fn adjacency(&self) -> &AdjacencyIndex {
		&self.adjacency
	}

	/// Index of the first component with `id`.
	pub fn index_of(&self, id: &str) -> Option<usize> {
		self.components.iter().position(|c| c.id == id)
	}

	/// First component with `id`.
	pub fn component(&self, id: &str) -> Option<&Component> {
		self.index_of(id).map(|idx| &self.components[idx])
	}

	/// Number of link endpoints attached to the component at `index`.
	pub fn degree(&self, index: usize) -> usize {
		self.degrees.get(index).copied().unwrap_or(0)
	}

	/// Non-fatal problems found while building (duplicate ids).
	pub fn diagnostics(&self) -> &[GraphError] {
		&self.diagnostics
	}

	/// Number of components, duplicates included.
	pub fn len(&self) -> usize {
		self.components.len()
	}

	/// Whether the graph has no components.
	pub fn is_empty(&self) -> bool {
		self.components.is_empty()
	}
}

/// Build a graph, flagging duplicate ids as diagnostics.
///
/// Dependency targets resolve to the first component carrying the id. Any
/// target that matches no component aborts the build.
pub fn build(raw: &[RawComponent]) -> Result<ResolvedGraph> {
	let diagnostics = duplicate_ids(raw);
	for diagnostic in &diagnostics {
		warn!("component-graph: {diagnostic}");
	}

	// First occurrence wins, mirroring a front-to-back linear search.
	let mut first_index: HashMap<&str, usize> = HashMap::with_capacity(raw.len());
	for (idx, component) in raw.iter().enumerate() {
		first_index.entry(component.id.as_str()).or_insert(idx);
	}

	let mut links = Vec::new();
	for (source, component) in raw.iter().enumerate() {
		for dep in component.dependencies() {
			let Some(&target) = first_index.get(dep.target.as_str()) else {
				return Err(GraphError::UnresolvedDependency {
					source_id: component.id.clone(),
					target_id: dep.target.clone(),
				});
			};
			links.push(Link {
				source,
				target,
				kind: dep.kind(),
			});
		}
	}

	let mut adjacency = AdjacencyIndex::default();
	for component in raw {
		adjacency.connect(&component.id, &component.id);
	}
	let mut degrees = vec![0; raw.len()];
	for link in &links {
		adjacency.connect(&raw[link.source].id, &raw[link.target].id);
		degrees[link.source] += 1;
		degrees[link.target] += 1;
	}

	let components = raw
		.iter()
		.map(|c| Component {
			id: c.id.clone(),
			title: c.title.clone(),
		})
		.collect::<Vec<_>>();

	debug!(
		"component-graph: built {} components, {} links",
		components.len(),
		links.len()
	);

	Ok(ResolvedGraph {
		components,
		links,
		adjacency,
		degrees,
		diagnostics,
	})
}

/// Like [`build`], but any duplicate id is a hard error.
pub fn build_strict(raw: &[RawComponent]) -> Result<ResolvedGraph> {
	if let Some(err) = duplicate_ids(raw).into_iter().next() {
		return Err(err);
	}
	build(raw)
}

/// Duplicate ids in order of first appearance.
fn duplicate_ids(raw: &[RawComponent]) -> Vec<GraphError> {
	let mut counts: HashMap<&str, usize> = HashMap::new();
	let mut order = Vec::new();
	for component in raw {
		let count = counts.entry(component.id.as_str()).or_insert(0);
		if *count == 0 {
			order.push(component.id.as_str());
		}
		*count += 1;
	}
	order
		.into_iter()
		.filter_map(|id| {
			let count = counts[id];
			(count > 1).then(|| GraphError::DuplicateId {
				id: id.to_string(),
				count,
			})
		})
		.collect()
}
