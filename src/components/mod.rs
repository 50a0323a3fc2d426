//! UI-facing components.

pub mod force_graph;
