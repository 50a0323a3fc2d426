//! Per-tick snapshot handed to the render adapter.
//!
//! A [`Frame`] carries everything a renderer needs to draw one step of the
//! layout: node positions, link endpoints and the opacity each element should
//! be drawn with. Renderers only read frames; they never call back into the
//! graph state.

use std::f64::consts::{PI, TAU};

use serde::Serialize;

use super::state::ViewTransform;
use super::types::DependencyKind;

/// Node as seen by the renderer.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NodeFrame<'a> {
	/// Position in the component list.
	pub index: usize,
	/// Component id.
	pub id: &'a str,
	/// Label to draw.
	pub title: &'a str,
	/// Horizontal position in graph units.
	pub x: f64,
	/// Vertical position in graph units.
	pub y: f64,
	/// Pinned by a drag in progress.
	pub fixed: bool,
	/// Opacity from the highlight rules.
	pub opacity: f64,
}

impl NodeFrame<'_> {
	/// SVG transform placing the node's marker and label.
	pub fn svg_transform(&self) -> String {
		format!("translate({},{})", self.x, self.y)
	}
}

/// Link as seen by the renderer, endpoints already resolved to positions.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LinkFrame<'a> {
	/// Index of the depending component.
	pub source: usize,
	/// Index of the component depended upon.
	pub target: usize,
	/// Id of the depending component.
	pub source_id: &'a str,
	/// Id of the component depended upon.
	pub target_id: &'a str,
	/// Dependency flavour, drives styling.
	#[serde(rename = "type")]
	pub kind: DependencyKind,
	/// Source x.
	pub x1: f64,
	/// Source y.
	pub y1: f64,
	/// Target x.
	pub x2: f64,
	/// Target y.
	pub y2: f64,
	/// Opacity from the highlight rules.
	pub opacity: f64,
}

/// Circular arc drawn from a link's source to its target.
///
/// Angles follow the canvas convention (y grows downward); the arc runs with
/// increasing angle from `start_angle` to `end_angle`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcGeometry {
	/// Centre x of the circle the arc lies on.
	pub cx: f64,
	/// Centre y.
	pub cy: f64,
	/// Equal to the distance between the endpoints.
	pub radius: f64,
	/// Angle of the source endpoint, in radians.
	pub start_angle: f64,
	/// Angle of the target endpoint, never below `start_angle`.
	pub end_angle: f64,
}

impl LinkFrame<'_> {
	/// Straight-line distance between the endpoints.
	pub fn length(&self) -> f64 {
		let (dx, dy) = (self.x2 - self.x1, self.y2 - self.y1);
		(dx * dx + dy * dy).sqrt()
	}

	/// Arc with radius equal to the endpoint distance, bulging to the left
	/// of the source-to-target direction. `None` for coincident endpoints.
	pub fn arc(&self) -> Option<ArcGeometry> {
		let radius = self.length();
		if radius < f64::EPSILON {
			return None;
		}
		// Chord equals radius, so the centre sits at the apex of an
		// equilateral triangle over the chord.
		let h = 3f64.sqrt() / 2.0;
		let cx = (self.x1 + self.x2) / 2.0 + h * (self.y1 - self.y2);
		let cy = (self.y1 + self.y2) / 2.0 + h * (self.x2 - self.x1);
		let start_angle = (self.y1 - cy).atan2(self.x1 - cx);
		let mut end_angle = (self.y2 - cy).atan2(self.x2 - cx);
		if end_angle < start_angle {
			end_angle += TAU;
		}
		Some(ArcGeometry {
			cx,
			cy,
			radius,
			start_angle,
			end_angle,
		})
	}

	/// SVG path data for the same arc.
	pub fn svg_path(&self) -> String {
		let dr = self.length();
		format!(
			"M{},{}A{},{} 0 0,1 {},{}",
			self.x1, self.y1, dr, dr, self.x2, self.y2
		)
	}

	/// Point on the arc `offset` units before the target, with the unit
	/// tangent there. Used to place arrowheads outside the target node.
	pub fn arrow_anchor(&self, offset: f64) -> Option<(f64, f64, f64, f64)> {
		let arc = self.arc()?;
		let angle = arc.end_angle - (offset / arc.radius).min(PI / 3.0);
		let (x, y) = (
			arc.cx + arc.radius * angle.cos(),
			arc.cy + arc.radius * angle.sin(),
		);
		// Tangent of an increasing-angle arc.
		Some((x, y, -angle.sin(), angle.cos()))
	}
}

/// Everything drawn for one simulation step.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Frame<'a> {
	/// Simulation steps taken so far.
	pub iteration: u64,
	/// Temperature after the last step.
	pub alpha: f64,
	/// Pan and zoom to draw with.
	pub view: ViewTransform,
	/// Nodes in drawing order; later nodes are on top.
	pub nodes: Vec<NodeFrame<'a>>,
	/// Links, drawn beneath the nodes.
	pub links: Vec<LinkFrame<'a>>,
}

/// Presentation boundary. Called once per tick and after every interaction.
pub trait RenderAdapter {
	/// Draw `frame`, replacing whatever was drawn before.
	fn render(&mut self, frame: &Frame<'_>);
}
