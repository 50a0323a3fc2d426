//! Visual theming for the canvas renderer.

use super::types::DependencyKind;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
	/// Alpha in `0.0..=1.0`.
	pub a: f64,
}

impl Color {
	/// Opaque color.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Color with explicit alpha.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Same color with alpha replaced.
	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// CSS color string: hex when opaque, `rgba(...)` otherwise.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Node circle style.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	/// Circle fill.
	pub fill: Color,
	/// Circle outline.
	pub stroke: Color,
	/// Outline width; doubled while a node is pinned.
	pub stroke_width: f64,
	/// Circle radius in world units.
	pub radius: f64,
	/// Extra pointer tolerance around the circle, in world units.
	pub hit_slop: f64,
}

/// Label text style.
#[derive(Clone, Debug)]
pub struct LabelStyle {
	/// Text color.
	pub color: Color,
	/// Halo drawn behind the text so labels stay readable over links.
	pub halo: Color,
	/// Halo stroke width; `0.0` disables it.
	pub halo_width: f64,
	/// Canvas font shorthand.
	pub font: String,
	/// Label offset from the node centre.
	pub offset_x: f64,
	/// Vertical counterpart of `offset_x`.
	pub offset_y: f64,
}

/// Link style, per dependency kind.
#[derive(Clone, Debug)]
pub struct LinkStyle {
	/// Stroke for `sync` dependencies.
	pub sync_color: Color,
	/// Stroke for `async` dependencies.
	pub async_color: Color,
	/// Stroke width.
	pub width: f64,
	/// `(dash, gap)` for async links.
	pub async_dash: (f64, f64),
	/// Arrowhead length.
	pub arrow_size: f64,
}

impl LinkStyle {
	/// Stroke color for `kind`.
	pub fn color(&self, kind: DependencyKind) -> Color {
		match kind {
			DependencyKind::Sync => self.sync_color,
			DependencyKind::Async => self.async_color,
		}
	}

	/// Dash pattern for `kind`, `None` for solid lines.
	pub fn dash(&self, kind: DependencyKind) -> Option<(f64, f64)> {
		match kind {
			DependencyKind::Sync => None,
			DependencyKind::Async => Some(self.async_dash),
		}
	}
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	/// Canvas fill behind the graph.
	pub background: Color,
	/// Node circles.
	pub node: NodeStyle,
	/// Node labels.
	pub label: LabelStyle,
	/// Link arcs and arrowheads.
	pub link: LinkStyle,
}

impl Theme {
	/// Light theme: grey nodes, dark outlines, dashed async links.
	pub fn default_theme() -> Self {
		Self {
			background: Color::rgb(255, 255, 255),
			node: NodeStyle {
				fill: Color::rgb(204, 204, 204),
				stroke: Color::rgb(51, 51, 51),
				stroke_width: 1.5,
				radius: 6.0,
				hit_slop: 4.0,
			},
			label: LabelStyle {
				color: Color::rgb(0, 0, 0),
				halo: Color::rgba(255, 255, 255, 0.8),
				halo_width: 3.0,
				font: "10px sans-serif".to_string(),
				offset_x: 8.0,
				offset_y: 3.1,
			},
			link: LinkStyle {
				sync_color: Color::rgb(102, 102, 102),
				async_color: Color::rgb(31, 119, 180),
				width: 1.5,
				async_dash: (4.0, 3.0),
				arrow_size: 6.0,
			},
		}
	}

	/// Dark background variant.
	pub fn midnight() -> Self {
		Self {
			background: Color::rgb(22, 27, 34),
			node: NodeStyle {
				fill: Color::rgb(94, 129, 172),
				stroke: Color::rgb(216, 222, 233),
				..Self::default_theme().node
			},
			label: LabelStyle {
				color: Color::rgb(229, 233, 240),
				halo: Color::rgba(22, 27, 34, 0.8),
				..Self::default_theme().label
			},
			link: LinkStyle {
				sync_color: Color::rgba(140, 160, 180, 0.8),
				async_color: Color::rgba(136, 192, 208, 0.8),
				..Self::default_theme().link
			},
		}
	}

	/// Radius used for pointer hit testing.
	pub fn hit_radius(&self) -> f64 {
		self.node.radius + self.node.hit_slop
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::default_theme()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn css_uses_hex_for_opaque_colors() {
		assert_eq!(Color::rgb(255, 0, 16).to_css(), "#ff0010");
		assert_eq!(
			Color::rgb(1, 2, 3).with_alpha(0.5).to_css(),
			"rgba(1, 2, 3, 0.5)"
		);
	}

	#[test]
	fn only_async_links_are_dashed() {
		let theme = Theme::default();
		assert_eq!(theme.link.dash(DependencyKind::Sync), None);
		assert_eq!(theme.link.dash(DependencyKind::Async), Some((4.0, 3.0)));
		assert_ne!(
			theme.link.color(DependencyKind::Sync),
			theme.link.color(DependencyKind::Async)
		);
		assert_eq!(Theme::midnight().hit_radius(), 10.0);
	}
}
