//! Canvas rendering for the force graph.
//!
//! Draws a [`Frame`] in three passes for correct z-ordering: links (arcs with
//! arrowheads), node circles, then labels on top. Every element is drawn with
//! the opacity the frame assigns to it.

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::frame::{Frame, LinkFrame, NodeFrame, RenderAdapter};
use super::theme::Theme;

/// [`RenderAdapter`] that paints onto a 2D canvas context.
pub struct CanvasRenderer {
	ctx: CanvasRenderingContext2d,
	/// Colours and sizes used for every element.
	pub theme: Theme,
	width: f64,
	height: f64,
}

impl CanvasRenderer {
	/// Renderer for a canvas of `width` × `height` pixels.
	pub fn new(ctx: CanvasRenderingContext2d, theme: Theme, width: f64, height: f64) -> Self {
		Self {
			ctx,
			theme,
			width,
			height,
		}
	}

	/// Track the canvas size so the background covers it.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	fn draw_background(&self) {
		self.ctx.set_fill_style_str(&self.theme.background.to_css());
		self.ctx.fill_rect(0.0, 0.0, self.width, self.height);
	}

	fn draw_link(&self, link: &LinkFrame<'_>) {
		let ctx = &self.ctx;
		let style = &self.theme.link;
		let Some(arc) = link.arc() else {
			return;
		};

		ctx.set_global_alpha(link.opacity);
		ctx.set_stroke_style_str(&style.color(link.kind).to_css());
		ctx.set_line_width(style.width);
		match style.dash(link.kind) {
			Some((dash, gap)) => {
				let _ = ctx.set_line_dash(&js_sys::Array::of2(
					&JsValue::from_f64(dash),
					&JsValue::from_f64(gap),
				));
			}
			None => {
				let _ = ctx.set_line_dash(&js_sys::Array::new());
			}
		}

		ctx.begin_path();
		let _ = ctx.arc(arc.cx, arc.cy, arc.radius, arc.start_angle, arc.end_angle);
		ctx.stroke();
		let _ = ctx.set_line_dash(&js_sys::Array::new());

		// Arrowhead just outside the target circle.
		let Some((tip_x, tip_y, ux, uy)) = link.arrow_anchor(self.theme.node.radius) else {
			return;
		};
		let size = style.arrow_size;
		let (back_x, back_y) = (tip_x - ux * size, tip_y - uy * size);
		let (px, py) = (-uy * size * 0.5, ux * size * 0.5);

		ctx.set_fill_style_str(&style.color(link.kind).to_css());
		ctx.begin_path();
		ctx.move_to(tip_x, tip_y);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();
	}

	fn draw_node(&self, node: &NodeFrame<'_>) {
		let ctx = &self.ctx;
		let style = &self.theme.node;

		ctx.set_global_alpha(node.opacity);
		ctx.begin_path();
		let _ = ctx.arc(node.x, node.y, style.radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&style.fill.to_css());
		ctx.fill();
		ctx.set_stroke_style_str(&style.stroke.to_css());
		ctx.set_line_width(if node.fixed {
			style.stroke_width * 2.0
		} else {
			style.stroke_width
		});
		ctx.stroke();
	}

	fn draw_label(&self, node: &NodeFrame<'_>) {
		let ctx = &self.ctx;
		let style = &self.theme.label;
		let (x, y) = (node.x + style.offset_x, node.y + style.offset_y);

		ctx.set_global_alpha(node.opacity);
		ctx.set_font(&style.font);
		if style.halo_width > 0.0 {
			ctx.set_stroke_style_str(&style.halo.to_css());
			ctx.set_line_width(style.halo_width);
			let _ = ctx.stroke_text(node.title, x, y);
		}
		ctx.set_fill_style_str(&style.color.to_css());
		let _ = ctx.fill_text(node.title, x, y);
	}
}

impl RenderAdapter for CanvasRenderer {
	fn render(&mut self, frame: &Frame<'_>) {
		self.draw_background();

		self.ctx.save();
		let view = frame.view;
		let _ = self.ctx.translate(view.x, view.y);
		let _ = self.ctx.scale(view.k, view.k);

		for link in &frame.links {
			self.draw_link(link);
		}
		for node in &frame.nodes {
			self.draw_node(node);
		}
		for node in &frame.nodes {
			self.draw_label(node);
		}

		self.ctx.set_global_alpha(1.0);
		self.ctx.restore();
	}
}
