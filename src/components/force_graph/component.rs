//! Leptos component wrapping the force-directed graph canvas.
//!
//! The component creates an HTML canvas element, loads the graph document,
//! and wires mouse events to node dragging, panning, zooming and the
//! double-click highlight toggle. Every installed graph gets its own
//! `requestAnimationFrame` loop, which ends as soon as the host reports its
//! epoch as stale.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::host::{Epoch, GraphHost};
use super::loader::{GraphSource, ScriptElementLoader, load_graph};
use super::render::CanvasRenderer;
use super::simulation::SimulationParameters;
use super::theme::Theme;

/// A node held by the pointer, with the grab offset in graph units.
struct DragGesture {
	id: String,
	offset_x: f64,
	offset_y: f64,
}

/// Tracks an in-progress canvas pan operation.
#[derive(Default)]
struct PanState {
	active: bool,
	start_x: f64,
	start_y: f64,
	transform_start_x: f64,
	transform_start_y: f64,
}

/// Bundles the graph host with the canvas renderer and pointer gestures.
struct GraphContext {
	host: GraphHost,
	renderer: CanvasRenderer,
	drag: Option<DragGesture>,
	pan: PanState,
}

type SharedContext = Rc<RefCell<Option<GraphContext>>>;

fn request_frame(cb: &Closure<dyn FnMut()>) {
	if let Some(window) = web_sys::window() {
		let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
	}
}

/// Drive `host.frame(epoch)` once per animation frame until the epoch goes stale.
fn start_animation(context: SharedContext, epoch: Epoch) {
	let callback: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let callback_inner = callback.clone();
	*callback.borrow_mut() = Some(Closure::new(move || {
		let alive = match context.borrow_mut().as_mut() {
			Some(c) => c.host.frame(epoch, &mut c.renderer),
			None => false,
		};
		if !alive {
			debug!("component-graph: animation loop for graph #{epoch} finished");
			// Break the self-reference so the closure and its context handle drop.
			let _ = callback_inner.borrow_mut().take();
			return;
		}
		if let Some(ref cb) = *callback_inner.borrow() {
			request_frame(cb);
		}
	}));
	if let Some(ref cb) = *callback.borrow() {
		request_frame(cb);
	}
}

fn pointer_position(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

fn viewport_size(window: &Window) -> (f64, f64) {
	let width = window
		.inner_width()
		.ok()
		.and_then(|v| v.as_f64())
		.unwrap_or(960.0);
	let height = window
		.inner_height()
		.ok()
		.and_then(|v| v.as_f64())
		.unwrap_or(500.0);
	(width, height)
}

/// Renders an interactive component-dependency graph on a canvas element.
///
/// The graph document is read from the `<script>` element whose id is
/// `locator`. The component sizes itself to its parent container by default;
/// set `fullscreen = true` to fill the viewport and follow window resizes.
/// Explicit `width`/`height` override automatic sizing, and `theme` replaces
/// the default light styling.
#[component]
pub fn ForceGraphCanvas(
	#[prop(into, default = String::from("graph-data"))] locator: String,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
	#[prop(optional)] theme: Option<Theme>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: SharedContext = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (context_init, resize_cb_init) = (context.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = if fullscreen {
			viewport_size(&window)
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(960.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(500.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = match canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into().ok())
		{
			Some(ctx) => ctx,
			None => {
				warn!("component-graph: canvas has no 2d context");
				return;
			}
		};

		*context_init.borrow_mut() = Some(GraphContext {
			host: GraphHost::new(SimulationParameters {
				width: w,
				height: h,
				..SimulationParameters::default()
			}),
			renderer: CanvasRenderer::new(ctx, theme.clone().unwrap_or_default(), w, h),
			drag: None,
			pan: PanState::default(),
		});

		if fullscreen {
			let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some(win) = web_sys::window() else {
					return;
				};
				let (nw, nh) = viewport_size(&win);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut c) = *context_resize.borrow_mut() {
					c.renderer.resize(nw, nh);
					c.host.resize(nw, nh);
					c.host.render(&mut c.renderer);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (context_load, locator) = (context_init.clone(), locator.clone());
		leptos::task::spawn_local(async move {
			match load_graph(GraphSource::Locator(locator), &ScriptElementLoader).await {
				Ok(graph) => {
					let epoch = match context_load.borrow_mut().as_mut() {
						Some(c) => c.host.replace(graph),
						None => return,
					};
					start_animation(context_load, epoch);
				}
				Err(e) => warn!("component-graph: {e}"),
			}
		});
	});

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_md.borrow_mut() {
			let radius = c.renderer.theme.hit_radius();
			let Some(state) = c.host.state() else {
				return;
			};
			let view = state.view;
			let (gx, gy) = view.screen_to_graph(x, y);
			let hit = state.node_at(gx, gy, radius).and_then(|idx| {
				let node = state.simulation.node(idx)?;
				Some((state.id_at(idx)?.to_string(), node.x - gx, node.y - gy))
			});

			if let Some((id, offset_x, offset_y)) = hit {
				c.host.on_drag_start(&id, &mut c.renderer);
				c.drag = Some(DragGesture {
					id,
					offset_x,
					offset_y,
				});
			} else {
				c.pan = PanState {
					active: true,
					start_x: x,
					start_y: y,
					transform_start_x: view.x,
					transform_start_y: view.y,
				};
			}
		}
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_mm.borrow_mut() {
			if let Some(drag) = &c.drag {
				let Some(view) = c.host.state().map(|state| state.view) else {
					return;
				};
				let (gx, gy) = view.screen_to_graph(x, y);
				c.host.on_drag_move(
					&drag.id,
					gx + drag.offset_x,
					gy + drag.offset_y,
					&mut c.renderer,
				);
			} else if c.pan.active {
				if let Some(state) = c.host.state_mut() {
					state.view.x = c.pan.transform_start_x + (x - c.pan.start_x);
					state.view.y = c.pan.transform_start_y + (y - c.pan.start_y);
				}
				c.host.render(&mut c.renderer);
			}
		}
	};

	let context_mu = context.clone();
	let end_gesture = move || {
		if let Some(ref mut c) = *context_mu.borrow_mut() {
			if let Some(drag) = c.drag.take() {
				c.host.on_drag_end(&drag.id, &mut c.renderer);
			}
			c.pan.active = false;
		}
	};
	let end_gesture_leave = end_gesture.clone();
	let on_mouseup = move |_: MouseEvent| end_gesture();
	let on_mouseleave = move |_: MouseEvent| end_gesture_leave();

	let context_dc = context.clone();
	let on_dblclick = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_dc.borrow_mut() {
			let radius = c.renderer.theme.hit_radius();
			let id = c.host.state().and_then(|state| {
				let idx = state.node_at_screen(x, y, radius)?;
				state.id_at(idx).map(str::to_string)
			});
			if let Some(id) = id {
				c.host.on_toggle(&id, &mut c.renderer);
			}
		}
	};

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			if let Some(state) = c.host.state_mut() {
				state.view.zoom_at(x, y, factor);
			}
			c.host.render(&mut c.renderer);
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="force-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:dblclick=on_dblclick
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
