use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::commands::GraphCommands;
use super::render;
use super::state::GraphSurface;
use crate::graph_builder::VisibleGraph;
use crate::layout::LayoutConfig;

type Shared<T> = Rc<RefCell<Option<T>>>;

const FALLBACK_SIZE: (f64, f64) = (800.0, 600.0);

/// Drawing size of the canvas: the window when fullscreen, otherwise the
/// explicit `width`/`height` props falling back to the parent element.
fn canvas_size(
	fullscreen: bool,
	window: Option<(f64, f64)>,
	parent: Option<(f64, f64)>,
	width: Option<f64>,
	height: Option<f64>,
) -> (f64, f64) {
	if fullscreen {
		return window.unwrap_or(FALLBACK_SIZE);
	}
	let parent = parent.filter(|&(w, h)| w > 0.0 && h > 0.0);
	(
		width.or(parent.map(|p| p.0)).unwrap_or(FALLBACK_SIZE.0),
		height.or(parent.map(|p| p.1)).unwrap_or(FALLBACK_SIZE.1),
	)
}

fn window_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

fn local_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Canvas rendering of a [`VisibleGraph`] with drag, pan, wheel zoom and
/// click handling. Clicks (presses that did not move) on a node are reported
/// through `on_node_click`; camera moves arrive through `commands`. The
/// measured drawing size is written to `size` before the first graph is
/// read, so the host can build the graph for the real canvas.
#[component]
pub fn HierarchyGraphCanvas(
	#[prop(into)] graph: Signal<VisibleGraph>,
	#[prop(into)] selected: Signal<Option<String>>,
	#[prop(into)] on_node_click: Callback<String>,
	commands: GraphCommands,
	#[prop(optional)] config: LayoutConfig,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
	#[prop(optional)] size: Option<RwSignal<(f64, f64)>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let surface: Shared<GraphSurface> = Rc::new(RefCell::new(None));
	let animate: Shared<Closure<dyn FnMut(f64)>> = Rc::new(RefCell::new(None));
	let resize_cb: Shared<Closure<dyn FnMut()>> = Rc::new(RefCell::new(None));
	let (surface_init, animate_init, resize_cb_init) =
		(surface.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if surface_init.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let parent = canvas
			.parent_element()
			.map(|p| (p.client_width() as f64, p.client_height() as f64));
		let (w, h) = canvas_size(fullscreen, window_size(&window), parent, width, height);
		if let Some(size) = size {
			size.set((w, h));
		}
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = match canvas.get_context("2d") {
			Ok(Some(ctx)) => match ctx.dyn_into() {
				Ok(ctx) => ctx,
				Err(_) => return,
			},
			_ => {
				warn!("graph: 2d canvas context unavailable");
				return;
			}
		};

		let mut initial = GraphSurface::new(config.clone(), w, h);
		initial.load(graph.get_untracked());
		initial.set_selected(selected.get_untracked());
		*surface_init.borrow_mut() = Some(initial);
		debug!("graph: canvas mounted at {w}x{h}");

		if fullscreen {
			let (surface_resize, canvas_resize) = (surface_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(window_size) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(size) = size {
					size.set((nw, nh));
				}
				if let Some(ref mut s) = *surface_resize.borrow_mut() {
					s.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (surface_anim, animate_inner) = (surface_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move |now: f64| {
			if !canvas.is_connected() {
				debug!("graph: canvas detached, stopping animation");
				return;
			}
			if let Some(ref mut s) = *surface_anim.borrow_mut() {
				for command in commands.drain() {
					s.apply(command);
				}
				s.tick(now);
				render::render(s, &ctx);
			}
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let surface_graph = surface.clone();
	Effect::new(move |_| {
		let next = graph.get();
		if let Some(ref mut s) = *surface_graph.borrow_mut() {
			s.load(next);
		}
	});

	let surface_selected = surface.clone();
	Effect::new(move |_| {
		let next = selected.get();
		if let Some(ref mut s) = *surface_selected.borrow_mut() {
			s.set_selected(next);
		}
	});

	let surface_md = surface.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *surface_md.borrow_mut() {
			s.pointer_down(x, y);
		}
	};

	let surface_mm = surface.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *surface_mm.borrow_mut() {
			s.pointer_move(x, y);
		}
	};

	let surface_mu = surface.clone();
	let on_mouseup = move |_: MouseEvent| {
		let clicked = surface_mu
			.borrow_mut()
			.as_mut()
			.and_then(GraphSurface::pointer_up);
		// The surface borrow is released before handing control to the host.
		if let Some(id) = clicked {
			on_node_click.run(id);
		}
	};

	let surface_ml = surface.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *surface_ml.borrow_mut() {
			s.pointer_leave();
		}
	};

	let surface_wh = surface.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *surface_wh.borrow_mut() {
			s.wheel(x, y, ev.delta_y());
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="hierarchy-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
