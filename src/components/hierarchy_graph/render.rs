use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::GraphSurface;
use super::style::{
	BACKGROUND, EDGE_COLOR, LABEL_COLOR, SELECTED_GLOW, edge_dash, label_font, label_offset,
	node_style, stroke_width,
};

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

fn rgba((r, g, b): (u8, u8, u8), alpha: f64) -> String {
	format!("rgba({r}, {g}, {b}, {alpha})")
}

fn set_dash(ctx: &CanvasRenderingContext2d, dash: Option<(f64, f64)>) {
	let pattern = match dash {
		Some((on, off)) => js_sys::Array::of2(&JsValue::from_f64(on), &JsValue::from_f64(off)),
		None => js_sys::Array::new(),
	};
	let _ = ctx.set_line_dash(&pattern);
}

pub fn render(surface: &GraphSurface, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, surface.width, surface.height);
	let transform = surface.camera.transform();
	ctx.save();
	let _ = ctx.translate(transform.x, transform.y);
	let _ = ctx.scale(transform.k, transform.k);
	draw_edges(surface, ctx);
	draw_nodes(surface, ctx);
	draw_labels(surface, ctx);
	ctx.restore();
}

fn draw_edges(surface: &GraphSurface, ctx: &CanvasRenderingContext2d) {
	let t = ease_out_cubic(surface.focus.strength);
	let has_highlight = surface.has_active_highlight();
	let sim = &surface.simulation;

	for edge in &surface.graph.edges {
		let (Some(si), Some(ti)) = (sim.index_of(&edge.source), sim.index_of(&edge.target)) else {
			continue;
		};
		let (a, b) = (&sim.nodes()[si], &sim.nodes()[ti]);
		let (dx, dy) = (b.x - a.x, b.y - a.y);
		if (dx * dx + dy * dy).sqrt() < 0.001 {
			continue;
		}

		// t=0: every edge at 0.6; t=1: highlighted edges 0.9, the rest 0.15.
		let lit = has_highlight && surface.is_highlighted(si) && surface.is_highlighted(ti);
		let (alpha, width) = if lit {
			(0.6 + 0.3 * t, 2.0 * (1.0 + 0.3 * t))
		} else {
			(0.6 - 0.45 * t, 2.0 * (1.0 - 0.3 * t))
		};

		ctx.set_stroke_style_str(&rgba(EDGE_COLOR, alpha));
		ctx.set_line_width(width);
		set_dash(ctx, edge_dash(edge.relationship));
		ctx.begin_path();
		ctx.move_to(a.x, a.y);
		ctx.line_to(b.x, b.y);
		ctx.stroke();
	}
	set_dash(ctx, None);
}

fn draw_nodes(surface: &GraphSurface, ctx: &CanvasRenderingContext2d) {
	let t = ease_out_cubic(surface.focus.strength);
	let has_highlight = surface.has_active_highlight();

	for idx in 0..surface.simulation.nodes().len() {
		let Some((layout, visible)) = surface.node(idx) else {
			continue;
		};
		let (x, y) = (layout.x, layout.y);
		let base = surface.radius(idx);
		let selected = surface.is_selected(idx);
		let highlighted = has_highlight && surface.is_highlighted(idx);
		let dimmed = has_highlight && !highlighted;

		let radius = if highlighted && surface.is_focused(idx) {
			base * (1.0 + 0.2 * t)
		} else if dimmed {
			base * (1.0 - 0.1 * t)
		} else {
			base
		};

		if selected {
			let glow = base * 1.8;
			if let Ok(gradient) = ctx.create_radial_gradient(x, y, radius * 0.5, x, y, glow) {
				let _ = gradient.add_color_stop(0.0, &rgba(SELECTED_GLOW, 0.35));
				let _ = gradient.add_color_stop(1.0, &rgba(SELECTED_GLOW, 0.0));
				ctx.begin_path();
				let _ = ctx.arc(x, y, glow, 0.0, 2.0 * PI);
				#[allow(deprecated)]
				ctx.set_fill_style(&gradient);
				ctx.fill();
			}
		}

		let style = node_style(visible.node.node_type, visible.node.status, visible.system_type);
		ctx.set_global_alpha(if dimmed { 1.0 - 0.6 * t } else { 1.0 });
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(style.fill);
		ctx.fill();
		ctx.set_stroke_style_str(style.stroke);
		ctx.set_line_width(stroke_width(selected));
		ctx.stroke();
		ctx.set_global_alpha(1.0);
	}
}

fn draw_labels(surface: &GraphSurface, ctx: &CanvasRenderingContext2d) {
	let t = ease_out_cubic(surface.focus.strength);
	let has_highlight = surface.has_active_highlight();
	let mode = surface.graph.mode;

	ctx.set_text_align("center");
	ctx.set_fill_style_str(LABEL_COLOR);
	for idx in 0..surface.simulation.nodes().len() {
		let Some((layout, visible)) = surface.node(idx) else {
			continue;
		};
		let dimmed = has_highlight && !surface.is_highlighted(idx);
		ctx.set_global_alpha(if dimmed { 1.0 - 0.7 * t } else { 1.0 });
		ctx.set_font(&label_font(mode, layout.node_type));
		let _ = ctx.fill_text(
			&visible.node.name,
			layout.x,
			layout.y + label_offset(mode, layout.node_type),
		);
	}
	ctx.set_global_alpha(1.0);
}
