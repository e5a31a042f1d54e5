//! Pan/zoom transform, fit-to-screen math and animated camera moves.

/// Allowed zoom range.
pub const SCALE_EXTENT: (f64, f64) = (0.1, 4.0);
/// Zoom factor of one zoom-in/zoom-out step.
pub const ZOOM_STEP: f64 = 1.5;
/// Length of a toolbar zoom step, in milliseconds.
pub const ZOOM_DURATION_MS: f64 = 300.0;
/// Length of a fit-to-screen move, in milliseconds.
pub const FIT_DURATION_MS: f64 = 750.0;
/// Share of the viewport the fitted graph may occupy.
pub const FIT_MARGIN: f64 = 0.85;

fn clamp_scale(k: f64) -> f64 {
	k.clamp(SCALE_EXTENT.0, SCALE_EXTENT.1)
}

fn ease_cubic_in_out(t: f64) -> f64 {
	if t < 0.5 {
		4.0 * t * t * t
	} else {
		1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
	}
}

/// Screen = graph * k + (x, y).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	/// Horizontal screen offset.
	pub x: f64,
	/// Vertical screen offset.
	pub y: f64,
	/// Scale factor.
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self::IDENTITY
	}
}

impl ViewTransform {
	/// No pan, no zoom.
	pub const IDENTITY: Self = Self {
		x: 0.0,
		y: 0.0,
		k: 1.0,
	};

	/// Invert the transform.
	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	/// Apply the transform.
	pub fn graph_to_screen(&self, gx: f64, gy: f64) -> (f64, f64) {
		(gx * self.k + self.x, gy * self.k + self.y)
	}

	/// Scale by `factor` keeping the screen point `(px, py)` fixed. The
	/// resulting scale is clamped to [`SCALE_EXTENT`].
	pub fn scaled_about(&self, px: f64, py: f64, factor: f64) -> Self {
		let k = clamp_scale(self.k * factor);
		let ratio = k / self.k;
		Self {
			x: px - (px - self.x) * ratio,
			y: py - (py - self.y) * ratio,
			k,
		}
	}

	fn lerp(&self, to: &Self, t: f64) -> Self {
		Self {
			x: self.x + (to.x - self.x) * t,
			y: self.y + (to.y - self.y) * t,
			k: self.k + (to.k - self.k) * t,
		}
	}
}

/// Axis-aligned bounding box in graph coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
	/// Left edge.
	pub min_x: f64,
	/// Top edge.
	pub min_y: f64,
	/// Right edge.
	pub max_x: f64,
	/// Bottom edge.
	pub max_y: f64,
}

impl Bounds {
	/// Box around a set of circles `(x, y, radius)`. `None` when empty.
	pub fn around_circles(circles: impl IntoIterator<Item = (f64, f64, f64)>) -> Option<Self> {
		circles.into_iter().fold(None, |acc, (x, y, r)| {
			let b = Self {
				min_x: x - r,
				min_y: y - r,
				max_x: x + r,
				max_y: y + r,
			};
			Some(match acc {
				None => b,
				Some(a) => a.union(&b),
			})
		})
	}

	/// Smallest box holding both boxes.
	pub fn union(&self, other: &Self) -> Self {
		Self {
			min_x: self.min_x.min(other.min_x),
			min_y: self.min_y.min(other.min_y),
			max_x: self.max_x.max(other.max_x),
			max_y: self.max_y.max(other.max_y),
		}
	}

	/// Box width.
	pub fn width(&self) -> f64 {
		self.max_x - self.min_x
	}

	/// Box height.
	pub fn height(&self) -> f64 {
		self.max_y - self.min_y
	}

	/// Centre point.
	pub fn center(&self) -> (f64, f64) {
		(
			(self.min_x + self.max_x) / 2.0,
			(self.min_y + self.max_y) / 2.0,
		)
	}
}

/// Transform that centres `bounds` in a `width` x `height` viewport with a
/// [`FIT_MARGIN`] border. `None` for a degenerate box or viewport.
pub fn fit_transform(bounds: &Bounds, width: f64, height: f64) -> Option<ViewTransform> {
	let axis_scale = |viewport: f64, extent: f64| {
		if extent > 0.0 {
			viewport / extent
		} else {
			f64::INFINITY
		}
	};
	let scale = axis_scale(width, bounds.width()).min(axis_scale(height, bounds.height()));
	if !scale.is_finite() || scale <= 0.0 {
		return None;
	}
	let k = clamp_scale(FIT_MARGIN * scale);
	let (cx, cy) = bounds.center();
	Some(ViewTransform {
		x: width / 2.0 - k * cx,
		y: height / 2.0 - k * cy,
		k,
	})
}

/// Camera moves a host toolbar can request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CameraCommand {
	/// One [`ZOOM_STEP`] in about the viewport centre.
	ZoomIn,
	/// One [`ZOOM_STEP`] out about the viewport centre.
	ZoomOut,
	/// Fit the visible graph into the viewport.
	FitToScreen,
	/// Back to [`ViewTransform::IDENTITY`].
	ResetView,
}

#[derive(Clone, Copy, Debug)]
struct Tween {
	from: ViewTransform,
	to: ViewTransform,
	start_ms: f64,
	duration_ms: f64,
}

/// Current view transform plus at most one running transition. Starting a
/// new transition cancels the running one from wherever it has got to.
#[derive(Clone, Debug)]
pub struct Camera {
	transform: ViewTransform,
	tween: Option<Tween>,
	width: f64,
	height: f64,
}

impl Camera {
	/// Camera at identity over a `width` x `height` viewport.
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			transform: ViewTransform::IDENTITY,
			tween: None,
			width,
			height,
		}
	}

	/// Transform as of the last [`Camera::advance`].
	pub fn transform(&self) -> ViewTransform {
		self.transform
	}

	/// Whether a tween is still running.
	pub fn is_animating(&self) -> bool {
		self.tween.is_some()
	}

	/// Record a new viewport size. The transform is left alone.
	pub fn set_viewport(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	/// Jump to `transform`, cancelling any transition. Used by direct
	/// pan and wheel input.
	pub fn set(&mut self, transform: ViewTransform) {
		self.tween = None;
		self.transform = ViewTransform {
			k: clamp_scale(transform.k),
			..transform
		};
	}

	/// Step the running transition to time `now_ms`.
	pub fn advance(&mut self, now_ms: f64) {
		let Some(tween) = self.tween else {
			return;
		};
		let t = if tween.duration_ms > 0.0 {
			((now_ms - tween.start_ms) / tween.duration_ms).clamp(0.0, 1.0)
		} else {
			1.0
		};
		self.transform = tween.from.lerp(&tween.to, ease_cubic_in_out(t));
		if t >= 1.0 {
			self.transform = tween.to;
			self.tween = None;
		}
	}

	/// Tween from the current transform to `to` over `duration_ms`, eased
	/// cubic in-out.
	pub fn animate_to(&mut self, to: ViewTransform, now_ms: f64, duration_ms: f64) {
		self.advance(now_ms);
		self.tween = Some(Tween {
			from: self.transform,
			to,
			start_ms: now_ms,
			duration_ms,
		});
	}

	/// Zoom by `factor` about the viewport centre.
	pub fn zoom_by(&mut self, factor: f64, now_ms: f64) {
		self.advance(now_ms);
		let to = self
			.transform
			.scaled_about(self.width / 2.0, self.height / 2.0, factor);
		self.animate_to(to, now_ms, ZOOM_DURATION_MS);
	}

	/// Animate so `bounds` fills the viewport. Does nothing for `None` or a
	/// degenerate box; returns whether a transition started.
	pub fn fit(&mut self, bounds: Option<Bounds>, now_ms: f64) -> bool {
		let Some(to) = bounds.and_then(|b| fit_transform(&b, self.width, self.height)) else {
			return false;
		};
		self.animate_to(to, now_ms, FIT_DURATION_MS);
		true
	}

	/// Animate back to identity.
	pub fn reset(&mut self, now_ms: f64) {
		self.animate_to(ViewTransform::IDENTITY, now_ms, FIT_DURATION_MS);
	}
}
