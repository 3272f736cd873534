use glam::Vec2;

const NEWTON_STEPS: usize = 8;
const BISECTION_STEPS: usize = 24;
const EPSILON: f32 = 1e-5;

/// Polynomial form `((a·t + b)·t + c)·t` of one axis of a unit cubic bezier
/// with inner control coordinates `p1` and `p2`.
#[derive(Clone, Copy)]
struct Axis {
    a: f32,
    b: f32,
    c: f32,
}

impl Axis {
    fn new(p1: f32, p2: f32) -> Self {
        let c = 3.0 * p1;
        let b = 3.0 * (p2 - p1) - c;
        Self { a: 1.0 - c - b, b, c }
    }

    fn at(self, t: f32) -> f32 {
        ((self.a * t + self.b) * t + self.c) * t
    }

    fn slope(self, t: f32) -> f32 {
        (3.0 * self.a * t + 2.0 * self.b) * t + self.c
    }
}

/// `y` of the unit cubic bezier `(0,0) p1 p2 (1,1)` at the point whose `x`
/// is `x`.
pub fn solve_cubic_bezier(p1: Vec2, p2: Vec2, x: f32) -> f32 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }
    let (cx, cy) = (Axis::new(p1.x, p2.x), Axis::new(p1.y, p2.y));
    cy.at(solve_parameter(cx, x))
}

/// Curve parameter at which `axis` reaches `x`: Newton first, bisection when
/// the slope flattens out.
fn solve_parameter(axis: Axis, x: f32) -> f32 {
    let mut t = x;
    for _ in 0..NEWTON_STEPS {
        let err = axis.at(t) - x;
        if err.abs() < EPSILON {
            return t;
        }
        let slope = axis.slope(t);
        if slope.abs() < 1e-6 {
            break;
        }
        t = (t - err / slope).clamp(0.0, 1.0);
    }

    let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
    t = x;
    for _ in 0..BISECTION_STEPS {
        let value = axis.at(t);
        if (value - x).abs() < EPSILON {
            break;
        }
        if value < x {
            lo = t;
        } else {
            hi = t;
        }
        t = (lo + hi) * 0.5;
    }
    t
}

/// Temporal easing of one keyframe segment: a unit cubic bezier from `(0,0)`
/// to `(1,1)` whose inner control points are `out_tangent` (leaving the start
/// value) and `in_tangent` (arriving at the end value).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicEasing {
    pub out_tangent: Vec2,
    pub in_tangent: Vec2,
}

impl CubicEasing {
    pub const LINEAR: CubicEasing = CubicEasing {
        out_tangent: Vec2::ZERO,
        in_tangent: Vec2::ONE,
    };

    pub fn new(out_tangent: Vec2, in_tangent: Vec2) -> Self {
        // Control point x must stay inside the unit interval for x(t) to be monotonic
        Self {
            out_tangent: Vec2::new(out_tangent.x.clamp(0.0, 1.0), out_tangent.y),
            in_tangent: Vec2::new(in_tangent.x.clamp(0.0, 1.0), in_tangent.y),
        }
    }

    /// Eased progress for a linear progress `t`, clamped into `[0, 1]`.
    ///
    /// Curves with control points outside the unit square overshoot; the
    /// overshoot is cut so every value type receives a well-formed factor.
    pub fn ease(&self, t: f32) -> f32 {
        solve_cubic_bezier(self.out_tangent, self.in_tangent, t).clamp(0.0, 1.0)
    }
}
