use crate::error::{AnimError, Result};
use glam::Vec2;
use kurbo::{BezPath, Point};

/// A shape outline: vertices with in/out tangents relative to each vertex.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShapePath {
    pub closed: bool,
    pub vertices: Vec<Vec2>,
    pub in_tangents: Vec<Vec2>,
    pub out_tangents: Vec<Vec2>,
}

impl ShapePath {
    /// Builds a path, padding missing tangents with zero so every vertex has
    /// both.
    pub fn new(
        closed: bool,
        vertices: Vec<Vec2>,
        mut in_tangents: Vec<Vec2>,
        mut out_tangents: Vec<Vec2>,
    ) -> Self {
        in_tangents.resize(vertices.len(), Vec2::ZERO);
        out_tangents.resize(vertices.len(), Vec2::ZERO);
        Self {
            closed,
            vertices,
            in_tangents,
            out_tangents,
        }
    }

    /// Straight-edged polygon through `vertices`.
    pub fn polygon(vertices: Vec<Vec2>, closed: bool) -> Self {
        Self::new(closed, vertices, Vec::new(), Vec::new())
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Pairwise interpolation of vertices and tangents.
    ///
    /// Both outlines must have the same vertex count; the result is closed if
    /// either endpoint is.
    pub fn lerp(&self, other: &Self, t: f32) -> Result<Self> {
        if self.len() != other.len() {
            return Err(AnimError::ShapeMismatch {
                start: self.len(),
                end: other.len(),
            });
        }
        if t <= 0.0 {
            return Ok(self.clone());
        }
        if t >= 1.0 {
            return Ok(other.clone());
        }

        let pairwise = |a: &[Vec2], b: &[Vec2]| -> Vec<Vec2> {
            a.iter().zip(b).map(|(a, b)| a.lerp(*b, t)).collect()
        };

        Ok(Self {
            closed: self.closed || other.closed,
            vertices: pairwise(&self.vertices[..], &other.vertices[..]),
            in_tangents: pairwise(&self.in_tangents[..], &other.in_tangents[..]),
            out_tangents: pairwise(&self.out_tangents[..], &other.out_tangents[..]),
        })
    }

    /// Converts to absolute cubic segments for drawing.
    pub fn to_bez_path(&self) -> BezPath {
        let mut bp = BezPath::new();
        let Some(start) = self.vertices.first() else {
            return bp;
        };
        let point = |v: Vec2| Point::new(v.x as f64, v.y as f64);

        bp.move_to(point(*start));
        let count = self.vertices.len();
        for i in 0..count {
            let next = (i + 1) % count;
            if next == 0 && !self.closed {
                break;
            }
            let p0 = self.vertices[i];
            let p1 = self.vertices[next];
            let out = self.out_tangents.get(i).copied().unwrap_or(Vec2::ZERO);
            let in_ = self.in_tangents.get(next).copied().unwrap_or(Vec2::ZERO);
            bp.curve_to(point(p0 + out), point(p1 + in_), point(p1));
        }
        if self.closed {
            bp.close_path();
        }
        bp
    }
}
