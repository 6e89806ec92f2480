//! Toroidal world metric
//!
//! The arena wraps at every edge, so the shortest path between two points may
//! cross a boundary. Every difference of two positions in the engine goes
//! through [`Torus::delta`] so force directions stay correct near the edges.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::wrap_scalar;

/// A wrap-around rectangle of fixed size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Torus {
    pub width: f32,
    pub height: f32,
}

impl Torus {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Representative of `to` closest to `from`, chosen per axis
    #[inline]
    pub fn nearest_image(&self, from: Vec2, to: Vec2) -> Vec2 {
        Vec2::new(
            nearest_on_axis(from.x, to.x, self.width),
            nearest_on_axis(from.y, to.y, self.height),
        )
    }

    /// Shortest vector from `from` to `to`
    #[inline]
    pub fn delta(&self, from: Vec2, to: Vec2) -> Vec2 {
        self.nearest_image(from, to) - from
    }

    /// Shortest distance between two points
    #[inline]
    pub fn distance(&self, a: Vec2, b: Vec2) -> f32 {
        self.delta(a, b).length()
    }

    /// Fold a position back into [0, width) x [0, height)
    #[inline]
    pub fn wrap(&self, pos: Vec2) -> Vec2 {
        Vec2::new(wrap_scalar(pos.x, self.width), wrap_scalar(pos.y, self.height))
    }
}

/// Pick `b`, `b - extent` or `b + extent`, whichever lies nearest `a`
#[inline]
fn nearest_on_axis(a: f32, b: f32, extent: f32) -> f32 {
    let direct = (b - a).abs();
    let below = b - extent;
    let above = b + extent;
    let wrapped = if (below - a).abs() < (above - a).abs() {
        below
    } else {
        above
    };
    if (wrapped - a).abs() < direct { wrapped } else { b }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const W: f32 = 1000.0;
    const H: f32 = 800.0;

    #[test]
    fn test_direct_path_when_close() {
        let torus = Torus::new(W, H);
        let d = torus.delta(Vec2::new(100.0, 100.0), Vec2::new(150.0, 130.0));
        assert_eq!(d, Vec2::new(50.0, 30.0));
    }

    #[test]
    fn test_wraps_across_edges() {
        let torus = Torus::new(W, H);
        let from = Vec2::new(990.0, 5.0);
        let to = Vec2::new(10.0, 795.0);
        assert_eq!(torus.nearest_image(from, to), Vec2::new(1010.0, -5.0));
        assert_eq!(torus.delta(from, to), Vec2::new(20.0, -10.0));
    }

    #[test]
    fn test_wrap_position() {
        let torus = Torus::new(W, H);
        assert_eq!(torus.wrap(Vec2::new(-10.0, 810.0)), Vec2::new(990.0, 10.0));
        assert_eq!(torus.wrap(Vec2::new(500.0, 400.0)), Vec2::new(500.0, 400.0));
    }

    proptest! {
        #[test]
        fn prop_metric_is_symmetric(
            ax in 0.0f32..W, ay in 0.0f32..H,
            bx in 0.0f32..W, by in 0.0f32..H,
        ) {
            let torus = Torus::new(W, H);
            let a = Vec2::new(ax, ay);
            let b = Vec2::new(bx, by);
            let ab = torus.distance(a, b);
            let ba = torus.distance(b, a);
            prop_assert!((ab - ba).abs() < 1e-3);
        }

        #[test]
        fn prop_never_longer_than_direct_or_half_extent(
            ax in 0.0f32..W, ay in 0.0f32..H,
            bx in 0.0f32..W, by in 0.0f32..H,
        ) {
            let torus = Torus::new(W, H);
            let a = Vec2::new(ax, ay);
            let b = Vec2::new(bx, by);
            let d = torus.delta(a, b);
            prop_assert!(d.x.abs() <= W / 2.0 + 1e-3);
            prop_assert!(d.y.abs() <= H / 2.0 + 1e-3);
            prop_assert!(d.length() <= (b - a).length() + 1e-3);
        }
    }
}
