//! Collision math for circular bodies on a torus
//!
//! Bodies are extrapolated one frame along their velocity before testing, so a
//! pair only collides while it is still closing. Overlapping bodies that are
//! already separating are left alone instead of re-bouncing every frame.

use glam::Vec2;

use super::torus::Torus;

/// Separation of a pair now and one frame ahead
#[derive(Debug, Clone, Copy)]
pub struct Approach {
    /// Projected separation vector (first to second)
    pub delta: Vec2,
    /// Projected distance (r1)
    pub projected: f32,
    /// Current distance (r2)
    pub current: f32,
}

impl Approach {
    /// Measure two bodies, using the second body's nearest image
    pub fn measure(
        torus: &Torus,
        pos_a: Vec2,
        vel_a: Vec2,
        pos_b: Vec2,
        vel_b: Vec2,
        dt: f32,
    ) -> Self {
        let now = torus.delta(pos_a, pos_b);
        let next_a = pos_a + vel_a * dt;
        let next_b = torus.nearest_image(next_a, pos_b + vel_b * dt);
        let delta = next_b - next_a;
        Self {
            delta,
            projected: delta.length(),
            current: now.length(),
        }
    }

    /// Overlapping one frame ahead while still getting closer
    #[inline]
    pub fn collides(&self, reach: f32) -> bool {
        self.projected < reach && self.projected < self.current
    }

    /// Unit vector from the first body toward the second
    #[inline]
    pub fn normal(&self) -> Vec2 {
        self.delta.normalize_or_zero()
    }
}

/// Velocity changes of a 1-D elastic exchange along `normal`
///
/// Returns `(dv_a, dv_b)`; momentum `m_a * dv_a + m_b * dv_b` is zero.
pub fn elastic_impulse(
    vel_a: Vec2,
    mass_a: f32,
    vel_b: Vec2,
    mass_b: f32,
    normal: Vec2,
) -> (Vec2, Vec2) {
    let total = mass_a + mass_b;
    if total <= 0.0 || normal == Vec2::ZERO {
        return (Vec2::ZERO, Vec2::ZERO);
    }
    let closing = (vel_a - vel_b).dot(normal);
    let dv_a = -normal * (2.0 * mass_b / total) * closing;
    let dv_b = normal * (2.0 * mass_a / total) * closing;
    (dv_a, dv_b)
}

/// Radial field push split between two bodies
///
/// `strength` is already signed: positive pushes apart, negative pulls
/// together. Each body moves by the other's share of the total mass.
/// Returns `(dv_a, dv_b)` along `normal` (first to second).
pub fn field_impulse(strength: f32, mass_a: f32, mass_b: f32, normal: Vec2) -> (Vec2, Vec2) {
    let total = mass_a + mass_b;
    if total <= 0.0 {
        return (Vec2::ZERO, Vec2::ZERO);
    }
    let share_a = mass_b / total;
    let share_b = mass_a / total;
    (-normal * strength * share_a, normal * strength * share_b)
}

/// Size-weighted blend of two positions/velocities (second given as nearest image)
#[inline]
pub fn weighted_blend(a: Vec2, weight_a: f32, b: Vec2, weight_b: f32) -> Vec2 {
    (a * weight_a + b * weight_b) / (weight_a + weight_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_head_on_closing_collides() {
        let torus = Torus::new(1000.0, 1000.0);
        let a = Approach::measure(
            &torus,
            Vec2::new(100.0, 100.0),
            Vec2::new(50.0, 0.0),
            Vec2::new(120.0, 100.0),
            Vec2::new(-50.0, 0.0),
            0.02,
        );
        assert!((a.projected - 18.0).abs() < 1e-4);
        assert!((a.current - 20.0).abs() < 1e-4);
        assert!(a.collides(32.0));
        assert_eq!(a.normal(), Vec2::X);
    }

    #[test]
    fn test_receding_overlap_does_not_collide() {
        let torus = Torus::new(1000.0, 1000.0);
        let a = Approach::measure(
            &torus,
            Vec2::new(100.0, 100.0),
            Vec2::new(-50.0, 0.0),
            Vec2::new(120.0, 100.0),
            Vec2::new(50.0, 0.0),
            0.02,
        );
        assert!(a.projected < 32.0);
        assert!(!a.collides(32.0));
    }

    #[test]
    fn test_collides_across_world_edge() {
        let torus = Torus::new(1000.0, 1000.0);
        let a = Approach::measure(
            &torus,
            Vec2::new(995.0, 500.0),
            Vec2::new(50.0, 0.0),
            Vec2::new(8.0, 500.0),
            Vec2::new(-50.0, 0.0),
            0.02,
        );
        assert!((a.current - 13.0).abs() < 1e-3);
        assert!(a.collides(20.0));
        assert!(a.normal().x > 0.99);
    }

    #[test]
    fn test_equal_mass_swap() {
        let (dv_a, dv_b) = elastic_impulse(
            Vec2::new(50.0, 10.0),
            1000.0,
            Vec2::new(-50.0, -5.0),
            1000.0,
            Vec2::X,
        );
        let va = Vec2::new(50.0, 10.0) + dv_a;
        let vb = Vec2::new(-50.0, -5.0) + dv_b;
        // Components along the normal swap, tangential ones stay
        assert!((va - Vec2::new(-50.0, 10.0)).length() < 1e-4);
        assert!((vb - Vec2::new(50.0, -5.0)).length() < 1e-4);
    }

    #[test]
    fn test_field_impulse_sign_and_split() {
        let (dv_a, dv_b) = field_impulse(10.0, 100.0, 300.0, Vec2::X);
        assert_eq!(dv_a, Vec2::new(-7.5, 0.0));
        assert_eq!(dv_b, Vec2::new(2.5, 0.0));
        let (dv_a, _) = field_impulse(-10.0, 100.0, 300.0, Vec2::X);
        assert!(dv_a.x > 0.0);
    }

    proptest! {
        #[test]
        fn prop_elastic_conserves_momentum(
            m1 in 1.0f32..5000.0, m2 in 1.0f32..5000.0,
            v1x in -300.0f32..300.0, v1y in -300.0f32..300.0,
            v2x in -300.0f32..300.0, v2y in -300.0f32..300.0,
            theta in 0.0f32..std::f32::consts::TAU,
        ) {
            let n = Vec2::new(theta.cos(), theta.sin());
            let v1 = Vec2::new(v1x, v1y);
            let v2 = Vec2::new(v2x, v2y);
            let (dv1, dv2) = elastic_impulse(v1, m1, v2, m2, n);
            let before = v1 * m1 + v2 * m2;
            let after = (v1 + dv1) * m1 + (v2 + dv2) * m2;
            let scale = before.length().max(m1 * 300.0 + m2 * 300.0);
            prop_assert!((before - after).length() <= scale * 1e-4);
        }

        #[test]
        fn prop_elastic_conserves_energy(
            m1 in 1.0f32..5000.0, m2 in 1.0f32..5000.0,
            v1x in -300.0f32..300.0, v2x in -300.0f32..300.0,
        ) {
            let v1 = Vec2::new(v1x, 0.0);
            let v2 = Vec2::new(v2x, 0.0);
            let (dv1, dv2) = elastic_impulse(v1, m1, v2, m2, Vec2::X);
            let ke = |a: Vec2, b: Vec2| {
                0.5 * m1 * a.length_squared() + 0.5 * m2 * b.length_squared()
            };
            let before = ke(v1, v2);
            let after = ke(v1 + dv1, v2 + dv2);
            prop_assert!((before - after).abs() <= before.max(1.0) * 1e-3);
        }
    }
}
