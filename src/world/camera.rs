use glam::{Vec2, vec2};

/// Player view-point in world space.
///
/// * Only **yaw** is simulated, the view never tilts up/down.
/// * `eye_z` is an absolute height, usually floor + eye height.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub pos: Vec2,
    pub yaw: f32, // degrees (0 = +X, counter-clockwise)
    pub eye_z: f32,
}

impl Camera {
    pub fn new(pos: Vec2, yaw: f32, eye_z: f32) -> Self {
        Self { pos, yaw, eye_z }
    }

    /// Transform a world point into camera-local coords:
    ///  .x = lateral offset (+ right)
    ///  .y = depth along forward axis
    ///
    /// Always derived from the absolute pose, nothing is accumulated.
    #[inline]
    pub fn to_cam(&self, p: Vec2) -> Vec2 {
        let u = p - self.pos;
        let (s, c) = self.yaw.to_radians().sin_cos();
        vec2(s * u.x - c * u.y, c * u.x + s * u.y)
    }

    /// Inverse of [`Camera::to_cam`].
    #[inline]
    pub fn from_cam(&self, p: Vec2) -> Vec2 {
        let (s, c) = self.yaw.to_radians().sin_cos();
        vec2(s * p.x + c * p.y, -c * p.x + s * p.y) + self.pos
    }

    /*──────────────────────── derived vectors ───────────────────────*/

    /// Unit vector pointing where the camera looks on the X-Y plane.
    #[inline(always)]
    pub fn forward(&self) -> Vec2 {
        let (s, c) = self.yaw.to_radians().sin_cos();
        vec2(c, s)
    }

    /// Unit vector pointing to the camera's right on the X-Y plane.
    #[inline(always)]
    pub fn right(&self) -> Vec2 {
        -self.forward().perp()
    }

    /*──────────────────────── movement helpers ──────────────────────*/

    /// Move by `forward` units and `side` (strafe, + right).
    pub fn step(&mut self, forward: f32, side: f32) {
        self.pos += self.forward() * forward + self.right() * side;
    }

    /// Rotate around Z (positive = turn left), yaw kept in `[0, 360)`.
    pub fn turn(&mut self, delta_deg: f32) {
        self.yaw = (self.yaw + delta_deg).rem_euclid(360.0);
    }
}
