use glam::{Vec2, vec2};

use crate::{
    renderer::View,
    world::{Camera, Wall},
};

/// Depths are clamped to this before dividing.
pub const DEPTH_EPSILON: f32 = 0.001;

/// Segment/ray pairs whose cross product is smaller than this are parallel.
const PARALLEL_EPSILON: f32 = 1e-4;

/// A wall after camera transform, FOV clipping and screen-x projection.
///
/// `p_l` / `p_r` are the clipped camera-space endpoints (depth already
/// clamped), `x_l` / `x_r` their screen columns, `u_l` / `u_r` the texture
/// columns at each endpoint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    pub x_l: i32,
    pub x_r: i32,
    pub p_l: Vec2,
    pub p_r: Vec2,
    pub u_l: f32,
    pub u_r: f32,
}

/// Why a wall produced no [`Edge`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Culled {
    /// Both endpoints at or behind the camera plane.
    Behind,
    /// Camera is on the outer side of the wall.
    BackFacing,
}

/// Camera-space endpoints after clipping against the FOV rays, with the
/// fraction of the original wall at which each endpoint now sits.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Clipped {
    pub p0: Vec2,
    pub p1: Vec2,
    pub t0: f32,
    pub t1: f32,
}

pub fn project_wall(
    wall: &Wall,
    cam: &Camera,
    view: &View,
    tex_w: usize,
) -> Result<Edge, Culled> {
    // World endpoints → camera space
    let p0 = cam.to_cam(wall.p0);
    let p1 = cam.to_cam(wall.p1);
    if p0.y <= 0.0 && p1.y <= 0.0 {
        return Err(Culled::Behind);
    }
    if !wall.faces(cam.pos) {
        return Err(Culled::BackFacing);
    }

    let Clipped {
        mut p0,
        mut p1,
        t0,
        t1,
    } = clip_to_fov(p0, p1, view.tan_half_fov);

    // texture columns follow the clip so walls slide into view smoothly
    let u_max = tex_w.saturating_sub(1) as f32;
    let (u_l, u_r) = (t0 * u_max, t1 * u_max);

    p0.y = p0.y.max(DEPTH_EPSILON);
    p1.y = p1.y.max(DEPTH_EPSILON);

    Ok(Edge {
        x_l: project_x(p0, view),
        x_r: project_x(p1, view),
        p_l: p0,
        p_r: p1,
        u_l,
        u_r,
    })
}

/// Replace endpoints lying beyond the left/right FOV rays with the
/// intersection point. `p0` is the left end of a front-facing wall.
pub fn clip_to_fov(p0: Vec2, p1: Vec2, tan_half_fov: f32) -> Clipped {
    let len = p0.distance(p1);
    let mut out = Clipped {
        p0,
        p1,
        t0: 0.0,
        t1: 1.0,
    };
    if len <= 0.0 {
        return out;
    }
    if let Some(hit) = ray_hit(p0, p1, vec2(-tan_half_fov, 1.0)) {
        out.p0 = hit;
        out.t0 = p0.distance(hit) / len;
    }
    if let Some(hit) = ray_hit(p0, p1, vec2(tan_half_fov, 1.0)) {
        out.p1 = hit;
        out.t1 = p0.distance(hit) / len;
    }
    out
}

/// Intersection of segment `a → b` with the ray from the origin along `dir`.
fn ray_hit(a: Vec2, b: Vec2, dir: Vec2) -> Option<Vec2> {
    let e = b - a;
    let denom = e.perp_dot(dir);
    if denom.abs() < PARALLEL_EPSILON {
        return None;
    }
    let t = -a.perp_dot(dir) / denom;
    let s = -a.perp_dot(e) / denom;
    ((0.0..=1.0).contains(&t) && s >= 0.0).then(|| a + e * t)
}

/// `column = x / depth * focal + width / 2`, truncated.
#[inline]
pub fn project_x(p: Vec2, view: &View) -> i32 {
    (p.x / p.y * view.focal + view.half_w) as i32
}

/// Screen row of a point `dz` above the eye at camera depth `depth`.
#[inline]
pub fn project_row(dz: f32, depth: f32, view: &View) -> f32 {
    view.half_h - dz / depth * view.focal
}

impl Edge {
    /// Rows of a horizontal edge at height `dz` above the eye, at the left
    /// and right endpoints.
    #[inline]
    pub fn rows(&self, dz: f32, view: &View) -> (f32, f32) {
        (
            project_row(dz, self.p_l.y, view),
            project_row(dz, self.p_r.y, view),
        )
    }

    /// Fraction of the projected span at column `x`.
    #[inline]
    pub fn t_at(&self, x: i32) -> f32 {
        if self.x_r == self.x_l {
            0.0
        } else {
            // float maths: near-plane spans can sit at the ends of the i32 range
            (x as f32 - self.x_l as f32) / (self.x_r as f32 - self.x_l as f32)
        }
    }

    /// Perspective-correct texture column at fraction `t`.
    #[inline]
    pub fn u_at(&self, t: f32) -> f32 {
        let (z0, z1) = (self.p_l.y, self.p_r.y);
        ((1.0 - t) * (self.u_l / z0) + t * (self.u_r / z1)) / ((1.0 - t) / z0 + t / z1)
    }
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::RenderConfig;

    fn view() -> View {
        View::from(&RenderConfig::default())
    }

    fn wall(a: Vec2, b: Vec2) -> Wall {
        Wall {
            p0: a,
            p1: b,
            portal: None,
        }
    }

    #[test]
    fn head_on_wall_projects_symmetric() {
        // east wall of a 4×4 room, camera at (1,2) facing +X
        let cam = Camera::new(vec2(1.0, 2.0), 0.0, 1.5);
        let edge = project_wall(&wall(vec2(4.0, 4.0), vec2(4.0, 0.0)), &cam, &view(), 64)
            .expect("visible");
        assert_eq!((edge.x_l, edge.x_r), (66, 333));
        assert_eq!((edge.u_l, edge.u_r), (0.0, 63.0));
        let (top_l, top_r) = edge.rows(3.0 - 1.5, &view());
        assert_eq!((top_l, top_r), (50.0, 50.0));
        let (bot_l, _) = edge.rows(0.0 - 1.5, &view());
        assert_eq!(bot_l, 250.0);
    }

    #[test]
    fn wall_behind_camera_is_culled() {
        let cam = Camera::new(vec2(1.0, 2.0), 180.0, 1.5);
        let res = project_wall(&wall(vec2(4.0, 4.0), vec2(4.0, 0.0)), &cam, &view(), 64);
        assert_eq!(res, Err(Culled::Behind));
    }

    #[test]
    fn wall_seen_from_outside_is_back_facing() {
        // same wall walked the other way: camera is on its outer side
        let cam = Camera::new(vec2(1.0, 2.0), 0.0, 1.5);
        let res = project_wall(&wall(vec2(4.0, 0.0), vec2(4.0, 4.0)), &cam, &view(), 64);
        assert_eq!(res, Err(Culled::BackFacing));
    }

    #[test]
    fn partially_visible_wall_clips_on_left_ray() {
        // north wall from behind-left of the camera to front-left
        let c = clip_to_fov(vec2(-2.0, -1.0), vec2(-2.0, 3.0), 1.0);
        assert!((c.p0 - vec2(-2.0, 2.0)).length() < 1e-5);
        assert!((c.t0 - 0.75).abs() < 1e-5);
        assert_eq!((c.p1, c.t1), (vec2(-2.0, 3.0), 1.0));
    }

    #[test]
    fn wide_wall_clips_both_ends_and_texture() {
        let c = clip_to_fov(vec2(-10.0, 2.0), vec2(10.0, 2.0), 1.0);
        assert!((c.p0 - vec2(-2.0, 2.0)).length() < 1e-5);
        assert!((c.p1 - vec2(2.0, 2.0)).length() < 1e-5);
        assert!((c.t0 - 0.4).abs() < 1e-5);
        assert!((c.t1 - 0.6).abs() < 1e-5);

        let cam = Camera::new(Vec2::ZERO, 90.0, 0.0);
        // facing +Y, world x runs left to right across the screen
        let edge = project_wall(&wall(vec2(-10.0, 2.0), vec2(10.0, 2.0)), &cam, &view(), 101)
            .expect("visible");
        assert!((edge.u_l - 40.0).abs() < 1e-3);
        assert!((edge.u_r - 60.0).abs() < 1e-3);
        assert!(edge.x_l <= 1 && edge.x_r >= 399);
    }

    #[test]
    fn parallel_and_missed_rays_leave_wall_alone() {
        // parallel to the left ray
        let c = clip_to_fov(vec2(-1.0, 3.0), vec2(-2.0, 4.0), 1.0);
        assert_eq!((c.t0, c.t1), (0.0, 1.0));
        // wholly inside the view
        let c = clip_to_fov(vec2(-1.0, 5.0), vec2(1.0, 5.0), 1.0);
        assert_eq!((c.p0, c.p1), (vec2(-1.0, 5.0), vec2(1.0, 5.0)));
    }

    #[test]
    fn depth_is_clamped_away_from_zero() {
        // wall ending exactly on the camera plane
        let cam = Camera::new(Vec2::ZERO, 0.0, 0.0);
        let edge = project_wall(&wall(vec2(0.0, 3.0), vec2(3.0, 3.0)), &cam, &view(), 8);
        // (0,3) sits on the camera plane; clipping pulls it onto the left ray
        let edge = edge.expect("front end is visible");
        assert!(edge.p_l.y >= DEPTH_EPSILON && edge.p_r.y >= DEPTH_EPSILON);
    }

    #[test]
    fn perspective_u_hits_endpoints_and_bends_toward_near_end() {
        let edge = Edge {
            x_l: 0,
            x_r: 10,
            p_l: vec2(-1.0, 1.0),
            p_r: vec2(1.0, 4.0),
            u_l: 0.0,
            u_r: 100.0,
        };
        assert!(edge.u_at(0.0).abs() < 1e-4);
        assert!((edge.u_at(1.0) - 100.0).abs() < 1e-3);
        // near end is stretched on screen, so mid-screen is well short of 50
        assert!(edge.u_at(0.5) < 30.0);
        assert_eq!(edge.t_at(5), 0.5);
        let point = Edge { x_r: 0, ..edge };
        assert_eq!(point.t_at(0), 0.0);
    }
}
