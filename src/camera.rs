//! Camera pose, viewport mapping and the view-locked vertical drag.
//!
//! The camera is always an explicit parameter; the engine never holds
//! ambient camera state. Viewport coordinates run (0,0) bottom-left to
//! (1,1) top-right, depth is measured along the view direction in meters.

use glam::{DMat3, DQuat, DVec3};

/// A world point projected into normalized viewport coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportPoint {
    pub x: f64,
    pub y: f64,
    /// Distance along the view direction. Negative for points behind the
    /// camera, in which case x/y are mirrored.
    pub depth: f64,
}

/// Perspective camera pose and intrinsics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: DVec3,
    pub rotation: DQuat,
    /// Vertical field of view in radians
    pub fov_y: f64,
    /// Viewport width over height
    pub aspect: f64,
}

impl Camera {
    pub fn new(position: DVec3, rotation: DQuat, fov_y: f64, aspect: f64) -> Camera {
        Camera {
            position,
            rotation,
            fov_y,
            aspect,
        }
    }

    /// Camera at `position` aimed at `target`, world-up preferred.
    ///
    /// Falls back to +X as the right axis when aiming straight up or down.
    pub fn looking_at(position: DVec3, target: DVec3, fov_y: f64, aspect: f64) -> Camera {
        let forward = (target - position).normalize_or(-DVec3::Z);
        let right = forward.cross(DVec3::Y).normalize_or(DVec3::X);
        let up = right.cross(forward);
        let rotation = DQuat::from_mat3(&DMat3::from_cols(right, up, -forward));
        Camera::new(position, rotation, fov_y, aspect)
    }

    /// The direction the camera looks along
    #[inline]
    pub fn forward(&self) -> DVec3 {
        self.rotation * -DVec3::Z
    }

    fn tan_half_fov(&self) -> f64 {
        (self.fov_y / 2.0).tan()
    }

    /// Project a world point into the viewport
    pub fn world_to_viewport(&self, point: DVec3) -> ViewportPoint {
        let view = self.rotation.inverse() * (point - self.position);
        let depth = -view.z;
        let spread = 2.0 * depth * self.tan_half_fov();
        ViewportPoint {
            x: 0.5 + view.x / (spread * self.aspect),
            y: 0.5 + view.y / spread,
            depth,
        }
    }

    /// Unproject a viewport coordinate back to the world at the given depth
    pub fn viewport_to_world(&self, x: f64, y: f64, depth: f64) -> DVec3 {
        let spread = 2.0 * depth * self.tan_half_fov();
        let view = DVec3::new(
            (x - 0.5) * spread * self.aspect,
            (y - 0.5) * spread,
            -depth,
        );
        self.position + self.rotation * view
    }

    /// The ray from the camera through a viewport coordinate
    pub fn viewport_ray(&self, x: f64, y: f64) -> Ray {
        let tan_half = self.tan_half_fov();
        let view = DVec3::new(
            (x - 0.5) * 2.0 * tan_half * self.aspect,
            (y - 0.5) * 2.0 * tan_half,
            -1.0,
        );
        Ray {
            origin: self.position,
            direction: (self.rotation * view).normalize(),
        }
    }

    /// The ray through the center of the view (the AR reticle)
    pub fn center_ray(&self) -> Ray {
        self.viewport_ray(0.5, 0.5)
    }
}

/// A ray in world space with a normalized direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: DVec3,
    pub direction: DVec3,
}

impl Ray {
    /// Intersection with the horizontal plane at `plane_y`.
    ///
    /// `None` when the ray runs parallel to the plane or points away from it.
    pub fn hit_horizontal_plane(&self, plane_y: f64) -> Option<DVec3> {
        if self.direction.y.abs() < 1e-12 {
            return None;
        }
        let t = (plane_y - self.origin.y) / self.direction.y;
        if t <= 0.0 {
            return None;
        }
        Some(self.origin + self.direction * t)
    }
}

/// View-locked vertical drag of a single point.
///
/// At drag start the point's world position and its viewport row are
/// captured. Each update re-projects the current viewport column at the
/// captured row, at the point's current Euclidean distance from the camera,
/// and takes only the resulting y: the point stays pinned to its original
/// screen row while moving strictly vertically in the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalDrag {
    initial_world: DVec3,
    initial_viewport_y: f64,
}

impl VerticalDrag {
    /// Capture drag state for `point` under the current camera
    pub fn begin(camera: &Camera, point: DVec3) -> VerticalDrag {
        VerticalDrag {
            initial_world: point,
            initial_viewport_y: camera.world_to_viewport(point).y,
        }
    }

    /// Next world position for the dragged point under the current camera
    pub fn update(&self, camera: &Camera, current: DVec3) -> DVec3 {
        let distance = camera.position.distance(current);
        let viewport = camera.world_to_viewport(current);
        let lifted = camera.viewport_to_world(viewport.x, self.initial_viewport_y, distance);
        DVec3::new(self.initial_world.x, lifted.y, self.initial_world.z)
    }
}
