//! Camera and projection utilities
use crate::transform::Transform;
use nalgebra::{Matrix4, Point3, Vector3};
use std::f32::consts::FRAC_PI_2;

/// Pitch stays this far short of straight up/down so `look_at` stays defined
const PITCH_MARGIN: f32 = 0.01;

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionMode {
    Orthographic,
    Perspective,
}

/// Free-flying camera steered by yaw and pitch.
///
/// Yaw 0 and pitch 0 look down -Z with +Y up.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    yaw: f32,
    pitch: f32,
    pub up: Vector3<f32>,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub mode: ProjectionMode,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 5.0),
            yaw: 0.0,
            pitch: 0.0,
            up: Vector3::new(0.0, 1.0, 0.0),
            fov: std::f32::consts::PI / 4.0, // 45 degrees
            aspect: aspect_ratio(width, height),
            near: 0.1,
            far: 100.0,
            mode: ProjectionMode::Perspective,
        }
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = aspect_ratio(width, height);
    }

    /// Unit vector the camera looks along
    pub fn forward(&self) -> Vector3<f32> {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        Vector3::new(cos_pitch * sin_yaw, sin_pitch, -cos_pitch * cos_yaw)
    }

    /// Unit vector to the camera's right, kept horizontal
    pub fn right(&self) -> Vector3<f32> {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        Vector3::new(cos_yaw, 0.0, sin_yaw)
    }

    pub fn move_forward(&mut self, distance: f32) {
        self.position += self.forward() * distance;
    }

    pub fn strafe(&mut self, distance: f32) {
        self.position += self.right() * distance;
    }

    pub fn rise(&mut self, distance: f32) {
        self.position += self.up * distance;
    }

    /// Turn by the given yaw and pitch deltas (radians)
    pub fn turn(&mut self, yaw: f32, pitch: f32) {
        let limit = FRAC_PI_2 - PITCH_MARGIN;
        self.yaw += yaw;
        self.pitch = (self.pitch + pitch).clamp(-limit, limit);
    }

    /// Point the camera at `target`
    pub fn look_at(&mut self, target: &Point3<f32>) {
        let direction = target - self.position;
        let flat = direction.x.hypot(direction.z);
        if direction.norm() < 1e-6 {
            return;
        }
        self.yaw = direction.x.atan2(-direction.z);
        self.pitch = 0.0;
        self.turn(0.0, direction.y.atan2(flat));
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        let target = self.position + self.forward();
        Matrix4::look_at_rh(&self.position, &target, &self.up)
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        match self.mode {
            ProjectionMode::Perspective => {
                Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
            }
            ProjectionMode::Orthographic => {
                let height = self.position.coords.norm().max(1.0);
                let width = height * self.aspect;
                Matrix4::new_orthographic(
                    -width / 2.0,
                    width / 2.0,
                    -height / 2.0,
                    height / 2.0,
                    self.near,
                    self.far,
                )
            }
        }
    }

    /// Project a 3D point to 2D screen space.
    ///
    /// Returns `(x, y, depth)` with depth in normalized device units, or
    /// `None` when the point is behind the camera or outside the view volume.
    pub fn project_to_screen(
        &self,
        point: &Point3<f32>,
        model_matrix: &Matrix4<f32>,
        width: u32,
        height: u32,
    ) -> Option<(f32, f32, f32)> {
        let view = self.view_matrix();
        let projection = self.projection_matrix();
        let mvp = Transform::mvp_matrix(model_matrix, &view, &projection);
        Self::project_with(&mvp, point, width, height)
    }

    /// Same as [`Camera::project_to_screen`] with a precomputed MVP matrix
    pub fn project_with(
        mvp: &Matrix4<f32>,
        point: &Point3<f32>,
        width: u32,
        height: u32,
    ) -> Option<(f32, f32, f32)> {
        let clip = mvp * point.to_homogeneous();

        // Behind the camera or on its plane
        if clip.w <= 1e-6 {
            return None;
        }

        let ndc = clip.xyz() / clip.w;
        if ndc.iter().any(|c| !(-1.0..=1.0).contains(c)) {
            return None;
        }

        // Convert to screen space
        let screen_x = (ndc.x + 1.0) * 0.5 * width as f32;
        let screen_y = (1.0 - ndc.y) * 0.5 * height as f32;

        Some((screen_x, screen_y, ndc.z))
    }
}

/// Width over height, with both sides counted as at least one pixel
fn aspect_ratio(width: u32, height: u32) -> f32 {
    width.max(1) as f32 / height.max(1) as f32
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800, 600)
    }
}
