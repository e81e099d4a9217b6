//! Matrix builders for rigid-body orientation and placement
use nalgebra::{Matrix4, Vector3};

/// Orientation as three independent angles (in radians).
///
/// `bank` turns about the local Z axis, `heading` about Y and `pitch` about X.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Orientation {
    pub bank: f32,
    pub heading: f32,
    pub pitch: f32,
}

impl Orientation {
    pub fn new(bank: f32, heading: f32, pitch: f32) -> Self {
        Self {
            bank,
            heading,
            pitch,
        }
    }

    pub fn zero() -> Self {
        Self::default()
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    pub fn bank_matrix(angle: f32) -> Matrix4<f32> {
        Matrix4::from_axis_angle(&Vector3::z_axis(), angle)
    }

    pub fn heading_matrix(angle: f32) -> Matrix4<f32> {
        Matrix4::from_axis_angle(&Vector3::y_axis(), angle)
    }

    pub fn pitch_matrix(angle: f32) -> Matrix4<f32> {
        Matrix4::from_axis_angle(&Vector3::x_axis(), angle)
    }

    /// Create a rotation matrix from an orientation.
    ///
    /// Bank is applied first, then heading, then pitch:
    /// `R = R_pitch * R_heading * R_bank`. The order is fixed; swapping it
    /// changes how the nacelles swing.
    pub fn rotation_matrix(orientation: &Orientation) -> Matrix4<f32> {
        Self::pitch_matrix(orientation.pitch)
            * Self::heading_matrix(orientation.heading)
            * Self::bank_matrix(orientation.bank)
    }

    /// Create a translation matrix
    pub fn translation_matrix(offset: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new_translation(offset)
    }

    /// Create a uniform scale matrix
    pub fn scale_matrix(scale: f32) -> Matrix4<f32> {
        Matrix4::new_scaling(scale)
    }

    /// Create a model-view-projection matrix
    pub fn mvp_matrix(
        model: &Matrix4<f32>,
        view: &Matrix4<f32>,
        projection: &Matrix4<f32>,
    ) -> Matrix4<f32> {
        projection * view * model
    }
}
