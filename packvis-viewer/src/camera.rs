//! Camera utilities for the viewer

use nalgebra::{Matrix4, Perspective3, UnitQuaternion};
use packvis_core::{Point3f, Vector3f, BIN_SIZE};

/// Minimum polar clearance from the up axis, keeping the orbit off the poles.
const POLE_MARGIN: f32 = 0.05;

/// An orbiting perspective camera with +Z up, the axis convention the
/// packing volume is laid out in.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3f,
    pub target: Point3f,
    pub up: Vector3f,
    /// Vertical field of view, radians.
    pub fov: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(
        position: Point3f,
        target: Point3f,
        up: Vector3f,
        fov: f32,
        aspect_ratio: f32,
        near: f32,
        far: f32,
    ) -> Self {
        Self {
            position,
            target,
            up,
            fov,
            aspect_ratio,
            near,
            far,
        }
    }

    /// Get the view matrix
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Get the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        let perspective = Perspective3::new(self.aspect_ratio, self.fov, self.near, self.far);
        perspective.into_inner()
    }

    /// Rotate the eye around the target on the up axis (yaw) and toward or
    /// away from it (pitch), at constant radius.
    pub fn orbit(&mut self, delta_yaw: f32, delta_pitch: f32) {
        let offset = self.position - self.target;
        let radius = offset.norm();
        if radius <= f32::EPSILON {
            return;
        }
        let mut yaw = offset.y.atan2(offset.x);
        let mut pitch = (offset.z / radius).clamp(-1.0, 1.0).acos();
        yaw -= delta_yaw;
        pitch = (pitch - delta_pitch).clamp(POLE_MARGIN, std::f32::consts::PI - POLE_MARGIN);
        let direction = Vector3f::new(
            yaw.cos() * pitch.sin(),
            yaw.sin() * pitch.sin(),
            pitch.cos(),
        );
        self.position = self.target + direction * radius;
    }

    /// Slide the eye and target together in the view plane.
    pub fn pan(&mut self, delta_x: f32, delta_y: f32) {
        let forward = (self.target - self.position).normalize();
        let right = forward.cross(&self.up).normalize();
        let lifted = right.cross(&forward);
        let translation = right * -delta_x + lifted * delta_y;
        self.position += translation;
        self.target += translation;
    }

    /// Move the eye toward the target; negative amounts back away. The eye
    /// never crosses the target.
    pub fn zoom(&mut self, amount: f32) {
        let offset = self.target - self.position;
        let distance = offset.norm();
        let step = (distance * amount).min(distance - self.near);
        self.position += offset.normalize() * step;
    }

    /// Quaternion turning the canonical -Z view forward onto this camera's
    /// forward axis; handy for debugging and tests.
    pub fn orientation(&self) -> UnitQuaternion<f32> {
        let forward = (self.target - self.position).normalize();
        UnitQuaternion::rotation_between(&-Vector3f::z(), &forward)
            .unwrap_or_else(UnitQuaternion::identity)
    }

    /// Reset to the default pose beside and above the bin.
    pub fn reset(&mut self) {
        let aspect_ratio = self.aspect_ratio;
        *self = Self::default();
        self.aspect_ratio = aspect_ratio;
    }
}

impl Default for Camera {
    /// Eye beside and above the bin, looking at its center with +Z up.
    fn default() -> Self {
        Self::new(
            Point3f::new(BIN_SIZE * 0.5, -BIN_SIZE * 1.2, BIN_SIZE * 1.5),
            Point3f::new(BIN_SIZE / 2.0, BIN_SIZE / 2.0, BIN_SIZE / 2.0),
            Vector3f::new(0.0, 0.0, 1.0),
            60f32.to_radians(),
            16.0 / 9.0,
            0.1,
            1000.0,
        )
    }
}
