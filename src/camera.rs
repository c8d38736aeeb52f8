//! Camera, projection and the view/projection uniform.
//!
//! The camera is positioned in world space with a yaw/pitch orientation and
//! produces the view matrix; [`Projection`] produces the perspective matrix
//! including the GL-to-wgpu depth range correction. [`Camera::cast_ray_from_mouse`]
//! unprojects the cursor position into a world-space [`Ray`] for picking.

use cgmath::{InnerSpace, Matrix4, Point3, Rad, Vector3, perspective};
use winit::dpi::PhysicalPosition;

use crate::pick::Ray;

/// wgpu clip space uses a 0..1 depth range while cgmath produces OpenGL-style
/// -1..1 matrices, so every projection gets multiplied by this correction.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// A free camera described by a position and yaw/pitch angles.
///
/// Yaw of -90° looks down the negative Z axis, which is where all demos place
/// their objects.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub position: Point3<f32>,
    pub yaw: Rad<f32>,
    pub pitch: Rad<f32>,
}

impl Camera {
    pub fn new<V: Into<Point3<f32>>, Y: Into<Rad<f32>>, P: Into<Rad<f32>>>(
        position: V,
        yaw: Y,
        pitch: P,
    ) -> Self {
        Self {
            position: position.into(),
            yaw: yaw.into(),
            pitch: pitch.into(),
        }
    }

    /// The unit vector the camera looks along.
    pub fn forward(&self) -> Vector3<f32> {
        let (sin_yaw, cos_yaw) = self.yaw.0.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.0.sin_cos();
        Vector3::new(cos_yaw * cos_pitch, sin_pitch, sin_yaw * cos_pitch).normalize()
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_to_rh(self.position, self.forward(), Vector3::unit_y())
    }

    /// Cast a ray from the camera through the mouse cursor.
    ///
    /// `mouse` is in window coordinates (origin top-left, as reported by winit's
    /// `CursorMoved`), `width` and `height` are the current surface size. The
    /// returned ray starts at the camera position and points through the pixel
    /// under the cursor.
    pub fn cast_ray_from_mouse(
        &self,
        mouse: PhysicalPosition<f64>,
        width: f32,
        height: f32,
        projection: &Projection,
    ) -> Ray {
        // Window coordinates -> normalized device coordinates (y flipped).
        let ndc_x = (2.0 * mouse.x as f32 / width) - 1.0;
        let ndc_y = 1.0 - (2.0 * mouse.y as f32 / height);

        let forward = self.forward();
        let right = forward.cross(Vector3::unit_y()).normalize();
        let up = right.cross(forward);

        let tan_half_fovy = (projection.fovy.0 / 2.0).tan();
        let direction = (forward
            + right * (ndc_x * tan_half_fovy * projection.aspect)
            + up * (ndc_y * tan_half_fovy))
            .normalize();

        Ray {
            origin: self.position,
            direction,
        }
    }
}

/// Perspective projection parameters, kept separate from the camera so that
/// resizing only touches the aspect ratio.
#[derive(Clone, Copy, Debug)]
pub struct Projection {
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height as f32;
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

/// The camera data as it is laid out in GPU memory.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        use cgmath::SquareMatrix;
        Self {
            view_proj: Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &Camera, projection: &Projection) {
        self.view_proj = (projection.calc_matrix() * camera.calc_matrix()).into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

/// Camera plus the GPU resources derived from it.
#[derive(Debug)]
pub struct CameraResources {
    pub camera: Camera,
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}
