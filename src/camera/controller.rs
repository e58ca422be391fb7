use glam::{Quat, Vec2, Vec3};
use wgpu::util::DeviceExt;

use crate::camera::core::{Camera, CameraUniform};
use crate::gpu::render_context::RenderContext;
use crate::options::CameraOptions;

/// Orbit camera controller with its GPU uniform buffer and bind group.
///
/// The camera orbits a focus point at a fixed distance; rotation is stored
/// as a quaternion so there is no gimbal lock near the poles.
pub struct CameraController {
    orientation: Quat,
    distance: f32,
    focus_point: Vec3,

    /// The camera state derived from the orbit parameters.
    pub camera: Camera,
    /// CPU copy of the camera uniform.
    pub uniform: CameraUniform,
    /// GPU uniform buffer.
    pub buffer: wgpu::Buffer,
    /// Bind group layout for the camera uniform (group 0 in all pipelines).
    pub layout: wgpu::BindGroupLayout,
    /// Bind group for the camera uniform.
    pub bind_group: wgpu::BindGroup,

    rotate_speed: f32,
    pan_speed: f32,
    zoom_speed: f32,
}

impl CameraController {
    /// Create a controller looking down the Z axis at the origin.
    #[must_use]
    pub fn new(context: &RenderContext, options: &CameraOptions) -> Self {
        let focus_point = Vec3::ZERO;
        let distance = 30.0;
        let orientation = Quat::IDENTITY;

        let camera = Camera {
            eye: focus_point + Vec3::new(0.0, 0.0, distance),
            target: focus_point,
            up: Vec3::Y,
            aspect: context.config.width as f32 / context.config.height as f32,
            fovy: options.fovy,
            znear: options.znear,
            zfar: options.zfar,
        };

        let mut uniform = CameraUniform::new();
        uniform.update_view_proj(&camera);

        let buffer = context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Camera Buffer"),
                contents: bytemuck::cast_slice(&[uniform]),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            },
        );

        let layout = context.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX
                        | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            },
        );

        let bind_group =
            context
                .device
                .create_bind_group(&wgpu::BindGroupDescriptor {
                    layout: &layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: buffer.as_entire_binding(),
                    }],
                    label: Some("Camera Bind Group"),
                });

        Self {
            orientation,
            distance,
            focus_point,
            camera,
            uniform,
            buffer,
            layout,
            bind_group,
            rotate_speed: options.rotate_speed,
            pan_speed: options.pan_speed,
            zoom_speed: options.zoom_speed,
        }
    }

    fn update_camera_pos(&mut self) {
        let dir = self.orientation * Vec3::Z;

        self.camera.eye = self.focus_point + (dir * self.distance);
        self.camera.target = self.focus_point;
        self.camera.up = self.orientation * Vec3::Y;
    }

    /// Upload the current camera state to the GPU uniform buffer.
    pub fn update_gpu(&mut self, queue: &wgpu::Queue) {
        self.uniform.update_view_proj(&self.camera);
        queue.write_buffer(
            &self.buffer,
            0,
            bytemuck::cast_slice(&[self.uniform]),
        );
    }

    /// Update the aspect ratio after a window resize.
    pub fn resize(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.camera.aspect = width as f32 / height as f32;
        }
    }

    /// Rotate the orbit by a mouse drag delta in pixels.
    pub fn rotate(&mut self, delta: Vec2) {
        // Horizontal rotation around the camera's up vector
        let up = self.orientation * Vec3::Y;
        let horizontal =
            Quat::from_axis_angle(up, -delta.x * self.rotate_speed);
        self.orientation = horizontal * self.orientation;

        // Vertical rotation around the camera's right vector
        let right = self.orientation * Vec3::X;
        let vertical =
            Quat::from_axis_angle(right, -delta.y * self.rotate_speed);
        self.orientation = vertical * self.orientation;

        self.update_camera_pos();
    }

    /// Pan the focus point by a mouse drag delta in pixels.
    pub fn pan(&mut self, delta: Vec2) {
        let right = self.orientation * Vec3::X;
        let up = self.orientation * Vec3::Y;

        let translation = right * (-delta.x * self.pan_speed)
            + up * (delta.y * self.pan_speed);

        self.focus_point += translation;
        self.update_camera_pos();
    }

    /// Zoom by a scroll delta (positive zooms in).
    pub fn zoom(&mut self, delta: f32) {
        self.distance *= 1.0 - delta * self.zoom_speed;
        self.distance = self.distance.clamp(0.5, 500.0);
        self.update_camera_pos();
    }

    /// Adjust the orbit to frame the given positions, centering on their
    /// centroid and setting the distance so all points are visible.
    pub fn fit_to_positions(&mut self, positions: &[Vec3]) {
        if positions.is_empty() {
            return;
        }

        let centroid = positions.iter().copied().sum::<Vec3>()
            / positions.len() as f32;
        let radius = positions
            .iter()
            .map(|p| p.distance(centroid))
            .fold(0.0_f32, f32::max)
            .max(1.0);

        self.focus_point = centroid;
        // Back off far enough that the bounding sphere fits the view cone
        let half_fov = (self.camera.fovy * 0.5).to_radians();
        self.distance = radius / half_fov.tan() * 1.5;
        self.update_camera_pos();
    }
}
