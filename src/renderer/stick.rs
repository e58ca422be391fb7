//! Renders segment bodies as thin cylinders.
//!
//! A unit cylinder mesh (radius 1, height 1, Y-axis aligned) is instanced
//! once per segment with a transform that stretches and orients it between
//! the two endpoints.

use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use crate::gpu::render_context::RenderContext;
use crate::gpu::texture::DEPTH_FORMAT;
use crate::scene::Scene;

/// World-space radius of the stick body.
const STICK_RADIUS: f32 = 0.05;
const RADIAL_SEGMENTS: usize = 16;

/// Vertex for the unit cylinder mesh.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct StickVertex {
    position: [f32; 3],
    normal: [f32; 3],
}

/// Per-instance data for stick rendering.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct StickInstance {
    /// Model matrix to transform the unit cylinder.
    model: [[f32; 4]; 4],
    /// Color for this stick (RGB).
    color: [f32; 3],
    /// Padding to align to 16 bytes.
    _pad: f32,
}

/// Draws one cylinder per scene segment.
pub struct StickRenderer {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    instance_buffer: wgpu::Buffer,
    index_count: u32,
    instance_count: u32,
}

impl StickRenderer {
    /// Build the stick pipeline and upload one instance per segment.
    #[must_use]
    pub fn new(
        context: &RenderContext,
        camera_layout: &wgpu::BindGroupLayout,
        scene: &Scene,
        color: Vec3,
    ) -> Self {
        let (vertices, indices) = generate_unit_cylinder();

        let vertex_buffer = context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Stick Vertex Buffer"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            },
        );

        let index_buffer = context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Stick Index Buffer"),
                contents: bytemuck::cast_slice(&indices),
                usage: wgpu::BufferUsages::INDEX,
            },
        );

        let instances: Vec<StickInstance> = scene
            .segments()
            .iter()
            .map(|seg| StickInstance {
                model: stick_transform(seg.start(), seg.end())
                    .to_cols_array_2d(),
                color: color.to_array(),
                _pad: 0.0,
            })
            .collect();

        let instance_buffer = context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Stick Instance Buffer"),
                contents: bytemuck::cast_slice(&instances),
                usage: wgpu::BufferUsages::VERTEX,
            },
        );

        let pipeline = create_pipeline(context, camera_layout);

        Self {
            pipeline,
            vertex_buffer,
            index_buffer,
            instance_buffer,
            index_count: indices.len() as u32,
            instance_count: instances.len() as u32,
        }
    }

    /// Record draw commands for all stick instances.
    pub fn draw<'a>(
        &'a self,
        render_pass: &mut wgpu::RenderPass<'a>,
        camera_bind_group: &'a wgpu::BindGroup,
    ) {
        if self.instance_count == 0 {
            return;
        }

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, camera_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
        render_pass.set_index_buffer(
            self.index_buffer.slice(..),
            wgpu::IndexFormat::Uint32,
        );
        render_pass.draw_indexed(0..self.index_count, 0, 0..self.instance_count);
    }
}

fn create_pipeline(
    context: &RenderContext,
    camera_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let shader = context
        .device
        .create_shader_module(wgpu::include_wgsl!(
            "../../assets/shaders/stick.wgsl"
        ));

    let pipeline_layout = context.device.create_pipeline_layout(
        &wgpu::PipelineLayoutDescriptor {
            label: Some("Stick Pipeline Layout"),
            bind_group_layouts: &[camera_layout],
            push_constant_ranges: &[],
        },
    );

    let vertex_layout = wgpu::VertexBufferLayout {
        array_stride: size_of::<StickVertex>()
            as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x3,
                offset: 0,
                shader_location: 0, // position
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x3,
                offset: 12,
                shader_location: 1, // normal
            },
        ],
    };

    // Instance buffer layout (4x4 matrix as 4 vec4s + color)
    let instance_layout = wgpu::VertexBufferLayout {
        array_stride: size_of::<StickInstance>()
            as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &[
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x4,
                offset: 0,
                shader_location: 2, // model matrix col 0
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x4,
                offset: 16,
                shader_location: 3, // model matrix col 1
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x4,
                offset: 32,
                shader_location: 4, // model matrix col 2
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x4,
                offset: 48,
                shader_location: 5, // model matrix col 3
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x3,
                offset: 64,
                shader_location: 6, // color
            },
        ],
    };

    context
        .device
        .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Stick Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[vertex_layout, instance_layout],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: context.config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
}

/// Generate a unit cylinder mesh (radius 1, height 1, Y-axis aligned,
/// centered at origin).
fn generate_unit_cylinder() -> (Vec<StickVertex>, Vec<u32>) {
    let mut vertices = Vec::with_capacity(RADIAL_SEGMENTS * 2);
    let mut indices = Vec::new();

    for i in 0..RADIAL_SEGMENTS {
        let angle =
            (i as f32 / RADIAL_SEGMENTS as f32) * std::f32::consts::TAU;
        let cos_a = angle.cos();
        let sin_a = angle.sin();

        // Normal points outward (radial direction)
        let normal = [cos_a, 0.0, sin_a];

        vertices.push(StickVertex {
            position: [cos_a, -0.5, sin_a],
            normal,
        });
        vertices.push(StickVertex {
            position: [cos_a, 0.5, sin_a],
            normal,
        });
    }

    for i in 0..RADIAL_SEGMENTS {
        let i_next = (i + 1) % RADIAL_SEGMENTS;

        let v0 = (i * 2) as u32; // bottom current
        let v1 = (i * 2 + 1) as u32; // top current
        let v2 = (i_next * 2) as u32; // bottom next
        let v3 = (i_next * 2 + 1) as u32; // top next

        indices.extend_from_slice(&[v0, v2, v1]);
        indices.extend_from_slice(&[v1, v2, v3]);
    }

    (vertices, indices)
}

/// Compute the transform for a cylinder connecting two points.
fn stick_transform(start: Vec3, end: Vec3) -> Mat4 {
    let diff = end - start;
    let length = diff.length();

    if length < 1e-6 {
        return Mat4::IDENTITY;
    }

    let direction = diff / length;
    let center = (start + end) * 0.5;

    // Rotation that carries the Y axis onto the segment direction
    let y_axis = Vec3::Y;
    let rotation = if direction.dot(y_axis).abs() > 0.999 {
        if direction.y > 0.0 {
            Mat4::IDENTITY
        } else {
            Mat4::from_axis_angle(Vec3::X, std::f32::consts::PI)
        }
    } else {
        let axis = y_axis.cross(direction).normalize();
        let angle = y_axis.dot(direction).acos();
        Mat4::from_axis_angle(axis, angle)
    };

    let scale =
        Mat4::from_scale(Vec3::new(STICK_RADIUS, length, STICK_RADIUS));
    let translation = Mat4::from_translation(center);

    translation * rotation * scale
}
