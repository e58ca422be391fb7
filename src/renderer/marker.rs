//! Renders feature-point markers as instanced icospheres.
//!
//! The instance buffer is sized for every marker in the scene and
//! re-uploaded whenever marker visibility or colors change; only visible
//! markers occupy instance slots.

use std::collections::HashMap;

use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use crate::gpu::render_context::RenderContext;
use crate::gpu::texture::DEPTH_FORMAT;
use crate::scene::Scene;

/// World-space radius of a rendered marker sphere.
pub const MARKER_RADIUS: f32 = 0.1;

/// Icosphere subdivision level (1 = 80 triangles, 2 = 320).
const SUBDIVISIONS: u32 = 2;

/// Vertex for the unit sphere mesh.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct MarkerVertex {
    position: [f32; 3],
    normal: [f32; 3],
}

/// Per-instance data for marker rendering.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct MarkerInstance {
    /// Model matrix to transform the unit sphere.
    model: [[f32; 4]; 4],
    /// Color for this marker (RGB).
    color: [f32; 3],
    /// Padding to align to 16 bytes.
    _pad: f32,
}

/// Draws every visible marker in the scene.
pub struct MarkerRenderer {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    instance_buffer: wgpu::Buffer,
    index_count: u32,
    instance_count: u32,
    capacity: usize,
}

impl MarkerRenderer {
    /// Build the marker pipeline with an instance buffer sized for every
    /// marker in the scene.
    #[must_use]
    pub fn new(
        context: &RenderContext,
        camera_layout: &wgpu::BindGroupLayout,
        scene: &Scene,
    ) -> Self {
        let (vertices, indices) = generate_icosphere(SUBDIVISIONS);

        let vertex_buffer = context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Marker Vertex Buffer"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            },
        );

        let index_buffer = context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Marker Index Buffer"),
                contents: bytemuck::cast_slice(&indices),
                usage: wgpu::BufferUsages::INDEX,
            },
        );

        let capacity = (scene.segments().len() * 3).max(1);
        let instance_buffer =
            context.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Marker Instance Buffer"),
                size: (capacity * size_of::<MarkerInstance>())
                    as wgpu::BufferAddress,
                usage: wgpu::BufferUsages::VERTEX
                    | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });

        let pipeline = create_pipeline(context, camera_layout);

        let mut renderer = Self {
            pipeline,
            vertex_buffer,
            index_buffer,
            instance_buffer,
            index_count: indices.len() as u32,
            instance_count: 0,
            capacity,
        };
        renderer.update(&context.queue, scene);
        renderer
    }

    /// Re-upload instance data from the current marker state.
    pub fn update(&mut self, queue: &wgpu::Queue, scene: &Scene) {
        let instances: Vec<MarkerInstance> = scene
            .segments()
            .iter()
            .flat_map(|seg| seg.markers().iter())
            .filter(|marker| marker.visible)
            .take(self.capacity)
            .map(|marker| {
                let model = Mat4::from_scale_rotation_translation(
                    Vec3::splat(MARKER_RADIUS),
                    glam::Quat::IDENTITY,
                    marker.position,
                );
                MarkerInstance {
                    model: model.to_cols_array_2d(),
                    color: marker.color.to_array(),
                    _pad: 0.0,
                }
            })
            .collect();

        if !instances.is_empty() {
            queue.write_buffer(
                &self.instance_buffer,
                0,
                bytemuck::cast_slice(&instances),
            );
        }
        self.instance_count = instances.len() as u32;
    }

    /// Record draw commands for all visible marker instances.
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
            "../../assets/shaders/marker.wgsl"
        ));

    let pipeline_layout = context.device.create_pipeline_layout(
        &wgpu::PipelineLayoutDescriptor {
            label: Some("Marker Pipeline Layout"),
            bind_group_layouts: &[camera_layout],
            push_constant_ranges: &[],
        },
    );

    let vertex_layout = wgpu::VertexBufferLayout {
        array_stride: size_of::<MarkerVertex>()
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
        array_stride: size_of::<MarkerInstance>()
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
            label: Some("Marker Render Pipeline"),
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

/// Generate an icosphere mesh with the given subdivision level.
/// Level 0 = icosahedron (20 triangles), each level quadruples the count.
fn generate_icosphere(subdivisions: u32) -> (Vec<MarkerVertex>, Vec<u32>) {
    // Golden ratio for icosahedron vertices
    let phi = (1.0 + 5.0_f32.sqrt()) / 2.0;
    let inv_len = 1.0 / (1.0 + phi * phi).sqrt();

    let mut positions: Vec<Vec3> = vec![
        Vec3::new(-1.0, phi, 0.0) * inv_len,
        Vec3::new(1.0, phi, 0.0) * inv_len,
        Vec3::new(-1.0, -phi, 0.0) * inv_len,
        Vec3::new(1.0, -phi, 0.0) * inv_len,
        Vec3::new(0.0, -1.0, phi) * inv_len,
        Vec3::new(0.0, 1.0, phi) * inv_len,
        Vec3::new(0.0, -1.0, -phi) * inv_len,
        Vec3::new(0.0, 1.0, -phi) * inv_len,
        Vec3::new(phi, 0.0, -1.0) * inv_len,
        Vec3::new(phi, 0.0, 1.0) * inv_len,
        Vec3::new(-phi, 0.0, -1.0) * inv_len,
        Vec3::new(-phi, 0.0, 1.0) * inv_len,
    ];

    // 20 triangles of the icosahedron (CCW winding for outward normals)
    let mut indices: Vec<u32> = vec![
        0, 5, 11, 0, 1, 5, 0, 7, 1, 0, 10, 7, 0, 11, 10, //
        1, 9, 5, 5, 4, 11, 11, 2, 10, 10, 6, 7, 7, 8, 1, //
        3, 4, 9, 3, 2, 4, 3, 6, 2, 3, 8, 6, 3, 9, 8, //
        4, 5, 9, 2, 11, 4, 6, 10, 2, 8, 7, 6, 9, 1, 8,
    ];

    let mut midpoint_cache: HashMap<(u32, u32), u32> = HashMap::new();

    for _ in 0..subdivisions {
        let mut new_indices = Vec::with_capacity(indices.len() * 4);

        for tri in indices.chunks(3) {
            let v0 = tri[0];
            let v1 = tri[1];
            let v2 = tri[2];

            let a = midpoint(&mut positions, &mut midpoint_cache, v0, v1);
            let b = midpoint(&mut positions, &mut midpoint_cache, v1, v2);
            let c = midpoint(&mut positions, &mut midpoint_cache, v2, v0);

            new_indices.extend_from_slice(&[v0, a, c]);
            new_indices.extend_from_slice(&[v1, b, a]);
            new_indices.extend_from_slice(&[v2, c, b]);
            new_indices.extend_from_slice(&[a, b, c]);
        }

        indices = new_indices;
    }

    // For a unit sphere the normal equals the position
    let vertices: Vec<MarkerVertex> = positions
        .iter()
        .map(|&p| MarkerVertex {
            position: p.to_array(),
            normal: p.to_array(),
        })
        .collect();

    (vertices, indices)
}

fn midpoint(
    positions: &mut Vec<Vec3>,
    cache: &mut HashMap<(u32, u32), u32>,
    v0: u32,
    v1: u32,
) -> u32 {
    // Consistent ordering for the cache key
    let key = if v0 < v1 { (v0, v1) } else { (v1, v0) };

    if let Some(&idx) = cache.get(&key) {
        return idx;
    }

    let p0 = positions[v0 as usize];
    let p1 = positions[v1 as usize];
    let mid = ((p0 + p1) * 0.5).normalize();

    let idx = positions.len() as u32;
    positions.push(mid);
    let _ = cache.insert(key, idx);
    idx
}
