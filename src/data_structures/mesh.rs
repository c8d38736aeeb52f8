//! Meshes: geometry plus material, uploaded to the GPU.
//!
//! A [`Mesh`] owns the GPU buffers for one renderable object. Mutating its
//! [`Transform`] or [`Material`] only touches CPU state until
//! [`write_to_buffer`](Mesh::write_to_buffer) pushes the new uniform to the
//! queue, so a demo can batch several mutations per frame into one upload.

use wgpu::util::DeviceExt;

use crate::data_structures::{
    geometry::{Aabb, Geometry},
    material::Material,
    transform::Transform,
};

/// Anything with a vertex buffer layout the pipelines can consume.
pub trait Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

/// Vertex data as stored in the GPU vertex buffer.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex for MeshVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// Per-object data as it is laid out in GPU memory: world matrix and color.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

/// A renderable object: geometry and material on the GPU, transform on the CPU.
#[derive(Debug)]
pub struct Mesh {
    pub name: String,
    pub transform: Transform,
    pub material: Material,
    /// Bounds of the geometry in local space; combine with `transform` via
    /// [`world_aabb`](Self::world_aabb) for picking.
    pub aabb: Aabb,
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_elements: u32,
    uniform_buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl Mesh {
    pub fn new(
        device: &wgpu::Device,
        object_layout: &wgpu::BindGroupLayout,
        geometry: &Geometry,
        material: Material,
        name: &str,
    ) -> Self {
        let transform = Transform::new();

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{name} Vertex Buffer")),
            contents: bytemuck::cast_slice(&geometry.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{name} Index Buffer")),
            contents: bytemuck::cast_slice(&geometry.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let uniform = ObjectUniform {
            model: transform.to_matrix().into(),
            color: material.color,
        };
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{name} Object Buffer")),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: object_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
            label: Some(&format!("{name} Bind Group")),
        });

        Self {
            name: name.to_string(),
            transform,
            material,
            aabb: geometry.aabb,
            vertex_buffer,
            index_buffer,
            num_elements: geometry.indices.len() as u32,
            uniform_buffer,
            bind_group,
        }
    }

    /// Push the current transform and material to the GPU.
    pub fn write_to_buffer(&self, queue: &wgpu::Queue) {
        let uniform = ObjectUniform {
            model: self.transform.to_matrix().into(),
            color: self.material.color,
        };
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniform]));
    }

    /// The mesh bounds in world space, after applying its transform.
    pub fn world_aabb(&self) -> Aabb {
        self.aabb.transformed(&self.transform.to_matrix())
    }
}

/// Draw commands for meshes, implemented on the render pass.
pub trait DrawMesh<'a> {
    fn draw_mesh(&mut self, mesh: &'a Mesh, camera_bind_group: &'a wgpu::BindGroup);
}

impl<'a, 'b> DrawMesh<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_mesh(&mut self, mesh: &'b Mesh, camera_bind_group: &'b wgpu::BindGroup) {
        self.set_bind_group(0, camera_bind_group, &[]);
        self.set_bind_group(1, &mesh.bind_group, &[]);
        self.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        self.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..mesh.num_elements, 0, 0..1);
    }
}
