//! A white quad on a black background, built directly against wgpu.
//!
//! Unlike the other demos this one uses no library mesh or pipeline: the
//! shader source, pipeline, vertex buffer and uniforms are all written out by
//! hand, the way a first walk through the API looks. Shader compilation and
//! pipeline creation are the two places where hand-written source can fail,
//! so both go through the checked helpers and abort setup on error.

use std::time::Duration;

use wgpu::util::DeviceExt;
use whirl::{
    Deg, Matrix4, Vector3, WindowEvent,
    camera::OPENGL_TO_WGPU_MATRIX,
    context::{Context, InitContext},
    data_structures::texture::Texture,
    flow::{FlowConstructor, SceneFlow},
    perspective,
    pipelines::{create_pipeline_checked, create_shader_checked},
    render::Render,
};

#[derive(Default)]
struct State;

// The vertex shader positions each corner with the projection and model-view
// matrices; the fragment shader paints every pixel white.
const SHADER_SOURCE: &str = "
struct Uniforms {
    projection: mat4x4<f32>,
    model_view: mat4x4<f32>,
}
@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

@vertex
fn vs_main(@location(0) position: vec2<f32>) -> @builtin(position) vec4<f32> {
    return uniforms.projection * uniforms.model_view * vec4<f32>(position, 0.0, 1.0);
}

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec4<f32>(1.0, 1.0, 1.0, 1.0);
}
";

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Uniforms {
    projection: [[f32; 4]; 4],
    model_view: [[f32; 4]; 4],
}

impl Uniforms {
    fn new(aspect: f32) -> Self {
        // 45 degree field of view, clipping between 0.1 and 100 units, and
        // the quad moved 6 units away from the camera.
        let projection = OPENGL_TO_WGPU_MATRIX * perspective(Deg(45.0), aspect, 0.1, 100.0);
        let model_view = Matrix4::from_translation(Vector3::new(0.0, 0.0, -6.0));
        Self {
            projection: projection.into(),
            model_view: model_view.into(),
        }
    }
}

struct FlatQuad {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl FlatQuad {
    async fn new(ctx: &InitContext) -> anyhow::Result<Self> {
        let shader = create_shader_checked(&ctx.device, "quad shader", SHADER_SOURCE).await?;

        let bind_group_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    entries: &[wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    }],
                    label: Some("quad_bind_group_layout"),
                });

        let pipeline_layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Quad Pipeline Layout"),
                bind_group_layouts: &[&bind_group_layout],
                push_constant_ranges: &[],
            });

        let pipeline = create_pipeline_checked(
            &ctx.device,
            &wgpu::RenderPipelineDescriptor {
                cache: None,
                label: Some("Quad Pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![0 => Float32x2],
                    }],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: ctx.config.format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleStrip,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                // The shared render pass always has a depth attachment, so
                // the pipeline needs a matching depth state. Near things
                // obscure far things.
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: Texture::DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::LessEqual,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState {
                    count: 1,
                    mask: !0,
                    alpha_to_coverage_enabled: false,
                },
                multiview: None,
            },
        )
        .await?;

        // One 2D position per corner, drawn as a triangle strip.
        let positions: [[f32; 2]; 4] = [[-1.0, 1.0], [1.0, 1.0], [-1.0, -1.0], [1.0, -1.0]];
        let vertex_buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Quad Vertex Buffer"),
                contents: bytemuck::cast_slice(&positions),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let aspect = ctx.config.width as f32 / ctx.config.height as f32;
        let uniform_buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Quad Uniform Buffer"),
                contents: bytemuck::bytes_of(&Uniforms::new(aspect)),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
            label: Some("quad_bind_group"),
        });

        Ok(Self {
            pipeline,
            vertex_buffer,
            uniform_buffer,
            bind_group,
        })
    }
}

impl SceneFlow<State> for FlatQuad {
    fn on_init(&mut self, ctx: &mut Context, _: &mut State) -> anyhow::Result<()> {
        // Clear to black, fully opaque
        ctx.clear_colour = wgpu::Color::BLACK;
        Ok(())
    }

    fn on_update(&mut self, ctx: &Context, _: &mut State, _: Duration) {
        // Track the window aspect ratio so the quad stays square-ish.
        let aspect = ctx.config.width as f32 / ctx.config.height as f32;
        ctx.queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&Uniforms::new(aspect)),
        );
    }

    fn on_hover(&mut self, _: &Context, _: &mut State, _: Option<u32>) {}

    fn on_window_events(&mut self, _: &Context, _: &mut State, _: &WindowEvent) {}

    fn on_render<'pass>(&self) -> Render<'_, 'pass> {
        Render::Custom(Box::new(|_, render_pass| {
            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.draw(0..4, 0..1);
        }))
    }
}

fn main() {
    let quad: FlowConstructor<State> = Box::new(|ctx| {
        Box::pin(async move {
            let flow: Box<dyn SceneFlow<State>> = Box::new(FlatQuad::new(&ctx).await?);
            Ok(flow)
        })
    });

    let _ = whirl::flow::run(vec![quad]);
}
