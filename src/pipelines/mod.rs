//! Render pipeline definitions.
//!
//! The library owns a single pipeline, the unlit [`solid`] one. Demos that
//! build their own pipeline from raw shader source use
//! [`create_shader_checked`] and [`create_pipeline_checked`], which turn
//! wgpu validation failures into errors instead of process aborts.

use anyhow::anyhow;

pub mod solid;

/// All pipelines and shared bind group layouts owned by the context.
#[derive(Debug)]
pub struct Pipelines {
    pub solid: wgpu::RenderPipeline,
    /// Layout of the per-object uniform (group 1); meshes bind against this.
    pub object_layout: wgpu::BindGroupLayout,
}

impl Pipelines {
    pub fn new(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        camera_bind_group_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let object_layout = solid::object_layout(device);
        let solid =
            solid::mk_solid_pipeline(device, config, camera_bind_group_layout, &object_layout);
        Self {
            solid,
            object_layout,
        }
    }
}

/// Compile a WGSL shader, surfacing validation errors as a `Result`.
///
/// wgpu reports invalid shader source through its error scope mechanism; this
/// wraps module creation in a validation scope so a compile failure comes back
/// as `Err` with the compiler's diagnostic text instead of an uncaptured error.
pub async fn create_shader_checked(
    device: &wgpu::Device,
    label: &str,
    source: &str,
) -> anyhow::Result<wgpu::ShaderModule> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });
    match device.pop_error_scope().await {
        None => Ok(module),
        Some(error) => Err(anyhow!(
            "An error occurred compiling the shader '{label}': {error}"
        )),
    }
}

/// Create a render pipeline, surfacing validation errors as a `Result`.
///
/// Pipeline creation is where wgpu links the shader stages against the
/// pipeline layout, so this is the linking counterpart of
/// [`create_shader_checked`].
pub async fn create_pipeline_checked(
    device: &wgpu::Device,
    desc: &wgpu::RenderPipelineDescriptor<'_>,
) -> anyhow::Result<wgpu::RenderPipeline> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let pipeline = device.create_render_pipeline(desc);
    match device.pop_error_scope().await {
        None => Ok(pipeline),
        Some(error) => Err(anyhow!(
            "Unable to initialize the render pipeline '{}': {error}",
            desc.label.unwrap_or("unnamed")
        )),
    }
}
