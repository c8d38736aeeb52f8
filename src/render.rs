//! Render composition.
//!
//! Flows describe what to draw each frame by returning a [`Render`]. The
//! engine sorts the described objects into one batch for the solid pipeline
//! and runs custom closures in place, so several flows can share a single
//! render pass.
//!
//! # Key types
//!
//! - [`Render<'a, 'pass>`] is the enum describing render operations
//! - [`Drawable<'a>`] pairs a mesh with the id used for picking

use std::collections::{HashMap, HashSet};

use wgpu::RenderPass;

use crate::{context::Context, data_structures::geometry::Aabb, data_structures::mesh::Mesh};

/// A mesh scheduled for drawing, tagged with a pick id.
///
/// Ids identify objects during picking. Use a unique non-zero id per
/// selectable object; objects that should never be picked can share an id.
pub struct Drawable<'a> {
    pub mesh: &'a Mesh,
    pub id: u32,
}

/// Specifies how a flow's objects should be rendered this frame.
///
/// # Variants
///
/// - `None` renders nothing
/// - `Solid(Drawable)` renders a single solid mesh
/// - `Solids(Vec<Drawable>)` renders a batch of solid meshes
/// - `Composed(Vec<Render>)` recursively renders a composition
/// - `Custom(...)` invokes a user-defined closure with the open render pass,
///   for flows that manage their own pipeline and buffers
pub enum Render<'a, 'pass>
where
    'pass: 'a,
{
    None,
    Solid(Drawable<'a>),
    Solids(Vec<Drawable<'a>>),
    Composed(Vec<Render<'a, 'pass>>),
    Custom(Box<dyn 'a + FnOnce(&Context, &mut RenderPass<'pass>)>),
}

impl<'a, 'pass> Render<'a, 'pass> {
    /// Map object ids to flow ids for picking.
    ///
    /// Walks the render tree and records which flow owns which object ids, so
    /// a pick result only reaches the flows responsible for the hit object.
    pub(crate) fn map_ids(&self, flow_id: usize, map: &mut HashMap<u32, HashSet<usize>>) {
        match self {
            Render::Solid(drawable) => {
                map.entry(drawable.id)
                    .and_modify(|flows| _ = flows.insert(flow_id))
                    .or_insert([flow_id].into());
            }
            Render::Solids(vec) => vec.iter().for_each(|drawable| {
                map.entry(drawable.id)
                    .and_modify(|flows| {
                        flows.insert(flow_id);
                    })
                    .or_insert([flow_id].into());
            }),
            Render::Composed(renders) => renders
                .iter()
                .for_each(|render| render.map_ids(flow_id, map)),
            // Custom renders manage their own objects and are not pickable.
            Render::None | Render::Custom(_) => (),
        }
    }

    /// Collect world-space bounds of every pickable object in the tree.
    pub(crate) fn collect_pickables(&self, out: &mut Vec<(u32, Aabb)>) {
        match self {
            Render::Solid(drawable) => out.push((drawable.id, drawable.mesh.world_aabb())),
            Render::Solids(vec) => out.extend(
                vec.iter()
                    .map(|drawable| (drawable.id, drawable.mesh.world_aabb())),
            ),
            Render::Composed(renders) => renders
                .iter()
                .for_each(|render| render.collect_pickables(out)),
            Render::None | Render::Custom(_) => (),
        }
    }

    /// Sort this render into the solid batch, running custom closures in place.
    pub(crate) fn set_pipelines(
        self,
        ctx: &Context,
        render_pass: &mut RenderPass<'pass>,
        solids: &mut Vec<Drawable<'a>>,
    ) {
        match self {
            Render::Solid(drawable) => solids.push(drawable),
            Render::Solids(mut vec) => solids.append(&mut vec),
            Render::Composed(renders) => renders
                .into_iter()
                .for_each(|render| render.set_pipelines(ctx, render_pass, solids)),
            Render::Custom(f) => f(ctx, render_pass),
            Render::None => (),
        }
    }
}
