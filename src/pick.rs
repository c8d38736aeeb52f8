//! Object picking by raycasting.
//!
//! Picking works on the CPU: a ray is cast from the camera through the mouse
//! cursor, intersected with the world-space bounds of every pickable object,
//! and the nearest hit wins. The flow event loop runs this once per frame and
//! dispatches the result only to the flows that own the hit id (determined by
//! the render tree).

use std::collections::{HashMap, HashSet};

use cgmath::{Point3, Vector3};

use crate::{context::Context, data_structures::geometry::Aabb, flow::SceneFlow};

/// A ray in world space: origin plus unit direction.
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Point3<f32>,
    pub direction: Vector3<f32>,
}

impl Ray {
    /// Distance along the ray to the box, or `None` if the ray misses.
    ///
    /// Standard slab test. Returns `0.0` when the origin is inside the box;
    /// boxes entirely behind the origin do not hit.
    pub fn intersect_aabb(&self, aabb: &Aabb) -> Option<f32> {
        let mut t_min = 0.0f32;
        let mut t_max = f32::INFINITY;

        for axis in 0..3 {
            let origin = self.origin[axis];
            let inv_d = 1.0 / self.direction[axis];
            let mut t0 = (aabb.min[axis] - origin) * inv_d;
            let mut t1 = (aabb.max[axis] - origin) * inv_d;
            if inv_d < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            // A ray parallel to the slab (inv_d infinite) yields +-inf bounds
            // here, which the min/max below handle; NaN from 0 * inf only
            // occurs when the origin lies exactly on a slab plane and then
            // fails the comparison, rejecting the degenerate hit.
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_max < t_min {
                return None;
            }
        }

        Some(t_min)
    }
}

/// Cast a ray through the mouse cursor and find the nearest object.
///
/// Walks every flow's render tree, intersecting the ray with each pickable
/// object's world bounds.
///
/// # Returns
///
/// `Some((id, flow_ids))` with the nearest hit object and the indices of the
/// flows that rendered it, or `None` when nothing is under the cursor.
pub fn pick_at_cursor<S: 'static>(
    flows: &[Box<dyn SceneFlow<S>>],
    ctx: &Context,
) -> Option<(u32, HashSet<usize>)> {
    let ray = ctx.camera.camera.cast_ray_from_mouse(
        ctx.mouse.coords,
        ctx.config.width as f32,
        ctx.config.height as f32,
        &ctx.projection,
    );

    let mut translation: HashMap<u32, HashSet<usize>> = HashMap::new();
    let mut pickables: Vec<(u32, Aabb)> = Vec::new();
    flows.iter().enumerate().for_each(|(idx, flow)| {
        let render = flow.on_render();
        render.map_ids(idx, &mut translation);
        render.collect_pickables(&mut pickables);
    });

    let mut nearest: Option<(u32, f32)> = None;
    for (id, aabb) in pickables {
        if let Some(t) = ray.intersect_aabb(&aabb) {
            let closer = match nearest {
                Some((_, best)) => t < best,
                None => true,
            };
            if closer {
                nearest = Some((id, t));
            }
        }
    }

    let (id, _) = nearest?;
    log::debug!("Hovering obj with id {}", id);
    translation.get(&id).map(|flow_ids| (id, flow_ids.clone()))
}
