//! A grid of cubes where the one under the mouse cursor turns red.
//!
//! Every frame the engine casts a ray from the camera through the cursor and
//! reports the nearest hit to this flow via `on_hover`; the flow recolors its
//! cubes accordingly on the next update.

use std::time::Duration;

use whirl::{
    Vector3, WindowEvent,
    context::{Context, InitContext},
    data_structures::{geometry::Geometry, material::Material, mesh::Mesh},
    flow::{FlowConstructor, SceneFlow},
    render::{Drawable, Render},
};

#[derive(Default)]
struct State;

const LIME: u32 = 0x00ff00;
const RED: u32 = 0xff0000;

/// Pick ids start at 1; id 0 is kept for never-pickable objects.
const FIRST_ID: u32 = 1;

struct HoverField {
    cubes: Vec<Mesh>,
    hovered: Option<u32>,
}

impl HoverField {
    fn new(ctx: &InitContext) -> Self {
        let geometry = Geometry::cube();
        let cubes = (0..16)
            .map(|i| {
                let mut cube = Mesh::new(
                    &ctx.device,
                    &ctx.object_layout,
                    &geometry,
                    Material::from_hex(LIME),
                    &format!("cube {i}"),
                );
                // 4x4 grid facing the camera
                let len = 4;
                let spacing = 2.0;
                let x = i % len;
                let y = i / len;
                let offset = (len - 1) as f32 / 2.0;
                cube.transform.position = Vector3::new(
                    (x as f32 - offset) * spacing,
                    (y as f32 - offset) * spacing,
                    0.0,
                );
                cube
            })
            .collect();
        Self {
            cubes,
            hovered: None,
        }
    }
}

impl SceneFlow<State> for HoverField {
    fn on_init(&mut self, ctx: &mut Context, _: &mut State) -> anyhow::Result<()> {
        ctx.camera.camera.position = [0.0, 0.0, 12.0].into();
        Ok(())
    }

    fn on_update(&mut self, ctx: &Context, _: &mut State, _: Duration) {
        // Reset every cube, then repaint the hovered one.
        for (i, cube) in self.cubes.iter_mut().enumerate() {
            let id = FIRST_ID + i as u32;
            let colour = if self.hovered == Some(id) { RED } else { LIME };
            cube.material = Material::from_hex(colour);
            cube.write_to_buffer(&ctx.queue);
        }
    }

    fn on_hover(&mut self, _: &Context, _: &mut State, id: Option<u32>) {
        self.hovered = id;
    }

    fn on_window_events(&mut self, _: &Context, _: &mut State, _: &WindowEvent) {}

    fn on_render<'pass>(&self) -> Render<'_, 'pass> {
        Render::Solids(
            self.cubes
                .iter()
                .enumerate()
                .map(|(i, mesh)| Drawable {
                    mesh,
                    id: FIRST_ID + i as u32,
                })
                .collect(),
        )
    }
}

fn main() {
    let field: FlowConstructor<State> = Box::new(|ctx| {
        Box::pin(async move {
            let flow: Box<dyn SceneFlow<State>> = Box::new(HoverField::new(&ctx));
            Ok(flow)
        })
    });

    let _ = whirl::flow::run(vec![field]);
}
