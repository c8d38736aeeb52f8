//! A green cube, centered in the viewport, rotating continuously.

use std::time::Duration;

use whirl::{
    Deg, Quaternion, Rad, Rotation3, WindowEvent,
    context::{Context, InitContext},
    data_structures::{geometry::Geometry, material::Material, mesh::Mesh},
    flow::{FlowConstructor, SceneFlow},
    render::{Drawable, Render},
};

#[derive(Default)]
struct State;

struct SpinningCube {
    cube: Mesh,
    angle: Rad<f32>,
}

impl SpinningCube {
    fn new(ctx: &InitContext) -> Self {
        let cube = Mesh::new(
            &ctx.device,
            &ctx.object_layout,
            &Geometry::cube(),
            Material::from_hex(0x00ff00),
            "cube",
        );
        Self {
            cube,
            angle: Rad(0.0),
        }
    }
}

impl SceneFlow<State> for SpinningCube {
    fn on_init(&mut self, ctx: &mut Context, _: &mut State) -> anyhow::Result<()> {
        // Wide 75 degree field of view, camera 5 units back on the z axis.
        ctx.camera.camera.position = [0.0, 0.0, 5.0].into();
        ctx.projection.fovy = Deg(75.0).into();
        ctx.projection.znear = 0.1;
        ctx.projection.zfar = 1000.0;
        Ok(())
    }

    fn on_update(&mut self, ctx: &Context, _: &mut State, dt: Duration) {
        // 0.6 rad/s on both axes, the original's 0.01 rad per 60 Hz frame.
        self.angle += Rad(0.6 * dt.as_secs_f32());
        self.cube.transform.rotation =
            Quaternion::from_angle_y(self.angle) * Quaternion::from_angle_x(self.angle);
        self.cube.write_to_buffer(&ctx.queue);
    }

    fn on_hover(&mut self, _: &Context, _: &mut State, _: Option<u32>) {}

    fn on_window_events(&mut self, _: &Context, _: &mut State, _: &WindowEvent) {}

    fn on_render<'pass>(&self) -> Render<'_, 'pass> {
        Render::Solid(Drawable {
            mesh: &self.cube,
            id: 1,
        })
    }
}

fn main() {
    let cube: FlowConstructor<State> = Box::new(|ctx| {
        Box::pin(async move {
            let flow: Box<dyn SceneFlow<State>> = Box::new(SpinningCube::new(&ctx));
            Ok(flow)
        })
    });

    let _ = whirl::flow::run(vec![cube]);
}
