//! Flow control and application event loop.
//!
//! A "flow" is one self-contained demo scene: it configures the context,
//! reacts to input, updates its objects every frame and describes what to
//! render. The engine owns the winit event loop, re-arms a redraw every frame
//! (the native analog of the browser's animation-frame callback) and
//! coordinates rendering and hover picking across all active flows.
//!
//! # Lifecycle
//!
//! Each frame the event loop:
//! 1. renders all flows' [`Render`]s into one pass and presents
//! 2. uploads the camera uniform
//! 3. calls `on_update` with the elapsed time
//! 4. casts a ray through the cursor and calls `on_hover` with the result
//!
//! Setup failures (a flow constructor or `on_init` returning `Err`) are
//! surfaced to the user and the failed flow is dropped; the remaining flows
//! keep running in front of the cleared canvas.

use std::{iter, pin::Pin, sync::Arc};

use instant::{Duration, Instant};

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::Window,
};

use crate::{
    context::{Context, InitContext},
    data_structures::{mesh::DrawMesh, texture::Texture},
    pick::pick_at_cursor,
    render::{Drawable, Render},
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Trait for implementing a renderable demo scene.
///
/// A `SceneFlow` manages a self-contained portion of the application:
/// rendering, input handling and per-frame state updates. The engine
/// coordinates multiple flows, passes events to them and composes their
/// renders.
///
/// # Lifecycle
///
/// 1. `on_init()` is called once when the flow is created; this is the place
///    to configure the context (camera, clear color, etc.)
/// 2. `on_window_events()` is called for each winit input event
/// 3. `on_update()` is called every frame with the elapsed time
/// 4. `on_hover()` is called every frame with the pick result
/// 5. `on_render()` is called each frame and specifies how to render `self`
pub trait SceneFlow<S> {
    /// Initialize the flow and configure the context.
    ///
    /// Returning `Err` aborts this flow's setup: the error is surfaced to the
    /// user and the flow is removed without affecting the other flows.
    fn on_init(&mut self, ctx: &mut Context, state: &mut S) -> anyhow::Result<()>;

    /// Update state every frame.
    ///
    /// Called every frame with the elapsed time `dt`. Use for animations and
    /// other per-frame logic.
    fn on_update(&mut self, ctx: &Context, state: &mut S, dt: Duration);

    /// React to the object under the mouse cursor.
    ///
    /// Called every frame. `id` is `Some` when the cursor ray hits an object
    /// rendered by this flow (the id set via `on_render`), `None` when the
    /// cursor is over nothing or over another flow's object.
    fn on_hover(&mut self, ctx: &Context, state: &mut S, id: Option<u32>);

    /// Handle window events (keyboard, mouse, window resizing, etc.).
    fn on_window_events(&mut self, ctx: &Context, state: &mut S, event: &WindowEvent);

    /// Return renderable objects for this flow.
    ///
    /// Called each frame. Collect your objects into a [`Render`] and return
    /// it. The engine batches all flows' renders into a single pass.
    fn on_render<'pass>(&self) -> Render<'_, 'pass>;
}

/// Type alias for a flow constructor (factory function).
///
/// A flow constructor takes an [`InitContext`] and asynchronously builds the
/// flow, returning `Err` when setup fails (for example when hand-written
/// shader source does not compile).
pub type FlowConstructor<S> = Box<
    dyn FnOnce(InitContext) -> Pin<Box<dyn Future<Output = anyhow::Result<Box<dyn SceneFlow<S>>>>>>,
>;

/// Surface a setup failure to the user.
///
/// On the web this is a blocking alert dialog; natively the diagnostic goes
/// to the log.
pub(crate) fn surface_error(message: &str) {
    log::error!("{message}");
    #[cfg(target_arch = "wasm32")]
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

fn keep_constructed<S: 'static>(
    flows: Vec<anyhow::Result<Box<dyn SceneFlow<S>>>>,
) -> Vec<Box<dyn SceneFlow<S>>> {
    flows
        .into_iter()
        .filter_map(|flow| match flow {
            Ok(flow) => Some(flow),
            Err(e) => {
                surface_error(&format!("Demo setup failed: {e:#}"));
                None
            }
        })
        .collect()
}

/// Application state bundle: GPU context, app state, and surface status.
pub struct AppState<State: 'static> {
    pub(crate) ctx: Context,
    state: State,
    is_surface_configured: bool,
}

impl<State: 'static + Default> AppState<State> {
    async fn new(window: Arc<Window>) -> Self {
        let ctx = Context::new(window).await;
        let ctx = match ctx {
            Ok(ctx) => ctx,
            Err(e) => panic!(
                "App initialization failed. Cannot create the main context: {}",
                e
            ),
        };
        let state = State::default();
        let is_surface_configured = false;
        Self {
            ctx,
            state,
            is_surface_configured,
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.ctx.config.width = width;
            self.ctx.config.height = height;
            self.is_surface_configured = true;
            self.ctx.projection.resize(width, height);
            self.ctx
                .surface
                .configure(&self.ctx.device, &self.ctx.config);
            self.ctx.depth_texture = Texture::create_depth_texture(
                &self.ctx.device,
                [self.ctx.config.width, self.ctx.config.height],
                "depth_texture",
            );
        }
    }

    fn render(
        &mut self,
        graphics_flows: &Vec<Box<dyn SceneFlow<State>>>,
    ) -> Result<(), wgpu::SurfaceError> {
        // invoke main render loop
        self.ctx.window.request_redraw();

        // Rendering requires the surface to be configured
        if !self.is_surface_configured {
            return Ok(());
        }

        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder: wgpu::CommandEncoder =
            self.ctx
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("Render Encoder"),
                });
        {
            let mut render_pass: wgpu::RenderPass<'_> =
                encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Render Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(self.ctx.clear_colour),
                            store: wgpu::StoreOp::Store,
                        },
                        depth_slice: None,
                    })],
                    depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                        view: &self.ctx.depth_texture.view,
                        depth_ops: Some(wgpu::Operations {
                            load: wgpu::LoadOp::Clear(1.0),
                            store: wgpu::StoreOp::Store,
                        }),
                        stencil_ops: None,
                    }),
                    occlusion_query_set: None,
                    timestamp_writes: None,
                });

            // Actual rendering: custom renders run in place, solids batch up.
            let mut solids: Vec<Drawable> = Vec::new();
            graphics_flows.iter().for_each(|flow| {
                let render = flow.on_render();
                render.set_pipelines(&self.ctx, &mut render_pass, &mut solids);
            });

            render_pass.set_pipeline(&self.ctx.pipelines.solid);
            for drawable in solids {
                if drawable.mesh.num_elements == 0 {
                    log::warn!("you attempted to render a mesh with zero indices");
                    continue;
                }
                render_pass.draw_mesh(drawable.mesh, &self.ctx.camera.bind_group);
            }
        }

        self.ctx.queue.submit(iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

pub struct App<State: 'static> {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    #[cfg(target_arch = "wasm32")]
    proxy: winit::event_loop::EventLoopProxy<FlowEvent<State>>,
    state: Option<AppState<State>>,
    // This will hold the fully initialized flows once they are ready.
    graphics_flows: Vec<Box<dyn SceneFlow<State>>>,
    // This holds the constructors at the start.
    // We use Option to `take()` it after use.
    constructors: Option<Vec<FlowConstructor<State>>>,
    last_time: Instant,
}

impl<State: 'static> App<State> {
    fn new(
        #[allow(unused_variables)] event_loop: &EventLoop<FlowEvent<State>>,
        constructors: Vec<FlowConstructor<State>>,
    ) -> Self {
        #[cfg(target_arch = "wasm32")]
        let proxy = event_loop.create_proxy();
        #[cfg(not(target_arch = "wasm32"))]
        let async_runtime = tokio::runtime::Runtime::new().unwrap();
        Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime,
            #[cfg(target_arch = "wasm32")]
            proxy,
            state: None,
            graphics_flows: Vec::new(),
            constructors: Some(constructors),
            last_time: Instant::now(),
        }
    }

    /// Run `on_init` on every flow, dropping the ones whose setup fails.
    fn init_flows(&mut self, app_state: &mut AppState<State>) {
        let AppState { ctx, state, .. } = app_state;
        self.graphics_flows.retain_mut(|flow| match flow.on_init(ctx, state) {
            Ok(()) => true,
            Err(e) => {
                surface_error(&format!("Demo setup failed: {e:#}"));
                false
            }
        });
    }
}

pub(crate) enum FlowEvent<State: 'static> {
    #[allow(dead_code)]
    Initialized {
        state: AppState<State>,
        flows: Vec<Box<dyn SceneFlow<State>>>,
    },
}

impl<State: 'static + Default> ApplicationHandler<FlowEvent<State>> for App<State> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes();

        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::JsCast;
            use winit::platform::web::WindowAttributesExtWebSys;

            const CANVAS_ID: &str = "canvas";

            let window = web_sys::window().unwrap_throw();
            let document = window.document().unwrap_throw();
            let canvas = document.get_element_by_id(CANVAS_ID).unwrap_throw();
            let html_canvas_element = canvas.unchecked_into();
            window_attributes = window_attributes.with_canvas(Some(html_canvas_element));
        }

        let window = Arc::new(event_loop.create_window(window_attributes).unwrap());

        let constructors = self.constructors.take().unwrap();

        let init_future = async move {
            let app_state = AppState::new(window).await;

            let flow_futures: Vec<_> = constructors
                .into_iter()
                // The clone in into() leverages the internal Arcs of Device and Queue and thus only clones the ref
                .map(|constructor| constructor((&app_state.ctx).into()))
                .collect();
            let flows = futures::future::join_all(flow_futures).await;
            (app_state, keep_constructed(flows))
        };

        #[cfg(not(target_arch = "wasm32"))]
        {
            let (mut app_state, flows) = self.async_runtime.block_on(init_future);
            self.graphics_flows = flows;
            let size = app_state.ctx.window.inner_size();
            app_state.resize(size.width, size.height);
            self.init_flows(&mut app_state);
            self.state = Some(app_state);
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let (app_state, flows) = init_future.await;
                assert!(
                    proxy
                        .send_event(FlowEvent::Initialized {
                            state: app_state,
                            flows,
                        })
                        .is_ok()
                );
            });
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: FlowEvent<State>) {
        match event {
            FlowEvent::Initialized { state, flows } => {
                // This is the message from our wasm `spawn_local`
                let mut app_state = state;
                self.graphics_flows = flows;

                // Important: Trigger a resize and redraw now that we are initialized
                let size = app_state.ctx.window.inner_size();
                app_state.resize(size.width, size.height);
                self.init_flows(&mut app_state);
                app_state.ctx.window.request_redraw();
                self.state = Some(app_state);
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        if let WindowEvent::CursorMoved {
            device_id: _,
            position,
        } = event
        {
            state.ctx.mouse.coords = position;
        };

        self.graphics_flows.iter_mut().for_each(|f| {
            f.on_window_events(&state.ctx, &mut state.state, &event);
        });

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::RedrawRequested => {
                let dt = self.last_time.elapsed();
                self.last_time = Instant::now();

                match state.render(&self.graphics_flows) {
                    Ok(_) => {
                        // Update the camera
                        state
                            .ctx
                            .camera
                            .uniform
                            .update_view_proj(&state.ctx.camera.camera, &state.ctx.projection);
                        state.ctx.queue.write_buffer(
                            &state.ctx.camera.buffer,
                            0,
                            bytemuck::cast_slice(&[state.ctx.camera.uniform]),
                        );
                        // Update custom stuff
                        self.graphics_flows.iter_mut().for_each(|f| {
                            f.on_update(&state.ctx, &mut state.state, dt);
                        });
                        // Hover picking: dispatch the ray hit (if any) to the
                        // flows owning the hit object, `None` to the rest.
                        let hovered = pick_at_cursor(&self.graphics_flows, &state.ctx);
                        state.ctx.mouse.hovered = hovered.as_ref().map(|(id, _)| *id);
                        self.graphics_flows
                            .iter_mut()
                            .enumerate()
                            .for_each(|(idx, flow)| {
                                let id = match &hovered {
                                    Some((id, flow_ids)) if flow_ids.contains(&idx) => Some(*id),
                                    _ => None,
                                };
                                flow.on_hover(&state.ctx, &mut state.state, id);
                            });
                    }
                    // Reconfigure the surface if it's lost or outdated
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = state.ctx.window.inner_size();
                        state.resize(size.width, size.height);
                    }
                    Err(e) => {
                        log::error!("Unable to render {}", e);
                    }
                }
            }
            _ => {}
        }
    }
}

pub fn run<State: 'static + Default>(constructors: Vec<FlowConstructor<State>>) -> anyhow::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            println!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        console_log::init_with_level(log::Level::Info).unwrap_throw();
    }

    let event_loop: EventLoop<FlowEvent<State>> = EventLoop::with_user_event().build()?;

    let mut app: App<State> = App::new(&event_loop, constructors);

    event_loop.run_app(&mut app)?;

    Ok(())
}
