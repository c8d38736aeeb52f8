//! whirl
//!
//! A small cross-platform collection of demo scenes on wgpu, running natively
//! and in the browser. The crate provides the shared plumbing the demos need:
//! a GPU/window context, a camera, a solid-color mesh pipeline, CPU
//! raycasting for hover picking and a per-frame event loop. Each demo in
//! `demos/` is an independent binary composing these pieces.
//!
//! High-level modules
//! - `camera`: camera, projection and uniforms for view/projection, mouse rays
//! - `context`: central GPU and window context that owns device/queue/pipelines
//! - `data_structures`: scene data (geometry, materials, transforms, meshes)
//! - `flow`: high level flow control (demo scenes / the per-frame loop)
//! - `pick`: raycasting utilities for hover picking
//! - `pipelines`: render pipeline definitions and checked shader creation
//! - `render`: render composition for pipeline batching
//!

pub mod camera;
pub mod context;
pub mod data_structures;
pub mod flow;
pub mod pick;
pub mod pipelines;
pub mod render;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;
pub use wgpu::*;
pub use winit::dpi::PhysicalPosition;
pub use winit::event::WindowEvent;
