//! GPU plumbing: device/surface ownership and texture helpers.

/// Core wgpu resources: device, queue, surface, configuration.
pub mod render_context;
/// Depth buffer creation.
pub mod texture;

pub use render_context::{RenderContext, RenderContextError};
pub use texture::DepthTexture;
