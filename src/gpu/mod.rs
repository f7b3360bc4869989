//! GPU plumbing shared by the whole pipeline: the wgpu context, shader
//! composition, bind-layout helpers, and per-frame texture unit bookkeeping.

pub mod pipeline_util;
pub mod render_context;
pub mod shader;
pub mod texture_units;

pub use render_context::{RenderContext, RenderContextError};
pub use shader::ShaderComposer;
pub use texture_units::TextureUnits;
