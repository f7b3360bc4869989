//! Terminal pass: copies the composited render to the screen.

use crate::error::PipelineError;
use crate::gpu::{RenderContext, ShaderComposer};
use crate::pass::post_process::{PostProcess, PostProcessDesc};
use crate::uniform::UniformStore;

pub(crate) const FRAGMENT_SOURCE: &str =
    include_str!("../../assets/shaders/screen/output.wgsl");

/// Identity copy of the input to the screen's framebuffer. Conventionally
/// registered at the highest priority key so it runs last.
pub struct OutputPass {
    pub(crate) post: PostProcess,
}

impl OutputPass {
    /// Compile the output pass.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::ShaderCompilation`] if the bundled shader
    /// fails to compose (a build defect, not a runtime condition).
    pub fn new(
        ctx: &RenderContext,
        composer: &mut ShaderComposer,
    ) -> Result<Self, PipelineError> {
        let post = PostProcess::new(
            ctx,
            composer,
            PostProcessDesc {
                label: "Output",
                fragment_source: FRAGMENT_SOURCE,
                source_path: "screen/output.wgsl",
                uniforms: UniformStore::new(),
                output_to_screen: true,
                filter: wgpu::FilterMode::Nearest,
            },
        )?;
        Ok(Self { post })
    }
}
