//! Per-channel color multiply.

use glam::Vec4;

use crate::error::PipelineError;
use crate::gpu::{RenderContext, ShaderComposer};
use crate::pass::post_process::{PostProcess, PostProcessDesc};
use crate::uniform::{UniformStore, UniformValue};

pub(crate) const FRAGMENT_SOURCE: &str =
    include_str!("../../assets/shaders/screen/color_blend.wgsl");

const U_COLOR: &str = "u_color";

/// Multiplies every pixel of the input by a constant RGBA color. A color of
/// `(1, 1, 1, 1)` is the identity transform.
pub struct ColorBlendPass {
    pub(crate) post: PostProcess,
    color: Vec4,
}

impl ColorBlendPass {
    /// Compile the pass with the given blend color (RGBA, 0–1 per channel).
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::ShaderCompilation`] if the bundled shader
    /// fails to compose.
    pub fn new(
        ctx: &RenderContext,
        composer: &mut ShaderComposer,
        color: Vec4,
    ) -> Result<Self, PipelineError> {
        let mut uniforms = UniformStore::new();
        let _ = uniforms.set(U_COLOR, UniformValue::Vec4(color));

        let post = PostProcess::new(
            ctx,
            composer,
            PostProcessDesc {
                label: "Color Blend",
                fragment_source: FRAGMENT_SOURCE,
                source_path: "screen/color_blend.wgsl",
                uniforms,
                output_to_screen: false,
                filter: wgpu::FilterMode::Nearest,
            },
        )?;
        Ok(Self { post, color })
    }

    /// The current blend color.
    #[must_use]
    pub fn color(&self) -> Vec4 {
        self.color
    }

    /// Replace the blend color; takes effect on the next execute.
    pub fn set_color(&mut self, color: Vec4) {
        self.color = color;
        self.post.set_uniform(U_COLOR, UniformValue::Vec4(color));
    }
}
