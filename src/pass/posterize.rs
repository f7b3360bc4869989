//! Color quantization.

use crate::error::PipelineError;
use crate::gpu::{RenderContext, ShaderComposer};
use crate::pass::post_process::{PostProcess, PostProcessDesc};
use crate::uniform::{UniformStore, UniformValue};

pub(crate) const FRAGMENT_SOURCE: &str =
    include_str!("../../assets/shaders/screen/posterize.wgsl");

const U_STEPS: &str = "u_steps";

/// Quantizes each color channel to `steps` levels:
/// `floor(c * steps) / steps`. Higher step counts give a smoother result.
pub struct PosterizePass {
    pub(crate) post: PostProcess,
    steps: f32,
}

impl PosterizePass {
    /// Compile the pass with the given step count.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidArgument`] if `steps < 1.0`, or
    /// [`PipelineError::ShaderCompilation`] if the bundled shader fails to
    /// compose.
    pub fn new(
        ctx: &RenderContext,
        composer: &mut ShaderComposer,
        steps: f32,
    ) -> Result<Self, PipelineError> {
        Self::validate(steps)?;

        let mut uniforms = UniformStore::new();
        let _ = uniforms.set(U_STEPS, UniformValue::Float(steps));

        let post = PostProcess::new(
            ctx,
            composer,
            PostProcessDesc {
                label: "Posterize",
                fragment_source: FRAGMENT_SOURCE,
                source_path: "screen/posterize.wgsl",
                uniforms,
                output_to_screen: false,
                filter: wgpu::FilterMode::Nearest,
            },
        )?;
        Ok(Self { post, steps })
    }

    fn validate(steps: f32) -> Result<(), PipelineError> {
        if steps < 1.0 {
            return Err(PipelineError::InvalidArgument(format!(
                "posterize steps must be greater than or equal to 1, got {steps}"
            )));
        }
        Ok(())
    }

    /// The number of quantization steps.
    #[must_use]
    pub fn steps(&self) -> f32 {
        self.steps
    }

    /// Replace the step count; takes effect on the next execute.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidArgument`] if `steps < 1.0`; the
    /// previous value is kept.
    pub fn set_steps(&mut self, steps: f32) -> Result<(), PipelineError> {
        Self::validate(steps)?;
        self.steps = steps;
        self.post.set_uniform(U_STEPS, UniformValue::Float(steps));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// CPU mirror of the shader's per-channel quantization.
    fn quantize(c: f32, steps: f32) -> f32 {
        (c * steps).floor() / steps
    }

    #[test]
    fn rejects_steps_below_one() {
        assert!(matches!(
            PosterizePass::validate(0.5),
            Err(PipelineError::InvalidArgument(_))
        ));
        assert!(matches!(
            PosterizePass::validate(-3.0),
            Err(PipelineError::InvalidArgument(_))
        ));
        assert!(PosterizePass::validate(1.0).is_ok());
        assert!(PosterizePass::validate(16.0).is_ok());
    }

    #[test]
    fn quantization_is_idempotent() {
        for steps in [1.0, 2.0, 4.0, 8.0, 255.0] {
            for i in 0..=100 {
                let c = i as f32 / 100.0;
                let once = quantize(c, steps);
                let twice = quantize(once, steps);
                assert_eq!(
                    once, twice,
                    "steps={steps} c={c}: quantize must be idempotent"
                );
            }
        }
    }

    #[test]
    fn one_step_collapses_to_black_below_full() {
        assert_eq!(quantize(0.999, 1.0), 0.0);
        assert_eq!(quantize(1.0, 1.0), 1.0);
    }
}
