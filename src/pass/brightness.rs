//! HSV-space brightness lift.

use crate::error::PipelineError;
use crate::gpu::{RenderContext, ShaderComposer};
use crate::pass::post_process::{PostProcess, PostProcessDesc};
use crate::uniform::{UniformStore, UniformValue};

pub(crate) const FRAGMENT_SOURCE: &str =
    include_str!("../../assets/shaders/screen/brightness.wgsl");

const U_BRIGHTNESS: &str = "u_brightness";

/// Converts each pixel to an HSV-like representation, adds `brightness` to
/// the value channel clamped to 1, and converts back. Hue and saturation
/// are preserved, unlike a plain RGB add.
pub struct BrightnessPass {
    pub(crate) post: PostProcess,
    brightness: f32,
}

impl BrightnessPass {
    /// Compile the pass with the given brightness amount.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidArgument`] if `brightness` is outside
    /// `[0, 1]`, or [`PipelineError::ShaderCompilation`] if the bundled
    /// shader fails to compose.
    pub fn new(
        ctx: &RenderContext,
        composer: &mut ShaderComposer,
        brightness: f32,
    ) -> Result<Self, PipelineError> {
        Self::validate(brightness)?;

        let mut uniforms = UniformStore::new();
        let _ = uniforms.set(U_BRIGHTNESS, UniformValue::Float(brightness));

        let post = PostProcess::new(
            ctx,
            composer,
            PostProcessDesc {
                label: "Brightness",
                fragment_source: FRAGMENT_SOURCE,
                source_path: "screen/brightness.wgsl",
                uniforms,
                output_to_screen: false,
                filter: wgpu::FilterMode::Nearest,
            },
        )?;
        Ok(Self { post, brightness })
    }

    fn validate(brightness: f32) -> Result<(), PipelineError> {
        if !(0.0..=1.0).contains(&brightness) {
            return Err(PipelineError::InvalidArgument(format!(
                "brightness must be between 0 and 1 (inclusive), got {brightness}"
            )));
        }
        Ok(())
    }

    /// The amount added to the value channel.
    #[must_use]
    pub fn brightness(&self) -> f32 {
        self.brightness
    }

    /// Replace the brightness amount; takes effect on the next execute.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidArgument`] if `brightness` is outside
    /// `[0, 1]`; the previous value is kept.
    pub fn set_brightness(
        &mut self,
        brightness: f32,
    ) -> Result<(), PipelineError> {
        Self::validate(brightness)?;
        self.brightness = brightness;
        self.post
            .set_uniform(U_BRIGHTNESS, UniformValue::Float(brightness));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_the_whole_inclusive_range() {
        for b in [0.0, 0.25, 0.5, 0.999, 1.0] {
            assert!(BrightnessPass::validate(b).is_ok(), "brightness {b}");
        }
    }

    #[test]
    fn rejects_values_outside_zero_to_one() {
        for b in [-0.001, -1.0, 1.001, 2.0, f32::NAN] {
            assert!(
                matches!(
                    BrightnessPass::validate(b),
                    Err(PipelineError::InvalidArgument(_))
                ),
                "brightness {b} must be rejected"
            );
        }
    }
}
