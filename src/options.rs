//! Runtime effect options.
//!
//! A serializable bundle of every built-in pass parameter, for loading
//! presets from disk or driving the pipeline from a settings UI. Options
//! are plain data; [`EffectOptions::apply`] pushes them into whichever
//! passes are currently registered.

use glam::Vec4;
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;
use crate::pass::Pass;
use crate::pipeline::Pipeline;

/// Parameter values for the built-in passes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectOptions {
    /// Color-blend multiply color (RGBA, 0–1 per channel).
    pub blend_color: [f32; 4],
    /// Gaussian blur radius in pixels.
    pub blur_radius: f32,
    /// Gaussian blur samples per direction.
    pub blur_quality: f32,
    /// Gaussian blur direction count.
    pub blur_directions: f32,
    /// Posterize quantization steps (≥ 1).
    pub posterize_steps: f32,
    /// Brightness lift (0–1 inclusive).
    pub brightness: f32,
}

impl Default for EffectOptions {
    fn default() -> Self {
        Self {
            blend_color: [1.0, 1.0, 1.0, 1.0],
            blur_radius: crate::pass::gaussian_blur::DEFAULT_RADIUS,
            blur_quality: crate::pass::gaussian_blur::DEFAULT_QUALITY,
            blur_directions: crate::pass::gaussian_blur::DEFAULT_DIRECTIONS,
            posterize_steps: 8.0,
            brightness: 0.0,
        }
    }
}

impl EffectOptions {
    /// Push these values into every matching pass registered in `pipeline`.
    /// Passes without a matching option (output, custom) are untouched.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidArgument`] from the first pass setter
    /// whose value is out of range; earlier passes keep the applied values,
    /// the failing pass keeps its previous one.
    pub fn apply(&self, pipeline: &mut Pipeline) -> Result<(), PipelineError> {
        for (_, pass) in pipeline.iter_mut() {
            match pass {
                Pass::ColorBlend(p) => {
                    p.set_color(Vec4::from_array(self.blend_color));
                }
                Pass::GaussianBlur(p) => {
                    p.set_radius(self.blur_radius);
                    p.set_quality(self.blur_quality);
                    p.set_directions(self.blur_directions);
                }
                Pass::Posterize(p) => p.set_steps(self.posterize_steps)?,
                Pass::Brightness(p) => p.set_brightness(self.brightness)?,
                Pass::Output(_) | Pass::Custom(_) => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_pass_defaults() {
        let opts = EffectOptions::default();
        assert_eq!(opts.blend_color, [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(opts.blur_radius, 8.0);
        assert_eq!(opts.blur_quality, 3.0);
        assert_eq!(opts.blur_directions, 16.0);
        assert_eq!(opts.posterize_steps, 8.0);
        assert_eq!(opts.brightness, 0.0);
    }

    #[test]
    fn serde_round_trip() {
        let opts = EffectOptions {
            blend_color: [1.0, 0.0, 1.0, 1.0],
            blur_radius: 12.0,
            brightness: 0.3,
            ..Default::default()
        };
        let json = serde_json::to_string(&opts).unwrap();
        let back: EffectOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(back, opts);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let back: EffectOptions =
            serde_json::from_str(r#"{"brightness": 0.5}"#).unwrap();
        assert_eq!(back.brightness, 0.5);
        assert_eq!(back.blur_radius, 8.0);
    }
}
