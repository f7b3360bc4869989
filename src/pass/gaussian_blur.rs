//! Radial gaussian-style blur.

use glam::Vec2;

use crate::error::PipelineError;
use crate::gpu::{RenderContext, ShaderComposer};
use crate::pass::post_process::{PostProcess, PostProcessDesc};
use crate::pass::{FrameContext, PassIo};
use crate::uniform::{UniformStore, UniformValue};

pub(crate) const FRAGMENT_SOURCE: &str =
    include_str!("../../assets/shaders/screen/gaussian_blur.wgsl");

const U_RESOLUTION: &str = "u_resolution";
const U_RADIUS: &str = "u_radius";
const U_QUALITY: &str = "u_quality";
const U_DIRECTIONS: &str = "u_directions";

/// Default blur radius in pixels.
pub const DEFAULT_RADIUS: f32 = 8.0;
/// Default samples per direction.
pub const DEFAULT_QUALITY: f32 = 3.0;
/// Default number of blur directions.
pub const DEFAULT_DIRECTIONS: f32 = 16.0;

/// Blurs the input by sampling `directions` evenly spaced angles with
/// `quality` radial steps each out to `radius` pixels, then averaging by
/// `directions * quality`.
pub struct GaussianBlurPass {
    pub(crate) post: PostProcess,
    radius: f32,
    quality: f32,
    directions: f32,
}

impl GaussianBlurPass {
    /// Compile the pass with the default radius/quality/directions.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::ShaderCompilation`] if the bundled shader
    /// fails to compose.
    pub fn new(
        ctx: &RenderContext,
        composer: &mut ShaderComposer,
    ) -> Result<Self, PipelineError> {
        Self::with_params(
            ctx,
            composer,
            DEFAULT_RADIUS,
            DEFAULT_QUALITY,
            DEFAULT_DIRECTIONS,
        )
    }

    /// Compile the pass with explicit blur parameters.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::ShaderCompilation`] if the bundled shader
    /// fails to compose.
    pub fn with_params(
        ctx: &RenderContext,
        composer: &mut ShaderComposer,
        radius: f32,
        quality: f32,
        directions: f32,
    ) -> Result<Self, PipelineError> {
        // Registration order mirrors the WGSL BlurParams struct.
        let mut uniforms = UniformStore::new();
        let _ = uniforms.set(U_RESOLUTION, UniformValue::Vec2(Vec2::ONE));
        let _ = uniforms.set(U_RADIUS, UniformValue::Float(radius));
        let _ = uniforms.set(U_QUALITY, UniformValue::Float(quality));
        let _ = uniforms.set(U_DIRECTIONS, UniformValue::Float(directions));

        let post = PostProcess::new(
            ctx,
            composer,
            PostProcessDesc {
                label: "Gaussian Blur",
                fragment_source: FRAGMENT_SOURCE,
                source_path: "screen/gaussian_blur.wgsl",
                uniforms,
                // Off-center taps land between texels; linear filtering
                // turns each tap into a free 4-texel average.
                filter: wgpu::FilterMode::Linear,
                output_to_screen: false,
            },
        )?;

        Ok(Self {
            post,
            radius,
            quality,
            directions,
        })
    }

    /// The blur radius in pixels.
    #[must_use]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Replace the blur radius; takes effect on the next execute.
    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius;
        self.post.set_uniform(U_RADIUS, UniformValue::Float(radius));
    }

    /// Samples per direction.
    #[must_use]
    pub fn quality(&self) -> f32 {
        self.quality
    }

    /// Replace the sample count per direction; takes effect on the next
    /// execute.
    pub fn set_quality(&mut self, quality: f32) {
        self.quality = quality;
        self.post.set_uniform(U_QUALITY, UniformValue::Float(quality));
    }

    /// Number of blur directions.
    #[must_use]
    pub fn directions(&self) -> f32 {
        self.directions
    }

    /// Replace the number of blur directions; takes effect on the next
    /// execute.
    pub fn set_directions(&mut self, directions: f32) {
        self.directions = directions;
        self.post
            .set_uniform(U_DIRECTIONS, UniformValue::Float(directions));
    }

    /// Execute, refreshing the resolution uniform from the input size so the
    /// pixel-space radius stays correct across resizes.
    pub(crate) fn execute(
        &mut self,
        frame: &mut FrameContext<'_>,
        input: &PassIo,
    ) -> Result<PassIo, PipelineError> {
        self.post.set_uniform(
            U_RESOLUTION,
            UniformValue::Vec2(Vec2::new(
                input.width as f32,
                input.height as f32,
            )),
        );
        self.post.execute(frame, input)
    }
}
