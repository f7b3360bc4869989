//! Post-processing passes.
//!
//! A pass consumes the previous pass's render and produces a new one via a
//! full-screen shader invocation. The built-in passes form a closed set of
//! variants dispatched through [`Pass::execute`]; arbitrary fragment
//! programs plug in through [`CustomPass`].

pub mod brightness;
pub mod color_blend;
pub mod custom;
pub mod gaussian_blur;
pub mod output;
pub mod post_process;
pub mod posterize;

pub use brightness::BrightnessPass;
pub use color_blend::ColorBlendPass;
pub use custom::{CustomPass, CustomPassDesc};
pub use gaussian_blur::GaussianBlurPass;
pub use output::OutputPass;
pub use post_process::{PostProcess, PostProcessDesc};
pub use posterize::PosterizePass;

use crate::error::PipelineError;
use crate::gpu::{RenderContext, TextureUnits};
use crate::target::RenderTarget;

/// The render a pass consumes or produces: a view of the color attachment
/// that was written, its size, and whether it is the screen itself.
///
/// Views are cheap handles; cloning one does not copy the underlying
/// texture, which stays exclusively owned by the pass (or caller) that
/// created it.
#[derive(Clone)]
pub struct PassIo {
    /// View of the produced color attachment.
    pub view: wgpu::TextureView,
    /// Width of the render in pixels.
    pub width: u32,
    /// Height of the render in pixels.
    pub height: u32,
    /// `true` when the render went to the screen's framebuffer, which the
    /// windowing layer presents; no further pass can sample it.
    pub screen: bool,
}

impl PassIo {
    /// Describe `target` as the input to the first pass of a frame,
    /// registering its color texture with the frame allocator.
    ///
    /// # Errors
    ///
    /// Propagates unit exhaustion from the allocator.
    pub fn from_target(
        target: &RenderTarget,
        units: &mut TextureUnits,
    ) -> Result<Self, PipelineError> {
        let _ = target.bind(units)?;
        Ok(Self {
            view: target.color_view().clone(),
            width: target.width(),
            height: target.height(),
            screen: false,
        })
    }
}

/// Per-execute state borrowed by every pass for the duration of one frame:
/// the GPU context, the frame's command encoder, the shared texture unit
/// allocator (reset at frame start), and the screen's texture view for
/// passes that output directly to it.
pub struct FrameContext<'a> {
    /// The GPU context.
    pub ctx: &'a RenderContext,
    /// Command encoder recording this frame.
    pub encoder: &'a mut wgpu::CommandEncoder,
    /// Shared texture unit bookkeeping, scoped to this frame.
    pub units: &'a mut TextureUnits,
    /// View of the swapchain texture being presented this frame.
    pub screen: &'a wgpu::TextureView,
}

/// A registered unit of work in the pipeline.
///
/// Passes are a closed set of variants rather than an open trait hierarchy:
/// the pipeline owns them by value and dispatches through a single
/// `execute` entry point.
pub enum Pass {
    /// Identity copy of the input to the screen.
    Output(OutputPass),
    /// Per-channel multiply by a constant color.
    ColorBlend(ColorBlendPass),
    /// Radial gaussian-style blur.
    GaussianBlur(GaussianBlurPass),
    /// Color quantization.
    Posterize(PosterizePass),
    /// HSV-space brightness lift.
    Brightness(BrightnessPass),
    /// Arbitrary user-supplied fragment program.
    Custom(CustomPass),
}

impl Pass {
    /// Stable name of the pass kind, used in diagnostics and the pipeline
    /// listing.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Output(_) => "output",
            Self::ColorBlend(_) => "color-blend",
            Self::GaussianBlur(_) => "gaussian-blur",
            Self::Posterize(_) => "posterize",
            Self::Brightness(_) => "brightness",
            Self::Custom(p) => p.label(),
        }
    }

    /// Whether this pass writes to the screen instead of an off-screen
    /// target.
    #[must_use]
    pub fn output_to_screen(&self) -> bool {
        self.post().output_to_screen()
    }

    /// Execute the pass: bind `input` for sampling, draw, and return the
    /// produced render for the next pass.
    ///
    /// # Errors
    ///
    /// A failing pass aborts the frame's pipeline fold; see
    /// [`PostProcess::execute`].
    pub fn execute(
        &mut self,
        frame: &mut FrameContext<'_>,
        input: &PassIo,
    ) -> Result<PassIo, PipelineError> {
        match self {
            Self::Output(p) => p.post.execute(frame, input),
            Self::ColorBlend(p) => p.post.execute(frame, input),
            Self::GaussianBlur(p) => p.execute(frame, input),
            Self::Posterize(p) => p.post.execute(frame, input),
            Self::Brightness(p) => p.post.execute(frame, input),
            Self::Custom(p) => p.post.execute(frame, input),
        }
    }

    /// Forward a viewport resize to the pass's owned render target.
    ///
    /// # Errors
    ///
    /// Propagates attachment recreation failures.
    pub fn resize(
        &mut self,
        ctx: &RenderContext,
        width: u32,
        height: u32,
    ) -> Result<(), PipelineError> {
        self.post_mut().resize(ctx, width, height)
    }

    fn post(&self) -> &PostProcess {
        match self {
            Self::Output(p) => &p.post,
            Self::ColorBlend(p) => &p.post,
            Self::GaussianBlur(p) => &p.post,
            Self::Posterize(p) => &p.post,
            Self::Brightness(p) => &p.post,
            Self::Custom(p) => &p.post,
        }
    }

    fn post_mut(&mut self) -> &mut PostProcess {
        match self {
            Self::Output(p) => &mut p.post,
            Self::ColorBlend(p) => &mut p.post,
            Self::GaussianBlur(p) => &mut p.post,
            Self::Posterize(p) => &mut p.post,
            Self::Brightness(p) => &mut p.post,
            Self::Custom(p) => &mut p.post,
        }
    }
}

impl From<OutputPass> for Pass {
    fn from(p: OutputPass) -> Self {
        Self::Output(p)
    }
}

impl From<ColorBlendPass> for Pass {
    fn from(p: ColorBlendPass) -> Self {
        Self::ColorBlend(p)
    }
}

impl From<GaussianBlurPass> for Pass {
    fn from(p: GaussianBlurPass) -> Self {
        Self::GaussianBlur(p)
    }
}

impl From<PosterizePass> for Pass {
    fn from(p: PosterizePass) -> Self {
        Self::Posterize(p)
    }
}

impl From<BrightnessPass> for Pass {
    fn from(p: BrightnessPass) -> Self {
        Self::Brightness(p)
    }
}

impl From<CustomPass> for Pass {
    fn from(p: CustomPass) -> Self {
        Self::Custom(p)
    }
}
