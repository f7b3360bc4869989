//! Screen-space post-processing pipeline for 2D renderers, built on wgpu.
//!
//! Glaze takes a scene already rasterized into an off-screen
//! [`target::RenderTarget`] and runs it through an ordered chain of
//! full-screen shader passes — blur, posterize, brightness, color blend, or
//! arbitrary WGSL via [`pass::CustomPass`] — ending with a pass that writes
//! to the screen.
//!
//! # Key entry points
//!
//! - [`pipeline::Pipeline`] — the ordered pass container; one
//!   [`Pipeline::execute`](pipeline::Pipeline::execute) call per frame
//! - [`target::RenderTarget`] — off-screen color + depth/stencil storage
//! - [`pass`] — the built-in passes and the pass protocol
//! - [`gpu::RenderContext`] — device/queue/surface ownership
//!
//! # Frame anatomy
//!
//! ```text
//! scene rasterizer ──► initial RenderTarget
//!                          │
//!                          ▼  Pipeline::execute (ascending priority keys)
//!                blur ──► posterize ──► ... ──► output (to screen)
//! ```
//!
//! Every pass samples the previous pass's color attachment and draws shared
//! full-screen geometry into its own target; the terminal pass writes to
//! the swapchain. All of it is single-threaded and synchronous, on the
//! thread that owns the [`gpu::RenderContext`].
//!
//! ```no_run
//! use glaze::gpu::{RenderContext, ShaderComposer, TextureUnits};
//! use glaze::pass::{GaussianBlurPass, OutputPass, FrameContext, PassIo};
//! use glaze::{Pipeline, RenderTarget};
//!
//! # fn demo(ctx: &RenderContext) -> Result<(), Box<dyn std::error::Error>> {
//! let mut composer = ShaderComposer::new();
//! let mut pipeline = Pipeline::new();
//! pipeline.add(GaussianBlurPass::new(ctx, &mut composer)?, 4000)?;
//! pipeline.add(OutputPass::new(ctx, &mut composer)?, 5000)?;
//!
//! let scene = RenderTarget::new(ctx, "Scene", ctx.width(), ctx.height())?;
//! let mut units = TextureUnits::default();
//!
//! // Per frame, after the scene rasterizer has drawn into `scene`:
//! let surface = ctx.get_next_frame()?;
//! let screen = surface.texture.create_view(&Default::default());
//! let mut encoder = ctx.create_encoder();
//! units.reset();
//!
//! let input = PassIo::from_target(&scene, &mut units)?;
//! let mut frame = FrameContext {
//!     ctx,
//!     encoder: &mut encoder,
//!     units: &mut units,
//!     screen: &screen,
//! };
//! let _final = pipeline.execute(&mut frame, input)?;
//!
//! ctx.submit(encoder);
//! surface.present();
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod gpu;
pub mod options;
pub mod pass;
pub mod pipeline;
pub mod target;
pub mod uniform;

pub use error::PipelineError;
pub use options::EffectOptions;
pub use pass::{FrameContext, Pass, PassIo};
pub use pipeline::Pipeline;
pub use target::RenderTarget;
pub use uniform::{UniformStore, UniformValue};
