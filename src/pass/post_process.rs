//! The shared engine behind every post-processing pass.
//!
//! A [`PostProcess`] owns one compiled full-screen pipeline, a sampler, the
//! pass's uniform store and buffer, and (unless the pass writes to the
//! screen) the render target it produces. Concrete passes wrap one of these
//! and layer typed, validated setters on top.

use crate::error::PipelineError;
use crate::gpu::{pipeline_util, RenderContext, ShaderComposer};
use crate::pass::{FrameContext, PassIo};
use crate::target::RenderTarget;
use crate::uniform::{UniformStore, UniformValue};

/// Construction parameters for a [`PostProcess`].
pub struct PostProcessDesc<'a> {
    /// Label used for GPU resource names and diagnostics.
    pub label: &'a str,
    /// WGSL fragment program. Must follow the pass shader contract: import
    /// `glaze::fullscreen`, sample `@group(0) @binding(0)` with the sampler
    /// at `@binding(1)`, and (when parameterized) declare a params struct at
    /// `@binding(2)` whose fields match the uniform registration order. The
    /// params binding is always present in the layout, so a program may
    /// declare it even when `uniforms` starts out empty.
    pub fragment_source: &'a str,
    /// Path reported in shader diagnostics.
    pub source_path: &'a str,
    /// Initial uniforms, registered in WGSL struct field order.
    pub uniforms: UniformStore,
    /// Write to the frame's screen view instead of an off-screen target.
    pub output_to_screen: bool,
    /// Filtering used when sampling the source render.
    pub filter: wgpu::FilterMode,
}

/// A full-screen-quad shader pass: binds the previous pass's render as a
/// sampled texture, runs a fragment program over the shared full-screen
/// geometry, and writes into its own render target or the screen.
pub struct PostProcess {
    label: String,
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    uniforms: UniformStore,
    uniform_buffer: wgpu::Buffer,
    uniforms_dirty: bool,
    packed: Vec<u8>,
    output_to_screen: bool,
    target: Option<RenderTarget>,
}

/// Smallest params buffer ever allocated. Uniform-less passes bind a zeroed
/// buffer of this size, so the layout can carry the params binding
/// unconditionally and uniforms registered after construction still have a
/// slot to grow into.
const MIN_PARAMS_BUFFER_SIZE: usize = 16;

fn params_buffer_size(packed: usize) -> usize {
    packed.max(MIN_PARAMS_BUFFER_SIZE)
}

fn bind_layout_entries() -> [wgpu::BindGroupLayoutEntry; 3] {
    [
        pipeline_util::texture_2d(0),
        pipeline_util::filtering_sampler(1),
        pipeline_util::uniform_buffer(2),
    ]
}

impl PostProcess {
    /// Compile the pass's shader and build its pipeline.
    ///
    /// The fragment program is composed and validated on the CPU first; a
    /// malformed program fails here with
    /// [`PipelineError::ShaderCompilation`] before any GPU resource for the
    /// pass exists, so no partially-constructed pass can ever be registered.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::ShaderCompilation`] if the fragment program
    /// does not compose or validate.
    pub fn new(
        ctx: &RenderContext,
        composer: &mut ShaderComposer,
        desc: PostProcessDesc<'_>,
    ) -> Result<Self, PipelineError> {
        let shader = composer.compose(
            &ctx.device,
            desc.label,
            desc.fragment_source,
            desc.source_path,
        )?;

        let bind_group_layout = ctx.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some(&format!("{} Bind Group Layout", desc.label)),
                entries: &bind_layout_entries(),
            },
        );

        let pipeline = pipeline_util::create_screen_space_pipeline(
            &ctx.device,
            desc.label,
            &shader,
            ctx.format(),
            None,
            &[&bind_group_layout],
        );

        let sampler = if desc.filter == wgpu::FilterMode::Linear {
            pipeline_util::linear_sampler(&ctx.device, desc.label)
        } else {
            pipeline_util::nearest_sampler(&ctx.device, desc.label)
        };

        let uniform_buffer = Self::create_uniform_buffer(
            ctx,
            desc.label,
            params_buffer_size(desc.uniforms.packed_size()),
        );

        log::debug!("pass '{}' compiled", desc.label);

        Ok(Self {
            label: desc.label.to_owned(),
            pipeline,
            bind_group_layout,
            sampler,
            uniforms: desc.uniforms,
            uniform_buffer,
            uniforms_dirty: true,
            packed: Vec::new(),
            output_to_screen: desc.output_to_screen,
            target: None,
        })
    }

    fn create_uniform_buffer(
        ctx: &RenderContext,
        label: &str,
        size: usize,
    ) -> wgpu::Buffer {
        ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{label} Params Buffer")),
            size: size as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Insert or replace a named uniform. The previous value at that name,
    /// if any, is overwritten in its existing slot; the GPU buffer is
    /// re-flushed on the next execute.
    pub fn set_uniform(&mut self, name: &str, value: UniformValue) {
        let _ = self.uniforms.set(name, value);
        self.uniforms_dirty = true;
    }

    /// Current value of a named uniform.
    #[must_use]
    pub fn uniform(&self, name: &str) -> Option<UniformValue> {
        self.uniforms.get(name)
    }

    /// Whether this pass writes to the screen instead of an off-screen
    /// target.
    #[must_use]
    pub fn output_to_screen(&self) -> bool {
        self.output_to_screen
    }

    /// The pass label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The render target this pass last wrote into, if it owns one.
    #[must_use]
    pub fn target(&self) -> Option<&RenderTarget> {
        self.target.as_ref()
    }

    /// Forward a viewport resize to the pass's owned render target. Targets
    /// are also resized lazily at execute time to match their input, so this
    /// exists to keep off-screen buffers matched to the screen between
    /// frames.
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
        if let Some(target) = self.target.as_mut() {
            let _ = target.resize(ctx, width, height)?;
        }
        Ok(())
    }

    fn flush_uniforms(&mut self, ctx: &RenderContext) {
        if self.uniforms.is_empty() {
            // Nothing to write; the placeholder buffer stays zeroed.
            return;
        }

        let needed = self.uniforms.packed_size();
        if self.uniform_buffer.size() < needed as u64 {
            // The store grew since construction (custom passes may register
            // uniforms late); the old buffer is too small to rebind.
            self.uniform_buffer =
                Self::create_uniform_buffer(ctx, &self.label, needed);
            self.uniforms_dirty = true;
        }

        if self.uniforms_dirty {
            self.uniforms.pack_into(&mut self.packed);
            ctx.queue.write_buffer(&self.uniform_buffer, 0, &self.packed);
            self.uniforms_dirty = false;
        }
    }

    /// Run the pass: sample `input`, draw the full-screen geometry with this
    /// pass's shader and uniforms, and return what was written.
    ///
    /// The draw is strictly sequential: the encoded render pass ends before
    /// this returns, so the next pass observes a fully produced input.
    ///
    /// # Errors
    ///
    /// Fails on texture unit exhaustion or if the output target cannot be
    /// (re)created at the input size.
    pub fn execute(
        &mut self,
        frame: &mut FrameContext<'_>,
        input: &PassIo,
    ) -> Result<PassIo, PipelineError> {
        // Record the source binding with the frame allocator so other
        // bindings this frame cannot collide with it.
        let unit = frame.units.allocate(&self.label)?;
        log::trace!(
            "pass '{}': source on unit {unit}, input {}x{}",
            self.label,
            input.width,
            input.height
        );

        let output = if self.output_to_screen {
            PassIo {
                view: frame.screen.clone(),
                width: frame.ctx.width(),
                height: frame.ctx.height(),
                screen: true,
            }
        } else {
            // The output target tracks the input size, so ping-ponged
            // targets follow viewport resizes without explicit plumbing.
            match self.target.as_mut() {
                Some(target) => {
                    let _ =
                        target.resize(frame.ctx, input.width, input.height)?;
                    PassIo {
                        view: target.color_view().clone(),
                        width: target.width(),
                        height: target.height(),
                        screen: false,
                    }
                }
                None => {
                    let target = RenderTarget::new(
                        frame.ctx,
                        &format!("{} Output", self.label),
                        input.width,
                        input.height,
                    )?;
                    let io = PassIo {
                        view: target.color_view().clone(),
                        width: target.width(),
                        height: target.height(),
                        screen: false,
                    };
                    self.target = Some(target);
                    io
                }
            }
        };

        self.flush_uniforms(frame.ctx);

        let bind_group =
            frame.ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(&format!("{} Bind Group", self.label)),
                layout: &self.bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(
                            &input.view,
                        ),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(
                            &self.sampler,
                        ),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: self.uniform_buffer.as_entire_binding(),
                    },
                ],
            });

        {
            let mut pass = frame.encoder.begin_render_pass(
                &wgpu::RenderPassDescriptor {
                    label: Some(&self.label),
                    color_attachments: &[Some(
                        wgpu::RenderPassColorAttachment {
                            view: &output.view,
                            depth_slice: None,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                                store: wgpu::StoreOp::Store,
                            },
                        },
                    )],
                    depth_stencil_attachment: None,
                    ..Default::default()
                },
            );

            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            pass.draw(0..3, 0..1);
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec2, Vec4};

    #[test]
    fn bind_layout_always_exposes_the_params_binding() {
        // The layout is fixed at construction, so a pass built with an empty
        // uniform store must still be able to bind uniforms registered
        // later. Every bind group carries bindings 0..=2.
        let bindings: Vec<u32> =
            bind_layout_entries().iter().map(|e| e.binding).collect();
        assert_eq!(bindings, [0, 1, 2]);
    }

    #[test]
    fn params_buffer_covers_an_initially_empty_store() {
        let mut store = UniformStore::new();
        assert!(store.is_empty());
        // A uniform-less pass still owns a bindable placeholder buffer.
        let initial = params_buffer_size(store.packed_size());
        assert_eq!(initial, MIN_PARAMS_BUFFER_SIZE);

        // First late-registered uniform fits the placeholder; no regrow.
        let _ = store.set("u_strength", UniformValue::Float(0.5));
        assert!(store.packed_size() <= initial);

        // Growing past the placeholder forces a larger buffer.
        let _ = store.set("u_center", UniformValue::Vec2(Vec2::ZERO));
        let _ = store.set("u_tint", UniformValue::Vec4(Vec4::ONE));
        let grown = params_buffer_size(store.packed_size());
        assert!(grown > initial);
        assert_eq!(grown, store.packed_size());
    }
}
