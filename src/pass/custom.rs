//! User-supplied post-processing passes.

use crate::error::PipelineError;
use crate::gpu::{RenderContext, ShaderComposer};
use crate::pass::post_process::{PostProcess, PostProcessDesc};
use crate::uniform::{UniformStore, UniformValue};

/// Construction parameters for a [`CustomPass`].
pub struct CustomPassDesc<'a> {
    /// Label used for GPU resource names and the pipeline listing.
    pub label: &'a str,
    /// WGSL fragment program; see the shader contract below.
    pub fragment_source: &'a str,
    /// Path reported in shader diagnostics.
    pub source_path: &'a str,
    /// Initial uniforms, registered in WGSL params struct field order.
    pub uniforms: UniformStore,
    /// Write to the screen instead of an off-screen target.
    pub output_to_screen: bool,
    /// Filtering used when sampling the source render.
    pub filter: wgpu::FilterMode,
}

/// A post-processing pass running an arbitrary fragment program.
///
/// The program must follow the same contract as the built-in passes:
///
/// ```wgsl
/// #import glaze::fullscreen::{VertexOutput, fullscreen_vertex}
///
/// @group(0) @binding(0) var source_texture: texture_2d<f32>;
/// @group(0) @binding(1) var source_sampler: sampler;
/// // With uniforms: a params struct at @group(0) @binding(2) whose fields
/// // match the registration order of the uniform store.
///
/// @vertex
/// fn vs_main(@builtin(vertex_index) index: u32) -> VertexOutput {
///     return fullscreen_vertex(index);
/// }
///
/// @fragment
/// fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
///     return textureSample(source_texture, source_sampler, in.uv);
/// }
/// ```
///
/// A program that fails to compose is rejected at construction; a program
/// that composes but diverges from the binding contract produces undefined
/// rendering output, not an error.
pub struct CustomPass {
    pub(crate) post: PostProcess,
}

impl CustomPass {
    /// Compile a custom pass.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::ShaderCompilation`] if the fragment program
    /// fails to compose or validate; no pass is created.
    pub fn new(
        ctx: &RenderContext,
        composer: &mut ShaderComposer,
        desc: CustomPassDesc<'_>,
    ) -> Result<Self, PipelineError> {
        let post = PostProcess::new(
            ctx,
            composer,
            PostProcessDesc {
                label: desc.label,
                fragment_source: desc.fragment_source,
                source_path: desc.source_path,
                uniforms: desc.uniforms,
                output_to_screen: desc.output_to_screen,
                filter: desc.filter,
            },
        )?;
        Ok(Self { post })
    }

    /// The pass label.
    #[must_use]
    pub fn label(&self) -> &str {
        self.post.label()
    }

    /// Insert or replace a named uniform. New uniforms may be registered
    /// after construction; the params buffer grows on the next execute.
    pub fn set_uniform(&mut self, name: &str, value: UniformValue) {
        self.post.set_uniform(name, value);
    }

    /// Current value of a named uniform.
    #[must_use]
    pub fn uniform(&self, name: &str) -> Option<UniformValue> {
        self.post.uniform(name)
    }
}
