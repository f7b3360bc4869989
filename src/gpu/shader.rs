//! Shader composition and CPU-side validation.
//!
//! Every post-processing pass compiles its fragment program once, at
//! construction. Composition runs through `naga_oil`, so a malformed program
//! is caught on the CPU — before any GPU resource for the pass exists — and
//! surfaces as [`PipelineError::ShaderCompilation`].

use std::borrow::Cow;

use naga_oil::compose::{
    ComposableModuleDescriptor, Composer, NagaModuleDescriptor, ShaderLanguage,
    ShaderType,
};

use crate::error::PipelineError;

/// The shared full-screen geometry module, imported by every pass shader as
/// `glaze::fullscreen`. Created once; the vertex stage generates a single
/// triangle covering the viewport, so no vertex buffers are ever bound.
pub const FULLSCREEN_MODULE: &str =
    include_str!("../../assets/shaders/modules/fullscreen.wgsl");

/// Wraps [`naga_oil::compose::Composer`] to provide shader composition with
/// `#import` support.
///
/// Pre-loads the shared fullscreen module at construction time. Pass shaders
/// use `#import glaze::fullscreen` to pull in the shared vertex stage, and
/// must declare the source texture at `@group(0) @binding(0)`, its sampler at
/// `@binding(1)`, and (if parameterized) a uniform params struct at
/// `@binding(2)` whose field order matches the pass's uniform registration
/// order.
pub struct ShaderComposer {
    composer: Composer,
}

impl Default for ShaderComposer {
    fn default() -> Self {
        Self::new()
    }
}

impl ShaderComposer {
    /// Create a composer with the shared fullscreen module registered.
    ///
    /// # Panics
    ///
    /// Panics if the bundled fullscreen module itself fails to parse; that is
    /// a build defect, not a runtime condition.
    #[must_use]
    pub fn new() -> Self {
        let mut composer = Composer::default();

        composer
            .add_composable_module(ComposableModuleDescriptor {
                source: FULLSCREEN_MODULE,
                file_path: "modules/fullscreen.wgsl",
                language: ShaderLanguage::Wgsl,
                ..Default::default()
            })
            .unwrap_or_else(|e| {
                panic!("failed to register fullscreen shader module: {e:?}")
            });

        Self { composer }
    }

    /// Compose a shader source into a `naga::Module` without touching the
    /// GPU. This is the construction-time validation gate for every pass.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::ShaderCompilation`] if the source fails to
    /// parse, compose, or validate.
    pub fn compose_naga(
        &mut self,
        source: &str,
        file_path: &str,
    ) -> Result<naga::Module, PipelineError> {
        self.composer
            .make_naga_module(NagaModuleDescriptor {
                source,
                file_path,
                shader_type: ShaderType::Wgsl,
                ..Default::default()
            })
            .map_err(|e| PipelineError::ShaderCompilation {
                path: file_path.to_owned(),
                message: e.to_string(),
            })
    }

    /// Compose a shader source string (which may contain `#import`
    /// directives) into a `wgpu::ShaderModule` ready for pipeline creation.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::ShaderCompilation`] if composition fails; no
    /// GPU module is created in that case.
    pub fn compose(
        &mut self,
        device: &wgpu::Device,
        label: &str,
        source: &str,
        file_path: &str,
    ) -> Result<wgpu::ShaderModule, PipelineError> {
        let naga_module = self.compose_naga(source, file_path)?;

        Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Naga(Cow::Owned(naga_module)),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pass;

    /// Shader source definitions for all bundled pass shaders.
    fn all_shader_sources() -> Vec<(&'static str, &'static str)> {
        vec![
            (pass::output::FRAGMENT_SOURCE, "screen/output.wgsl"),
            (pass::color_blend::FRAGMENT_SOURCE, "screen/color_blend.wgsl"),
            (
                pass::gaussian_blur::FRAGMENT_SOURCE,
                "screen/gaussian_blur.wgsl",
            ),
            (pass::posterize::FRAGMENT_SOURCE, "screen/posterize.wgsl"),
            (pass::brightness::FRAGMENT_SOURCE, "screen/brightness.wgsl"),
        ]
    }

    #[test]
    fn all_pass_shaders_compose() {
        let mut composer = ShaderComposer::new();
        for (source, file_path) in all_shader_sources() {
            let _ = composer
                .compose_naga(source, file_path)
                .unwrap_or_else(|e| {
                    panic!("shader '{file_path}' failed to compose: {e}")
                });
        }
    }

    #[test]
    fn malformed_shader_is_rejected_on_the_cpu() {
        let mut composer = ShaderComposer::new();
        // Missing the color output entirely; must fail before any GPU work.
        let broken = "@fragment fn fs_main() { let x = undefined_symbol; }";
        let err = composer
            .compose_naga(broken, "screen/broken.wgsl")
            .expect_err("broken shader must not compose");
        match err {
            PipelineError::ShaderCompilation { path, .. } => {
                assert_eq!(path, "screen/broken.wgsl");
            }
            other => panic!("expected ShaderCompilation, got {other}"),
        }
    }
}
