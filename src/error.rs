//! Error taxonomy for the post-processing pipeline.
//!
//! All failures here are synchronous: they surface at the call that caused
//! them and are never retried internally. Resource and shader errors are
//! startup/configuration failures; a per-frame `execute` failure aborts that
//! frame's composite and leaves the decision to degrade gracefully to the
//! calling engine loop.

use std::fmt;

/// Errors produced by render targets, passes, and the pipeline container.
#[derive(Debug)]
pub enum PipelineError {
    /// Allocating a render target's attachments failed (zero or oversized
    /// dimensions, or the device rejected the allocation). Fatal to that
    /// render path; not recoverable by retry.
    ResourceCreation {
        /// Label of the render target or pass that failed.
        label: String,
        /// Human-readable failure reason.
        reason: String,
    },
    /// A pass's fragment program failed to compose or validate at
    /// construction time. The pass is never created.
    ShaderCompilation {
        /// Source path of the offending shader.
        path: String,
        /// Composer/validator diagnostic.
        message: String,
    },
    /// A parameter was outside its documented range. The target or pass
    /// state is left unchanged.
    InvalidArgument(String),
    /// A pass was registered at a priority key that is already occupied.
    /// The pipeline is left unchanged.
    DuplicatePriorityKey(u32),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ResourceCreation { label, reason } => {
                write!(f, "failed to create render resources for '{label}': {reason}")
            }
            Self::ShaderCompilation { path, message } => {
                write!(f, "shader '{path}' failed to compile: {message}")
            }
            Self::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            Self::DuplicatePriorityKey(key) => {
                write!(f, "a pass is already registered at priority key {key}")
            }
        }
    }
}

impl std::error::Error for PipelineError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mentions_the_offending_key() {
        let err = PipelineError::DuplicatePriorityKey(4500);
        assert!(err.to_string().contains("4500"));
    }

    #[test]
    fn display_mentions_the_shader_path() {
        let err = PipelineError::ShaderCompilation {
            path: "screen/posterize.wgsl".into(),
            message: "unknown identifier".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("screen/posterize.wgsl"));
        assert!(msg.contains("unknown identifier"));
    }
}
