//! Per-frame texture unit bookkeeping.
//!
//! Passes share one allocator for the duration of a frame so their sampled
//! inputs never land on the same unit. The allocator is plain CPU state:
//! keeping the binding protocol explicit makes it testable without a GPU
//! device, and makes unit exhaustion a synchronous error instead of
//! undefined rendering output.

use crate::error::PipelineError;

/// Default number of simultaneously bindable texture units. Matches the
/// guaranteed minimum of `wgpu::Limits::max_sampled_textures_per_shader_stage`.
pub const DEFAULT_UNIT_CAPACITY: u32 = 16;

/// Tracks which texture units are already occupied during one frame's
/// pipeline execution. Must be [`reset`](Self::reset) at the start of every
/// frame to avoid unit exhaustion.
#[derive(Debug)]
pub struct TextureUnits {
    next: u32,
    capacity: u32,
}

impl Default for TextureUnits {
    fn default() -> Self {
        Self::new(DEFAULT_UNIT_CAPACITY)
    }
}

impl TextureUnits {
    /// Create an allocator with the given unit capacity.
    #[must_use]
    pub fn new(capacity: u32) -> Self {
        Self { next: 0, capacity }
    }

    /// Claim the next free unit for the named binding.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidArgument`] once all units are in use;
    /// this means a frame bound more textures than the device guarantees and
    /// a `reset` was likely missed.
    pub fn allocate(&mut self, label: &str) -> Result<u32, PipelineError> {
        if self.next >= self.capacity {
            return Err(PipelineError::InvalidArgument(format!(
                "texture units exhausted while binding '{label}' \
                 ({} of {} in use; was the allocator reset this frame?)",
                self.next, self.capacity
            )));
        }
        let unit = self.next;
        self.next += 1;
        log::trace!("texture unit {unit} -> {label}");
        Ok(unit)
    }

    /// Release every unit. Called once at the start of each frame, before the
    /// scene render target is bound.
    pub fn reset(&mut self) {
        self.next = 0;
    }

    /// Number of units handed out since the last reset.
    #[must_use]
    pub fn in_use(&self) -> u32 {
        self.next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocates_sequential_units() {
        let mut units = TextureUnits::default();
        assert_eq!(units.allocate("scene").unwrap(), 0);
        assert_eq!(units.allocate("blur input").unwrap(), 1);
        assert_eq!(units.allocate("lut").unwrap(), 2);
        assert_eq!(units.in_use(), 3);
    }

    #[test]
    fn reset_releases_every_unit() {
        let mut units = TextureUnits::new(4);
        for _ in 0..4 {
            let _ = units.allocate("pass input").unwrap();
        }
        units.reset();
        assert_eq!(units.in_use(), 0);
        assert_eq!(units.allocate("pass input").unwrap(), 0);
    }

    #[test]
    fn exhaustion_is_a_synchronous_error() {
        let mut units = TextureUnits::new(2);
        let _ = units.allocate("a").unwrap();
        let _ = units.allocate("b").unwrap();
        let err = units.allocate("c").expect_err("capacity is 2");
        assert!(matches!(err, PipelineError::InvalidArgument(_)));
        // A failed allocation leaves the allocator unchanged.
        assert_eq!(units.in_use(), 2);
    }
}
