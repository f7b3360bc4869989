//! The ordered pass container.
//!
//! A pipeline maps integer priority keys to owned passes and executes them
//! once per frame in ascending key order, feeding each pass's output into
//! the next pass's input.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::PipelineError;
use crate::gpu::RenderContext;
use crate::pass::{FrameContext, Pass, PassIo};

/// Priority-keyed slot storage. Keys are unique: registering into an
/// occupied slot is rejected rather than silently shadowing the resident.
///
/// Generic over the slot value so the ordering and collision semantics are
/// testable without GPU-backed passes.
pub(crate) struct PassSlots<T> {
    entries: BTreeMap<u32, T>,
}

impl<T> PassSlots<T> {
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Insert at `key`, failing with [`PipelineError::DuplicatePriorityKey`]
    /// if the slot is occupied. On failure the container is unchanged.
    pub(crate) fn insert(
        &mut self,
        key: u32,
        value: T,
    ) -> Result<(), PipelineError> {
        if self.entries.contains_key(&key) {
            return Err(PipelineError::DuplicatePriorityKey(key));
        }
        let _ = self.entries.insert(key, value);
        Ok(())
    }

    /// Remove and return the slot at `key`; `None` (and no other effect)
    /// when the slot is empty.
    pub(crate) fn remove(&mut self, key: u32) -> Option<T> {
        self.entries.remove(&key)
    }

    pub(crate) fn contains(&self, key: u32) -> bool {
        self.entries.contains_key(&key)
    }

    pub(crate) fn get(&self, key: u32) -> Option<&T> {
        self.entries.get(&key)
    }

    pub(crate) fn get_mut(&mut self, key: u32) -> Option<&mut T> {
        self.entries.get_mut(&key)
    }

    /// Slots in ascending key order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (u32, &T)> {
        self.entries.iter().map(|(&k, v)| (k, v))
    }

    /// Slots in ascending key order, mutably.
    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (u32, &mut T)> {
        self.entries.iter_mut().map(|(&k, v)| (k, v))
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for PassSlots<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// The ordered sequence of post-processing passes applied after the scene
/// is rendered, before the image reaches the screen.
///
/// Passes may be added and removed between frames to toggle effects at
/// runtime; never during an in-flight [`execute`](Self::execute).
#[derive(Default)]
pub struct Pipeline {
    slots: PassSlots<Pass>,
}

impl Pipeline {
    /// Create an empty pipeline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `pass` at `key`. The pass participates in every subsequent
    /// frame's execution in ascending-key order.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::DuplicatePriorityKey`] if `key` is already
    /// occupied; the pipeline (and the resident pass) are unchanged.
    pub fn add(
        &mut self,
        pass: impl Into<Pass>,
        key: u32,
    ) -> Result<(), PipelineError> {
        let pass = pass.into();
        log::debug!("registering pass '{}' at key {key}", pass.name());
        self.slots.insert(key, pass)
    }

    /// Remove and return the pass at `key`; subsequent frames skip it.
    /// A no-op returning `None` when the key is empty.
    pub fn remove(&mut self, key: u32) -> Option<Pass> {
        let removed = self.slots.remove(key);
        if let Some(pass) = removed.as_ref() {
            log::debug!("removed pass '{}' from key {key}", pass.name());
        }
        removed
    }

    /// Whether a pass is registered at `key`. Drives toggle behavior:
    /// add-if-absent, remove-if-present.
    #[must_use]
    pub fn has(&self, key: u32) -> bool {
        self.slots.contains(key)
    }

    /// The pass registered at `key`, if any.
    #[must_use]
    pub fn get(&self, key: u32) -> Option<&Pass> {
        self.slots.get(key)
    }

    /// The pass registered at `key`, mutably, for parameter updates.
    #[must_use]
    pub fn get_mut(&mut self, key: u32) -> Option<&mut Pass> {
        self.slots.get_mut(key)
    }

    /// Registered passes in execution order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &Pass)> {
        self.slots.iter()
    }

    /// Registered passes in execution order, mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (u32, &mut Pass)> {
        self.slots.iter_mut()
    }

    /// Number of registered passes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if no passes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Run the frame's compositing chain: fold over registered passes in
    /// strictly ascending key order, feeding each pass's output into the
    /// next pass's input. An empty pipeline returns `input` unchanged.
    ///
    /// Invoked once per frame, after the scene is rendered into the initial
    /// render target and `frame.units` has been reset.
    ///
    /// # Errors
    ///
    /// The first failing pass aborts the fold and its error propagates;
    /// nothing is caught or retried here. The calling engine loop decides
    /// whether to present the unprocessed scene or skip the frame.
    pub fn execute(
        &mut self,
        frame: &mut FrameContext<'_>,
        input: PassIo,
    ) -> Result<PassIo, PipelineError> {
        let mut current = input;
        for (key, pass) in self.slots.iter_mut() {
            log::trace!("executing pass '{}' at key {key}", pass.name());
            current = pass.execute(frame, &current)?;
        }
        Ok(current)
    }

    /// Forward a viewport resize to every pass-owned render target so
    /// off-screen buffers stay matched to the screen size.
    ///
    /// Must not be called during an in-flight [`execute`](Self::execute).
    ///
    /// # Errors
    ///
    /// Propagates the first attachment recreation failure.
    pub fn resize(
        &mut self,
        ctx: &RenderContext,
        width: u32,
        height: u32,
    ) -> Result<(), PipelineError> {
        for (_, pass) in self.slots.iter_mut() {
            pass.resize(ctx, width, height)?;
        }
        Ok(())
    }
}

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[Pipeline]")?;
        for (key, pass) in self.slots.iter() {
            writeln!(f, "({key}): {}", pass.name())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn executes_in_ascending_key_order_regardless_of_insertion() {
        let mut slots = PassSlots::new();
        slots.insert(100, "c").unwrap();
        slots.insert(50, "a").unwrap();
        slots.insert(75, "b").unwrap();

        let order: Vec<(u32, &str)> =
            slots.iter().map(|(k, &v)| (k, v)).collect();
        assert_eq!(order, [(50, "a"), (75, "b"), (100, "c")]);
    }

    #[test]
    fn duplicate_key_is_rejected_and_resident_survives() {
        let mut slots = PassSlots::new();
        slots.insert(10, "first").unwrap();

        let err = slots.insert(10, "second").expect_err("key 10 is occupied");
        assert!(matches!(err, PipelineError::DuplicatePriorityKey(10)));

        // The original registration still executes.
        assert_eq!(slots.get(10), Some(&"first"));
        assert_eq!(slots.len(), 1);
    }

    #[test]
    fn toggle_round_trip() {
        let mut slots = PassSlots::new();
        slots.insert(4500, "blend").unwrap();
        assert!(slots.contains(4500));

        assert_eq!(slots.remove(4500), Some("blend"));
        assert!(!slots.contains(4500));

        // Removing a never-added key is a no-op.
        assert_eq!(slots.remove(4500), None);
        assert!(slots.is_empty());
    }

    #[test]
    fn mutable_iteration_preserves_order() {
        let mut slots = PassSlots::new();
        slots.insert(2, 20).unwrap();
        slots.insert(1, 10).unwrap();
        slots.insert(3, 30).unwrap();

        for (_, v) in slots.iter_mut() {
            *v += 1;
        }
        let values: Vec<i32> = slots.iter().map(|(_, &v)| v).collect();
        assert_eq!(values, [11, 21, 31]);
    }
}
