//! Named, typed shader parameters.
//!
//! Each post-processing pass exposes its tunable parameters as named
//! uniforms. Storage is in-place and keyed by name: setting a uniform that
//! already exists replaces the value in its existing slot rather than
//! allocating a new binding, and slot order (first-registration order) is
//! what maps the store onto the pass's WGSL params struct.

use glam::{Vec2, Vec4};
use rustc_hash::FxHashMap;

/// A single uniform value. Variants mirror the types WGSL uniform structs
/// can hold for pass parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    /// A scalar `f32`.
    Float(f32),
    /// A `vec2<f32>`.
    Vec2(Vec2),
    /// A `vec4<f32>`.
    Vec4(Vec4),
}

impl UniformValue {
    /// WGSL uniform address space alignment of this value.
    fn align(self) -> usize {
        match self {
            Self::Float(_) => 4,
            Self::Vec2(_) => 8,
            Self::Vec4(_) => 16,
        }
    }

    /// Byte size of this value.
    fn size(self) -> usize {
        match self {
            Self::Float(_) => 4,
            Self::Vec2(_) => 8,
            Self::Vec4(_) => 16,
        }
    }

    fn write(self, out: &mut Vec<u8>) {
        match self {
            Self::Float(v) => out.extend_from_slice(bytemuck::bytes_of(&v)),
            Self::Vec2(v) => {
                out.extend_from_slice(bytemuck::cast_slice(&v.to_array()));
            }
            Self::Vec4(v) => {
                out.extend_from_slice(bytemuck::cast_slice(&v.to_array()));
            }
        }
    }
}

struct Slot {
    name: String,
    value: UniformValue,
}

/// Ordered, name-keyed uniform storage for one pass.
///
/// The packed byte layout follows WGSL uniform struct rules (`f32` aligned to
/// 4, `vec2` to 8, `vec4` to 16, total size rounded up to 16), so a store
/// whose slots were registered in the same order as the fields of the pass's
/// WGSL `Params` struct maps onto it byte-exactly.
#[derive(Default)]
pub struct UniformStore {
    slots: Vec<Slot>,
    index: FxHashMap<String, usize>,
}

impl UniformStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a uniform, or replace the value of an existing one in place.
    ///
    /// Returns `true` if a previous value was replaced. Replacement keeps the
    /// slot's position, so the packed layout never shifts under a live
    /// pipeline.
    pub fn set(&mut self, name: &str, value: UniformValue) -> bool {
        if let Some(&i) = self.index.get(name) {
            self.slots[i].value = value;
            return true;
        }
        let _ = self.index.insert(name.to_owned(), self.slots.len());
        self.slots.push(Slot {
            name: name.to_owned(),
            value,
        });
        false
    }

    /// Look up a uniform by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<UniformValue> {
        self.index.get(name).map(|&i| self.slots[i].value)
    }

    /// Number of registered uniforms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if no uniforms are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterate over `(name, value)` pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, UniformValue)> {
        self.slots.iter().map(|s| (s.name.as_str(), s.value))
    }

    /// Size in bytes of the packed struct, rounded up to 16 so the buffer
    /// always covers the WGSL struct's padded size.
    #[must_use]
    pub fn packed_size(&self) -> usize {
        let mut cursor = 0usize;
        for slot in &self.slots {
            cursor = align_to(cursor, slot.value.align());
            cursor += slot.value.size();
        }
        align_to(cursor, 16)
    }

    /// Pack every slot into `out` using WGSL uniform layout. `out` is cleared
    /// first; its final length equals [`packed_size`](Self::packed_size).
    pub fn pack_into(&self, out: &mut Vec<u8>) {
        out.clear();
        for slot in &self.slots {
            let padded = align_to(out.len(), slot.value.align());
            out.resize(padded, 0);
            slot.value.write(out);
        }
        let padded = align_to(out.len(), 16);
        out.resize(padded, 0);
    }
}

fn align_to(offset: usize, align: usize) -> usize {
    offset.div_ceil(align) * align
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_replaces_in_place_and_keeps_slot_order() {
        let mut store = UniformStore::new();
        assert!(!store.set("u_radius", UniformValue::Float(8.0)));
        assert!(!store.set("u_quality", UniformValue::Float(3.0)));

        // Same-name set replaces the existing binding entirely.
        assert!(store.set("u_radius", UniformValue::Float(2.0)));
        assert_eq!(store.get("u_radius"), Some(UniformValue::Float(2.0)));
        assert_eq!(store.len(), 2);

        let names: Vec<&str> = store.iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["u_radius", "u_quality"]);
    }

    #[test]
    fn packs_with_wgsl_uniform_alignment() {
        // Mirrors the gaussian blur params struct:
        //   resolution: vec2<f32>  @ 0
        //   radius:     f32        @ 8
        //   quality:    f32        @ 12
        //   directions: f32        @ 16
        let mut store = UniformStore::new();
        let _ = store.set("u_resolution", UniformValue::Vec2(Vec2::new(640.0, 360.0)));
        let _ = store.set("u_radius", UniformValue::Float(8.0));
        let _ = store.set("u_quality", UniformValue::Float(3.0));
        let _ = store.set("u_directions", UniformValue::Float(16.0));

        assert_eq!(store.packed_size(), 32);

        let mut bytes = Vec::new();
        store.pack_into(&mut bytes);
        assert_eq!(bytes.len(), 32);

        let floats: &[f32] = bytemuck::cast_slice(&bytes);
        assert_eq!(&floats[..5], &[640.0, 360.0, 8.0, 3.0, 16.0]);
    }

    #[test]
    fn vec4_after_float_pads_to_sixteen() {
        let mut store = UniformStore::new();
        let _ = store.set("u_steps", UniformValue::Float(4.0));
        let _ = store.set("u_color", UniformValue::Vec4(Vec4::ONE));

        // f32 @ 0, vec4 @ 16 -> 32 bytes total.
        assert_eq!(store.packed_size(), 32);

        let mut bytes = Vec::new();
        store.pack_into(&mut bytes);
        let floats: &[f32] = bytemuck::cast_slice(&bytes);
        assert_eq!(floats[0], 4.0);
        assert_eq!(&floats[4..8], &[1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn scalar_only_store_rounds_up_to_sixteen() {
        let mut store = UniformStore::new();
        let _ = store.set("u_brightness", UniformValue::Float(0.5));
        assert_eq!(store.packed_size(), 16);
    }

    #[test]
    fn empty_store_packs_to_nothing() {
        let store = UniformStore::new();
        assert!(store.is_empty());
        assert_eq!(store.packed_size(), 0);
        let mut bytes = vec![1, 2, 3];
        store.pack_into(&mut bytes);
        assert!(bytes.is_empty());
    }
}
