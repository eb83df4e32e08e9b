//! Per-module layout oracle.

use crate::module::Module;
use crate::types::{Type, TypeId};

/// Layout rules for a module.
#[derive(Clone, Copy, Debug)]
pub struct DataLayout {
    /// Pointer width in bits.
    pub ptr_bits: u32,
}

impl DataLayout {
    /// Create a layout with the given pointer width.
    pub const fn new(ptr_bits: u32) -> Self {
        Self { ptr_bits }
    }

    /// Pointer size in bytes.
    pub const fn ptr_bytes(&self) -> u64 {
        self.ptr_bits.div_ceil(8) as u64
    }
}

impl Default for DataLayout {
    fn default() -> Self {
        Self { ptr_bits: 64 }
    }
}

fn align_to(offset: u64, align: u64) -> u64 {
    if align <= 1 {
        offset
    } else {
        offset.div_ceil(align) * align
    }
}

impl Module {
    /// In-memory size of a type in bytes, including internal and tail
    /// padding for aggregates.
    pub fn store_size(&self, id: TypeId) -> u64 {
        match self.ty(id) {
            Type::Void | Type::Label | Type::Function { .. } => 0,
            Type::Int { bits } | Type::Float { bits } => u64::from(bits.div_ceil(8)),
            Type::Ptr { .. } => self.layout.ptr_bytes(),
            Type::Array { elem, len } => self.store_size(*elem) * len,
            Type::Struct { fields, packed, .. } => {
                let mut size = 0u64;
                for &field in fields {
                    if !packed {
                        size = align_to(size, self.abi_align(field));
                    }
                    size += self.store_size(field);
                }
                if *packed {
                    size
                } else {
                    align_to(size, self.abi_align(id))
                }
            }
        }
    }

    /// ABI alignment of a type in bytes.
    pub fn abi_align(&self, id: TypeId) -> u64 {
        match self.ty(id) {
            Type::Void | Type::Label | Type::Function { .. } => 1,
            Type::Int { bits } | Type::Float { bits } => {
                u64::from(bits.div_ceil(8)).next_power_of_two().min(8)
            }
            Type::Ptr { .. } => self.layout.ptr_bytes(),
            Type::Array { elem, .. } => self.abi_align(*elem),
            Type::Struct { fields, packed, .. } => {
                if *packed {
                    1
                } else {
                    fields
                        .iter()
                        .map(|&f| self.abi_align(f))
                        .max()
                        .unwrap_or(1)
                }
            }
        }
    }

    /// Byte offset of a field within an aggregate type.
    pub fn field_offset(&self, id: TypeId, field_index: u64) -> Option<u64> {
        let Type::Struct { fields, packed, .. } = self.ty(id) else {
            return None;
        };
        if field_index as usize >= fields.len() {
            return None;
        }
        let mut offset = 0u64;
        for (i, &field) in fields.iter().enumerate() {
            if !packed {
                offset = align_to(offset, self.abi_align(field));
            }
            if i as u64 == field_index {
                return Some(offset);
            }
            offset += self.store_size(field);
        }
        None
    }

    /// Accumulated constant byte offset of a member/array access with the
    /// given source type and constant index sequence. The first index
    /// steps over the base pointer.
    pub fn gep_constant_offset(&self, source: TypeId, indices: &[u64]) -> Option<u64> {
        let mut offset = 0u64;
        let mut cur = source;
        for (pos, &idx) in indices.iter().enumerate() {
            if pos == 0 {
                offset += idx * self.store_size(cur);
                continue;
            }
            match self.ty(cur) {
                Type::Struct { fields, .. } => {
                    offset += self.field_offset(cur, idx)?;
                    cur = *fields.get(idx as usize)?;
                }
                Type::Array { elem, .. } => {
                    offset += idx * self.store_size(*elem);
                    cur = *elem;
                }
                _ => return None,
            }
        }
        Some(offset)
    }

    /// The type reached by applying the given index prefix to a
    /// member/array access source type. An empty prefix yields the source
    /// type; the first index steps over the base pointer without changing
    /// the type.
    pub fn gep_indexed_type(&self, source: TypeId, indices: &[u64]) -> Option<TypeId> {
        let mut cur = source;
        for (pos, &idx) in indices.iter().enumerate() {
            if pos == 0 {
                continue;
            }
            cur = match self.ty(cur) {
                Type::Struct { fields, .. } => *fields.get(idx as usize)?,
                Type::Array { elem, .. } => *elem,
                _ => return None,
            };
        }
        Some(cur)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ModuleBuilder;

    #[test]
    fn test_struct_size_with_padding() {
        let mut m = ModuleBuilder::new("m", 64);
        let i8t = m.int(8);
        let i32t = m.int(32);
        // { i8, i32 } -> 1 + 3 pad + 4 = 8
        let st = m.structure("pair", &[i8t, i32t], false);
        let module = m.build();
        assert_eq!(module.store_size(st), 8);
        assert_eq!(module.abi_align(st), 4);
        assert_eq!(module.field_offset(st, 0), Some(0));
        assert_eq!(module.field_offset(st, 1), Some(4));
    }

    #[test]
    fn test_packed_struct_size() {
        let mut m = ModuleBuilder::new("m", 64);
        let i8t = m.int(8);
        let i32t = m.int(32);
        let st = m.structure("packed_pair", &[i8t, i32t], true);
        let module = m.build();
        assert_eq!(module.store_size(st), 5);
        assert_eq!(module.abi_align(st), 1);
    }

    #[test]
    fn test_array_and_pointer_sizes() {
        let mut m = ModuleBuilder::new("m", 32);
        let i16t = m.int(16);
        let arr = m.array(i16t, 10);
        let ptr = m.ptr(i16t);
        let module = m.build();
        assert_eq!(module.store_size(arr), 20);
        assert_eq!(module.store_size(ptr), 4);
    }

    #[test]
    fn test_gep_constant_offset() {
        let mut m = ModuleBuilder::new("m", 64);
        let i32t = m.int(32);
        let i64t = m.int(64);
        // { i32, i64 }: field 1 at offset 8
        let st = m.structure("s", &[i32t, i64t], false);
        let module = m.build();
        assert_eq!(module.gep_constant_offset(st, &[0, 1]), Some(8));
        // One struct step over the pointer, then field 0
        assert_eq!(module.gep_constant_offset(st, &[1, 0]), Some(16));
    }

    #[test]
    fn test_gep_indexed_type() {
        let mut m = ModuleBuilder::new("m", 64);
        let i32t = m.int(32);
        let inner = m.structure("inner", &[i32t], false);
        let outer = m.structure("outer", &[i32t, inner], false);
        let module = m.build();
        assert_eq!(module.gep_indexed_type(outer, &[]), Some(outer));
        assert_eq!(module.gep_indexed_type(outer, &[0]), Some(outer));
        assert_eq!(module.gep_indexed_type(outer, &[0, 1]), Some(inner));
        assert_eq!(module.gep_indexed_type(outer, &[0, 1, 0]), Some(i32t));
    }
}
