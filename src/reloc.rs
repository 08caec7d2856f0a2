//! Relocator (§4.8).
//!
//! Applies one relocation table at a time against the destination buffer.
//! `rel` is called once for `DT_REL` and once more for `DT_JMPREL` if a PLT
//! is present. The symbol values it reads out of the symbol table have
//! already been resolved to final absolute addresses by the resolver —
//! the relocator never looks anything up itself.

use crate::elf::{r_arm, Elf32Rel, Elf32Sym};
use crate::error::LinkError;

/// Applies every entry of a REL table.
///
/// `table` is an absolute (image) address; `buf_base` is where the
/// destination buffer starts, and every `r_offset` is relative to it.
/// Stops at the first unsupported relocation type, leaving any later
/// entries in the table unapplied.
pub(crate) fn apply_rel_table(
    buf_base: usize,
    table: usize,
    table_len: u32,
    entry_size: u32,
    symtab: usize,
    syment: u32,
) -> Result<(), LinkError> {
    let mut off = 0u32;
    while off < table_len {
        let rel = unsafe { core::ptr::read_unaligned((table + off as usize) as *const Elf32Rel) };
        let sym = unsafe {
            core::ptr::read_unaligned((symtab + rel.sym() as usize * syment as usize) as *const Elf32Sym)
        };
        let reference = (buf_base + rel.r_offset as usize) as *mut u32;

        match rel.r_type() as u32 {
            r_arm::R_ARM_ABS32 => unsafe {
                *reference = (*reference).wrapping_add(sym.st_value);
            },
            r_arm::R_ARM_JUMP_SLOT => unsafe {
                *reference = sym.st_value;
            },
            r_arm::R_ARM_RELATIVE => unsafe {
                *reference = (*reference).wrapping_add(buf_base as u32);
            },
            _ => return Err(LinkError::UnimplementedRelocation),
        }

        off += entry_size;
    }
    Ok(())
}
