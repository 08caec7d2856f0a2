//! Symbol resolver (§4.7).
//!
//! Runs once per `link`, after the dynamic table has been scanned and
//! before any relocation is applied. For every symbol-table entry it binds
//! undefined references against the symbol map, rebases locally-defined
//! symbols by the buffer base, and republishes anything with global
//! binding back into the map — so a symbol this image defines is visible
//! to relocations against this same image, and (via the shared map) to
//! whatever the host links next.
//!
//! The resolved value is written back into the symbol table entry itself,
//! in place, inside the destination buffer. The relocator reads it back out
//! of that same slot. This in-place mutation is load-bearing, not
//! incidental — don't "clean it up" into a side table without also fixing
//! up the relocator's symbol index lookups.

use core::ffi::c_void;

use crate::elf::{self, Elf32Sym};
use crate::error::LinkError;
use crate::symtab::{hash, SymbolMap};

/// Reads a NUL-terminated name out of the string table at `strtab + off`.
unsafe fn strtab_name<'a>(strtab: usize, off: u32) -> &'a str {
    let ptr = (strtab + off as usize) as *const u8;
    let mut len = 0usize;
    while *ptr.add(len) != 0 {
        len += 1;
    }
    let bytes = core::slice::from_raw_parts(ptr, len);
    core::str::from_utf8_unchecked(bytes)
}

/// Reads the `index`-th entry of a symbol table living at `symtab`,
/// `syment` bytes per entry, inside the destination buffer (so this reads
/// buffer memory, not image memory).
unsafe fn sym_at(symtab: usize, syment: u32, index: u32) -> *mut Elf32Sym {
    (symtab + index as usize * syment as usize) as *mut Elf32Sym
}

/// Resolves every entry in `[1, count)` of the symbol table. Index 0 is the
/// reserved null symbol and is skipped, matching the spec.
pub(crate) fn resolve_symbols(
    strtab: usize,
    symtab: usize,
    syment: u32,
    count: u32,
    buf_base: usize,
    symbols: &mut SymbolMap,
) -> Result<(), LinkError> {
    for i in 1..count {
        let sym_ptr = unsafe { sym_at(symtab, syment, i) };
        let sym = unsafe { ptr_read(sym_ptr) };

        let resolved_value: u32;
        if sym.st_shndx == elf::SHN_UNDEF {
            let name = unsafe { strtab_name(strtab, sym.st_name) };
            let found = symbols.find(hash(name));
            match found {
                Some(addr) => {
                    resolved_value = addr as u32;
                }
                None => {
                    if sym.bind() == elf::STB_WEAK {
                        resolved_value = 0;
                    } else {
                        return Err(LinkError::UnresolvedSymbol);
                    }
                }
            }
            unsafe {
                (*sym_ptr).st_shndx = elf::SHN_ABS;
                (*sym_ptr).st_value = resolved_value;
            }
        } else if sym.st_shndx < elf::SHN_LORESERVE {
            resolved_value = sym.st_value.wrapping_add(buf_base as u32);
            unsafe {
                (*sym_ptr).st_shndx = elf::SHN_ABS;
                (*sym_ptr).st_value = resolved_value;
            }
        } else if sym.st_shndx == elf::SHN_ABS {
            resolved_value = sym.st_value;
        } else {
            return Err(LinkError::UnimplementedShndx);
        }

        if sym.bind() == elf::STB_GLOBAL {
            let name = unsafe { strtab_name(strtab, sym.st_name) };
            symbols.insert(hash(name), resolved_value as *mut c_void);
        }
    }
    Ok(())
}

unsafe fn ptr_read(p: *const Elf32Sym) -> Elf32Sym {
    core::ptr::read_unaligned(p)
}
