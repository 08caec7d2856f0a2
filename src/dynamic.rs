//! Dynamic-table reader (§4.6).
//!
//! Scans the single `PT_DYNAMIC` segment and collects the pointers and
//! sizes the resolver and relocator need. Note the asymmetry the spec
//! insists on preserving: `strtab`/`rel`/`jmprel` are addresses into the
//! *image*, while `symtab`/`init_array`/`fini_array` are addresses into the
//! *destination buffer*. That's not a bug to "fix" — it's how the compiler
//! emitted these references and both this reader and the resolver/relocator
//! downstream depend on it.

use crate::elf::{self, dt, Elf32Phdr};
use crate::error::LinkError;
use crate::image::Image;

/// Everything pulled out of the dynamic table for one `link` call.
#[derive(Default)]
pub(crate) struct DynamicInfo {
    pub(crate) pltrelsz: u32,
    /// Image-relative address of the ELF hash table.
    pub(crate) hash: Option<usize>,
    /// Image-relative address of the string table.
    pub(crate) strtab: Option<usize>,
    /// Buffer-relative address of the symbol table.
    pub(crate) symtab: Option<usize>,
    pub(crate) strsz: u32,
    pub(crate) syment: u32,
    /// Image-relative address of the REL table.
    pub(crate) rel: Option<usize>,
    pub(crate) relsz: u32,
    pub(crate) relent: u32,
    /// Image-relative address of the PLT/jump-slot REL table.
    pub(crate) jmprel: Option<usize>,
    /// Buffer-relative address of the init array.
    pub(crate) init_array: Option<usize>,
    pub(crate) init_array_count: u32,
    /// Buffer-relative address of the fini array.
    pub(crate) fini_array: Option<usize>,
    pub(crate) fini_array_count: u32,
}

/// Locates the `PT_DYNAMIC` segment among `header.e_phnum` program headers.
pub(crate) fn find_dynamic_segment(image: &Image, header: &elf::Elf32Ehdr) -> Option<Elf32Phdr> {
    for i in 0..header.e_phnum {
        let phdr = image.program_header(header, i);
        if phdr.p_type == elf::PT_DYNAMIC {
            return Some(phdr);
        }
    }
    None
}

/// Scans the dynamic table. `buf_base` is the destination buffer's address,
/// needed because `symtab`/`init_array`/`fini_array` tags are recorded
/// relative to it rather than to the image.
pub(crate) fn read_dynamic_table(
    image: &Image,
    dyn_phdr: &Elf32Phdr,
    buf_base: usize,
) -> Result<DynamicInfo, LinkError> {
    let mut info = DynamicInfo::default();
    let mut addr = image.base() + dyn_phdr.p_offset as usize;

    loop {
        let entry = image.dyn_entry(addr);
        match entry.d_tag {
            dt::NULL => break,
            dt::NEEDED => return Err(LinkError::Dependency),
            dt::PLTRELSZ => info.pltrelsz = entry.d_val,
            dt::HASH => info.hash = Some(image.base() + entry.d_val as usize),
            dt::STRTAB => info.strtab = Some(image.base() + entry.d_val as usize),
            dt::SYMTAB => info.symtab = Some(buf_base + entry.d_val as usize),
            dt::STRSZ => info.strsz = entry.d_val,
            dt::SYMENT => info.syment = entry.d_val,
            dt::REL => info.rel = Some(image.base() + entry.d_val as usize),
            dt::RELSZ => info.relsz = entry.d_val,
            dt::RELENT => info.relent = entry.d_val,
            dt::JMPREL => info.jmprel = Some(image.base() + entry.d_val as usize),
            dt::INIT_ARRAY => info.init_array = Some(buf_base + entry.d_val as usize),
            dt::INIT_ARRAYSZ => info.init_array_count = entry.d_val / 4,
            dt::FINI_ARRAY => info.fini_array = Some(buf_base + entry.d_val as usize),
            dt::FINI_ARRAYSZ => info.fini_array_count = entry.d_val / 4,
            dt::PLTGOT | dt::INIT | dt::FINI | dt::PLTREL | dt::TEXTREL | dt::GNU_VENDOR_RELCOUNT => {}
            // RELA/RELASZ/RELAENT/SONAME/RPATH/SYMBOLIC/DEBUG: not produced
            // by the REL-only ARM toolchain this linker targets, and not in
            // the ignore list the spec pins, so an image carrying one is
            // fatal like any other unrecognized tag.
            _ => return Err(LinkError::DTag),
        }
        addr += elf::DYN_SIZE;
    }

    if info.hash.is_none()
        || info.strtab.is_none()
        || info.symtab.is_none()
        || info.syment == 0
        || info.strsz == 0
    {
        return Err(LinkError::MissingEntries);
    }

    Ok(info)
}

/// The symbol count, derived from the hash table's second word
/// (`[nbucket, nchain]`; `nchain` equals the symbol table's entry count).
pub(crate) fn symbol_count(image: &Image, info: &DynamicInfo) -> u32 {
    image.read_u32(info.hash.unwrap() + 4)
}
