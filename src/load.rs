//! Segment loader (§4.5).
//!
//! Copies every `PT_LOAD` segment's file content into the destination
//! buffer at its virtual address, then zero-fills the remainder of its
//! memory image. Segments are walked in program-header order and are
//! assumed not to overlap; the loader performs no alignment correction of
//! its own on the destination address.

use crate::elf::{self, Elf32Ehdr};
use crate::image::Image;

/// # Safety
/// `buf` must be valid for writes across `[0, planned_size(image, header))`.
pub(crate) unsafe fn load_segments(image: &Image, header: &Elf32Ehdr, buf: *mut u8) {
    for i in 0..header.e_phnum {
        let phdr = image.program_header(header, i);
        if phdr.p_type != elf::PT_LOAD {
            continue;
        }

        let dst = buf.add(phdr.p_vaddr as usize);
        let src = image.segment_content(&phdr);
        core::ptr::copy_nonoverlapping(src, dst, phdr.p_filesz as usize);

        let zero_len = phdr.p_memsz as usize - phdr.p_filesz as usize;
        if zero_len > 0 {
            core::ptr::write_bytes(dst.add(phdr.p_filesz as usize), 0, zero_len);
        }
    }
}
