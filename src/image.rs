//! Read-only view onto the source ELF bytes.
//!
//! The image is never mutated by this crate. All accessors are `unsafe`
//! because the caller-supplied pointer is trusted only to the extent that
//! `open` validated it (or was told to skip validation).

use core::ptr;

use crate::elf::{Elf32Dyn, Elf32Ehdr, Elf32Phdr};

/// A borrowed window onto an ELF32 image already resident in memory.
#[derive(Clone, Copy)]
pub(crate) struct Image {
    base: *const u8,
}

impl Image {
    /// # Safety
    /// `base` must point at memory containing at least an `Elf32Ehdr`,
    /// valid for reads for as long as the `Image` is used.
    pub(crate) unsafe fn new(base: *const u8) -> Self {
        Image { base }
    }

    pub(crate) fn base(&self) -> usize {
        self.base as usize
    }

    /// The file header. Read unaligned: nothing guarantees the image
    /// satisfies `Elf32Ehdr`'s native alignment.
    pub(crate) fn header(&self) -> Elf32Ehdr {
        unsafe { ptr::read_unaligned(self.base as *const Elf32Ehdr) }
    }

    /// The `index`-th program header, per `e_phoff`/`e_phentsize`.
    pub(crate) fn program_header(&self, header: &Elf32Ehdr, index: u16) -> Elf32Phdr {
        let addr = self.base as usize
            + header.e_phoff as usize
            + header.e_phentsize as usize * index as usize;
        unsafe { ptr::read_unaligned(addr as *const Elf32Phdr) }
    }

    /// Pointer to a program header's file content, i.e. `header + p_offset`.
    pub(crate) fn segment_content(&self, phdr: &Elf32Phdr) -> *const u8 {
        (self.base as usize + phdr.p_offset as usize) as *const u8
    }

    /// Reads a dynamic-table entry at an absolute image address.
    pub(crate) fn dyn_entry(&self, addr: usize) -> Elf32Dyn {
        unsafe { ptr::read_unaligned(addr as *const Elf32Dyn) }
    }

    /// Reads a little-endian `u32` at an absolute image address (used for
    /// the ELF hash table header: `[nbucket, nchain]`).
    pub(crate) fn read_u32(&self, addr: usize) -> u32 {
        unsafe { ptr::read_unaligned(addr as *const u32) }
    }
}
