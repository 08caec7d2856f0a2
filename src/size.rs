//! Size planner (§4.4).
//!
//! Computes the minimum destination-buffer length by taking the highest
//! `vaddr + memsz` across all loadable segments, each rounded up to that
//! segment's own alignment.

use crate::elf::{self, Elf32Ehdr};
use crate::image::Image;

pub(crate) fn planned_size(image: &Image, header: &Elf32Ehdr) -> usize {
    // vaddr/memsz/align are all 32-bit fields; the rounding arithmetic is
    // done in that same width so a zero-memsz segment at vaddr 0 wraps
    // back to 0 rather than to whatever usize happens to be on the host.
    let mut high: u32 = 0;
    for i in 0..header.e_phnum {
        let phdr = image.program_header(header, i);
        if phdr.p_type != elf::PT_LOAD {
            continue;
        }
        let seg_max = phdr.p_vaddr.wrapping_add(phdr.p_memsz);
        let align = phdr.p_align;
        let rounded = (seg_max.wrapping_sub(1) / align).wrapping_add(1).wrapping_mul(align);
        if rounded > high {
            high = rounded;
        }
    }
    high as usize
}
