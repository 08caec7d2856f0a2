//! # armlink: embedded ARM32 dynamic linker
//!
//! `armlink` loads a single ARM 32-bit ELF shared object that already sits
//! somewhere in memory, relocates it into a caller-supplied destination
//! buffer, resolves its undefined symbols against a small host-supplied
//! symbol table, and runs its constructors. There is no file system, no
//! operating-system loader underneath it, and no dependency graph: an image
//! that declares a `needed` entry is rejected outright.
//!
//! ## Call order
//!
//! `open` → `map_symbol`* → `size` → (host allocates the buffer) → `link` →
//! `lookup`* → `close`. `close` must run even after a failed `link`; it is
//! the only way to release the handle and its symbol map.
//!
//! ## Failure model
//!
//! Every operation here is non-throwing. A failure latches a short,
//! `'static` message on the handle and returns early; [`Handle::error`]
//! retrieves and clears it. This mirrors the embedded host this crate was
//! built for, which has no exception mechanism and a low-bandwidth console
//! to report problems on.
//!
//! ## Allocation
//!
//! Every heap allocation this crate performs — the handle itself, and each
//! symbol-map node — goes through a single realloc-shaped function (see
//! [`alloc_facade`]), so an embedder can back it with a bump allocator, a
//! fixed pool, or nothing beyond a static arena.

#![no_std]

extern crate alloc;

mod alloc_facade;
mod dynamic;
mod elf;
mod error;
mod image;
mod load;
mod reloc;
mod resolve;
mod size;
mod symtab;
mod validate;

use core::ffi::c_void;
use core::ptr;

use bitflags::bitflags;

pub use alloc_facade::AllocFn;
pub use error::LinkError;

use alloc_facade::Allocator;
use image::Image;
use symtab::SymbolMap;

bitflags! {
    /// Flags accepted by [`Handle::open`] / [`Handle::open_with_allocator`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct OpenFlags: u32 {
        /// Run the full §4.1 header validation (the default behavior).
        const DEFAULT = 0x0;
        /// Skip header validation entirely. The caller takes responsibility
        /// for handing this linker a well-formed image; later stages will
        /// still fail (just later, and less informatively) on garbage.
        const SKIP_CHECK = 0x1;
    }
}

/// The linker's per-image state.
///
/// Opaque to callers by convention (construct only through `open`/
/// `open_with_allocator`, destroy only through `close`), but not
/// type-erased: there is no internal casting, just a strongly typed struct
/// the host carries around as `&mut Handle` or a boxed pointer as it sees
/// fit.
pub struct Handle {
    // Kept on the handle per the data model even though nothing currently
    // re-reads it after construction (the symbol map keeps its own copy);
    // a future caller introspecting or re-deriving allocators from a raw
    // handle pointer will want it here.
    #[allow(dead_code)]
    alloc: Allocator,
    #[allow(dead_code)]
    flags: OpenFlags,
    image: Image,
    symbols: SymbolMap,
    /// Buffer-relative fini-array base, recorded by `link` for `close` to
    /// run later. Valid only as long as the host keeps the destination
    /// buffer alive.
    fini_array: Option<*mut u32>,
    fini_array_count: u32,
    error: Option<LinkError>,
}

impl Handle {
    /// Opens `image_ptr` for linking, using the global allocator to back
    /// the handle and its symbol map.
    ///
    /// # Safety
    /// `image_ptr` must point at memory holding at least an ELF32 file
    /// header, valid for reads for the handle's entire lifetime.
    pub unsafe fn open(image_ptr: *const u8, flags: OpenFlags) -> Handle {
        Handle::open_with_allocator(image_ptr, flags, alloc_facade::default_realloc, ptr::null_mut())
    }

    /// Opens `image_ptr` for linking, backing all allocation through
    /// `alloc`/`cookie` instead of the global allocator.
    ///
    /// # Safety
    /// Same requirement on `image_ptr` as [`Handle::open`]. `alloc` must
    /// implement the realloc-shaped contract documented on [`AllocFn`] for
    /// as long as the handle lives.
    pub unsafe fn open_with_allocator(
        image_ptr: *const u8,
        flags: OpenFlags,
        alloc: AllocFn,
        cookie: *mut c_void,
    ) -> Handle {
        let allocator = Allocator::new(alloc, cookie);
        let image = Image::new(image_ptr);

        let mut error = None;
        if !flags.contains(OpenFlags::SKIP_CHECK) {
            let header = image.header();
            if let Err(e) = validate::validate(&header) {
                log::debug!("open: header rejected: {e}");
                error = Some(e);
            }
        }

        Handle {
            alloc: allocator,
            flags,
            image,
            symbols: SymbolMap::new(allocator),
            fini_array: None,
            fini_array_count: 0,
            error,
        }
    }

    /// Returns and clears the latched error, if any.
    pub fn error(&mut self) -> Option<LinkError> {
        self.error.take()
    }

    fn fail(&mut self, e: LinkError) {
        log::debug!("link failure latched: {e}");
        self.error = Some(e);
    }

    /// Inserts `hash(name) -> addr` into the symbol map, for the resolver
    /// to find when `link` walks the image's undefined symbols.
    ///
    /// The spec's error taxonomy has no category for allocator exhaustion;
    /// an allocator that runs out of room here simply leaves the name
    /// unbound, which later surfaces through the ordinary "unresolved
    /// symbol" path if the image actually references it.
    pub fn map_symbol(&mut self, name: &str, addr: *mut c_void) {
        let inserted = self.symbols.insert(symtab::hash(name), addr);
        if !inserted {
            log::warn!("map_symbol({name}): allocator exhausted, binding dropped");
        }
    }

    /// The minimum destination-buffer length this image needs (§4.4).
    pub fn size(&self) -> usize {
        let header = self.image.header();
        size::planned_size(&self.image, &header)
    }

    /// Links the image into `buf`: loads segments, reads the dynamic
    /// table, resolves symbols, applies relocations, and runs the
    /// init-array. `buf` must be at least [`Handle::size`] bytes.
    ///
    /// # Safety
    /// `buf` must be valid for reads and writes across `[0, self.size())`
    /// and must remain valid until `close` is called (the fini array is
    /// read out of it during close).
    pub unsafe fn link(&mut self, buf: *mut u8) {
        let header = self.image.header();

        load::load_segments(&self.image, &header, buf);

        let dyn_phdr = match dynamic::find_dynamic_segment(&self.image, &header) {
            Some(p) => p,
            None => return self.fail(LinkError::DynamicSection),
        };

        let info = match dynamic::read_dynamic_table(&self.image, &dyn_phdr, buf as usize) {
            Ok(i) => i,
            Err(e) => return self.fail(e),
        };

        let count = dynamic::symbol_count(&self.image, &info);
        let strtab = info.strtab.unwrap();
        let symtab_addr = info.symtab.unwrap();

        if let Err(e) =
            resolve::resolve_symbols(strtab, symtab_addr, info.syment, count, buf as usize, &mut self.symbols)
        {
            return self.fail(e);
        }

        if let Some(rel) = info.rel {
            if info.relsz == 0 || info.relent == 0 {
                return self.fail(LinkError::ZeroSizedRel);
            }
            if let Err(e) =
                reloc::apply_rel_table(buf as usize, rel, info.relsz, info.relent, symtab_addr, info.syment)
            {
                return self.fail(e);
            }
        }

        if let Some(jmprel) = info.jmprel {
            if info.pltrelsz > 0 {
                if let Err(e) = reloc::apply_rel_table(
                    buf as usize,
                    jmprel,
                    info.pltrelsz,
                    elf::REL_SIZE as u32,
                    symtab_addr,
                    info.syment,
                ) {
                    return self.fail(e);
                }
            }
        }

        if let Some(init_array) = info.init_array {
            for i in 0..info.init_array_count {
                let entry = ptr::read_unaligned((init_array as *const u32).add(i as usize));
                let ctor: unsafe extern "C" fn() = core::mem::transmute(entry as usize);
                ctor();
            }
        }

        self.fini_array = info.fini_array.map(|a| a as *mut u32);
        self.fini_array_count = info.fini_array_count;
    }

    /// Looks up `hash(name)` in the symbol map: entries the host inserted
    /// via `map_symbol`, plus any of the image's own globals published by
    /// `link`. `None` means the name has no binding at all; `Some` may
    /// still wrap a null address (e.g. an unresolved weak import).
    pub fn lookup(&self, name: &str) -> Option<*mut c_void> {
        self.symbols.find(symtab::hash(name))
    }

    /// Runs the fini-array (forward order, matching the source this crate
    /// was built from — not reversed, even though most loaders run
    /// destructors in reverse), then releases the symbol map. Must be
    /// called exactly once, even if `link` was never called or failed
    /// partway through.
    ///
    /// # Safety
    /// If `link` ran far enough to record a fini array, the destination
    /// buffer it points into must still be valid for reads.
    pub unsafe fn close(mut self) {
        if let Some(fini_array) = self.fini_array {
            for i in 0..self.fini_array_count {
                let entry = ptr::read_unaligned((fini_array as *const u32).add(i as usize));
                let dtor: unsafe extern "C" fn() = core::mem::transmute(entry as usize);
                dtor();
            }
        }
        self.symbols.clear();
    }
}
