//! ELF32 (little-endian) on-disk layout.
//!
//! Only the fields this linker actually reads are modeled. Everything here
//! is `#[repr(C)]` and read out of borrowed, untrusted memory with
//! `read_unaligned` — the image is not guaranteed to satisfy Rust's normal
//! alignment rules for these types.

/// `e_ident[EI_MAG0..EI_MAG3]`.
pub const ELF_MAGIC: [u8; 4] = [0x7F, b'E', b'L', b'F'];

/// `e_ident[EI_CLASS]`: 32-bit objects.
pub const ELFCLASS32: u8 = 1;
/// `e_ident[EI_DATA]`: little-endian.
pub const ELFDATA2LSB: u8 = 1;
/// `e_ident[EI_VERSION]`: the only defined version.
pub const EV_CURRENT: u8 = 1;
/// `e_type`: shared object.
pub const ET_DYN: u16 = 3;

/// Program header type: unused entry.
pub const PT_NULL: u32 = 0;
/// Program header type: loadable segment.
pub const PT_LOAD: u32 = 1;
/// Program header type: dynamic linking information.
pub const PT_DYNAMIC: u32 = 2;

/// Reserved section index: undefined symbol.
pub const SHN_UNDEF: u16 = 0;
/// Reserved section index: low end of the reserved range.
pub const SHN_LORESERVE: u16 = 0xff00;
/// Reserved section index: absolute value, not relocated further.
pub const SHN_ABS: u16 = 0xfff1;

/// Symbol binding: local.
pub const STB_LOCAL: u8 = 0;
/// Symbol binding: global, published to the link map.
pub const STB_GLOBAL: u8 = 1;
/// Symbol binding: weak, tolerates being left unresolved.
pub const STB_WEAK: u8 = 2;

/// Dynamic tags this linker recognizes. See the dynamic-table reader for
/// which are load-bearing, which are silently ignored, and which are fatal.
pub mod dt {
    pub const NULL: i32 = 0;
    pub const NEEDED: i32 = 1;
    pub const PLTRELSZ: i32 = 2;
    pub const PLTGOT: i32 = 3;
    pub const HASH: i32 = 4;
    pub const STRTAB: i32 = 5;
    pub const SYMTAB: i32 = 6;
    pub const RELA: i32 = 7;
    pub const RELASZ: i32 = 8;
    pub const RELAENT: i32 = 9;
    pub const STRSZ: i32 = 10;
    pub const SYMENT: i32 = 11;
    pub const INIT: i32 = 12;
    pub const FINI: i32 = 13;
    pub const SONAME: i32 = 14;
    pub const RPATH: i32 = 15;
    pub const SYMBOLIC: i32 = 16;
    pub const REL: i32 = 17;
    pub const RELSZ: i32 = 18;
    pub const RELENT: i32 = 19;
    pub const PLTREL: i32 = 20;
    pub const DEBUG: i32 = 21;
    pub const TEXTREL: i32 = 22;
    pub const JMPREL: i32 = 23;
    pub const INIT_ARRAY: i32 = 0x19;
    pub const FINI_ARRAY: i32 = 0x1a;
    pub const INIT_ARRAYSZ: i32 = 0x1b;
    pub const FINI_ARRAYSZ: i32 = 0x1c;
    /// Vendor-reserved tag observed in the wild for `DT_RELCOUNT`-like
    /// bookkeeping; this linker has no use for it and ignores it.
    pub const GNU_VENDOR_RELCOUNT: i32 = 0x6FFF_FFFA;
}

/// ARM relocation types this linker implements (ELF for the ARM
/// Architecture, 4.6.1.2). All other types are fatal.
pub mod r_arm {
    pub const R_ARM_ABS32: u32 = 2;
    pub const R_ARM_JUMP_SLOT: u32 = 22;
    pub const R_ARM_RELATIVE: u32 = 23;
}

/// ELF32 file header.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct Elf32Ehdr {
    pub e_ident: [u8; 16],
    pub e_type: u16,
    pub e_machine: u16,
    pub e_version: u32,
    pub e_entry: u32,
    pub e_phoff: u32,
    pub e_shoff: u32,
    pub e_flags: u32,
    pub e_ehsize: u16,
    pub e_phentsize: u16,
    pub e_phnum: u16,
    pub e_shentsize: u16,
    pub e_shnum: u16,
    pub e_shstrndx: u16,
}

/// ELF32 program header.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct Elf32Phdr {
    pub p_type: u32,
    pub p_offset: u32,
    pub p_vaddr: u32,
    pub p_paddr: u32,
    pub p_filesz: u32,
    pub p_memsz: u32,
    pub p_flags: u32,
    pub p_align: u32,
}

/// ELF32 symbol table entry.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct Elf32Sym {
    pub st_name: u32,
    pub st_value: u32,
    pub st_size: u32,
    pub st_info: u8,
    pub st_other: u8,
    pub st_shndx: u16,
}

impl Elf32Sym {
    /// `ELF32_ST_BIND`.
    pub fn bind(&self) -> u8 {
        self.st_info >> 4
    }
}

/// ELF32 dynamic-table entry. `d_un` is a single word shared by value/ptr
/// interpretations in the source format; we just keep it as `u32`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct Elf32Dyn {
    pub d_tag: i32,
    pub d_val: u32,
}

/// ELF32 REL relocation entry (no addend field; the addend lives in the
/// reference cell itself).
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct Elf32Rel {
    pub r_offset: u32,
    pub r_info: u32,
}

impl Elf32Rel {
    /// `ELF32_R_SYM`.
    pub fn sym(&self) -> u32 {
        self.r_info >> 8
    }

    /// `ELF32_R_TYPE`.
    pub fn r_type(&self) -> u8 {
        self.r_info as u8
    }
}

pub const EHDR_SIZE: usize = core::mem::size_of::<Elf32Ehdr>();
pub const PHDR_SIZE: usize = core::mem::size_of::<Elf32Phdr>();
pub const SYM_SIZE: usize = core::mem::size_of::<Elf32Sym>();
pub const DYN_SIZE: usize = core::mem::size_of::<Elf32Dyn>();
pub const REL_SIZE: usize = core::mem::size_of::<Elf32Rel>();
