//! Latched error taxonomy.
//!
//! Every failure surfaced by this crate collapses to one of these variants.
//! Display renders the short identifier an embedded host can print on a
//! low-bandwidth console; nothing richer is kept around.

use core::fmt;

/// A link failure, latched on the handle until queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    /// `e_ident[EI_MAG0..4]` did not match the ELF magic.
    MagicId,
    /// `e_ident[EI_CLASS]` was not `ELFCLASS32`.
    Class,
    /// `e_ident[EI_DATA]` was not `ELFDATA2LSB`.
    Endian,
    /// `e_ident[EI_VERSION]` was not 1.
    Version,
    /// `e_type` was not `ET_DYN`.
    Type,
    /// No `PT_DYNAMIC` program header was present.
    DynamicSection,
    /// A required dynamic tag (hash/strtab/symtab/syment/strsz) was zero.
    MissingEntries,
    /// An unrecognized dynamic tag was encountered.
    DTag,
    /// A `DT_NEEDED` entry was present; dependency chains are unsupported.
    Dependency,
    /// A non-weak undefined symbol had no host-supplied binding.
    UnresolvedSymbol,
    /// A symbol's `st_shndx` was a reserved value this linker does not handle.
    UnimplementedShndx,
    /// `DT_REL` was present but `DT_RELSZ`/`DT_RELENT` was zero.
    ZeroSizedRel,
    /// A relocation entry used a type this linker does not implement.
    UnimplementedRelocation,
}

impl LinkError {
    /// The short identifier surfaced to the host. Stable, borrowed, `'static`.
    pub const fn message(self) -> &'static str {
        match self {
            LinkError::MagicId => "Magic ID",
            LinkError::Class => "Class",
            LinkError::Endian => "Endian",
            LinkError::Version => "Version",
            LinkError::Type => "Type",
            LinkError::DynamicSection => "Dynamic section",
            LinkError::MissingEntries => "Missing entries",
            LinkError::DTag => "D_tag",
            LinkError::Dependency => "Dependency",
            LinkError::UnresolvedSymbol => "Unresolved symbol",
            LinkError::UnimplementedShndx => "Unimplemented st_shndx",
            LinkError::ZeroSizedRel => "Zero sized rel",
            LinkError::UnimplementedRelocation => "Unimplemented relocation",
        }
    }
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}
