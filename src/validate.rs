//! ELF header validation (§4.1).
//!
//! Checks are ordered and the first failing check wins; callers that want
//! to accept a wider range of images set [`crate::OpenFlags::SKIP_CHECK`]
//! and take responsibility for the consequences themselves.

use crate::elf::{self, Elf32Ehdr};
use crate::error::LinkError;

pub(crate) fn validate(header: &Elf32Ehdr) -> Result<(), LinkError> {
    if header.e_ident[0..4] != elf::ELF_MAGIC {
        return Err(LinkError::MagicId);
    }
    if header.e_ident[4] != elf::ELFCLASS32 {
        return Err(LinkError::Class);
    }
    if header.e_ident[5] != elf::ELFDATA2LSB {
        return Err(LinkError::Endian);
    }
    if header.e_ident[6] != elf::EV_CURRENT {
        return Err(LinkError::Version);
    }
    if header.e_type != elf::ET_DYN {
        return Err(LinkError::Type);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_header() -> Elf32Ehdr {
        Elf32Ehdr {
            e_ident: [
                0x7F, b'E', b'L', b'F', elf::ELFCLASS32, elf::ELFDATA2LSB, elf::EV_CURRENT, 0, 0, 0, 0, 0, 0, 0, 0, 0,
            ],
            e_type: elf::ET_DYN,
            e_machine: 40,
            e_version: 1,
            e_entry: 0,
            e_phoff: 0,
            e_shoff: 0,
            e_flags: 0,
            e_ehsize: elf::EHDR_SIZE as u16,
            e_phentsize: elf::PHDR_SIZE as u16,
            e_phnum: 0,
            e_shentsize: 0,
            e_shnum: 0,
            e_shstrndx: 0,
        }
    }

    #[test]
    fn accepts_a_well_formed_header() {
        assert_eq!(validate(&valid_header()), Ok(()));
    }

    #[test]
    fn magic_is_checked_before_everything_else() {
        let mut h = valid_header();
        h.e_ident[0] = b'X';
        h.e_ident[4] = 9; // also wrong class; magic must still win
        assert_eq!(validate(&h), Err(LinkError::MagicId));
    }

    #[test]
    fn class_endian_version_type_are_checked_in_order() {
        let mut h = valid_header();
        h.e_ident[4] = 2;
        assert_eq!(validate(&h), Err(LinkError::Class));

        let mut h = valid_header();
        h.e_ident[5] = 2;
        assert_eq!(validate(&h), Err(LinkError::Endian));

        let mut h = valid_header();
        h.e_ident[6] = 0;
        assert_eq!(validate(&h), Err(LinkError::Version));

        let mut h = valid_header();
        h.e_type = 2;
        assert_eq!(validate(&h), Err(LinkError::Type));
    }
}
