//! Base types for the structure of a DOL executable.

use binrw::{BinRead, BinWrite};

/// Size of the header, the first section starts at or after it
pub const HEADER_SIZE: usize = 0x100;

/// Where a code handler is conventionally loaded
pub const CODE_HANDLER_ADDRESS: u32 = 0x8000_1800;

/// Number of text sections
pub const TEXT_SECTIONS: usize = 7;

/// Number of data sections
pub const DATA_SECTIONS: usize = 11;

/// DOL file header
///
/// All data is stored in big endian format
#[derive(BinRead, BinWrite, Debug, Default, Clone, PartialEq, Eq)]
#[brw(big)]
pub struct DolHeader {
    /// File offset of each text section, 0 when the section is unused
    pub text_offsets: [u32; TEXT_SECTIONS],

    /// File offset of each data section, 0 when the section is unused
    pub data_offsets: [u32; DATA_SECTIONS],

    /// Load address of each text section
    pub text_targets: [u32; TEXT_SECTIONS],

    /// Load address of each data section
    pub data_targets: [u32; DATA_SECTIONS],

    /// Size of each text section
    pub text_sizes: [u32; TEXT_SECTIONS],

    /// Size of each data section
    pub data_sizes: [u32; DATA_SECTIONS],

    /// Load address of the bss section
    pub bss_target: u32,

    /// Size of the bss section
    pub bss_size: u32,

    /// Entry point of the executable
    #[brw(pad_after = 0x1C)]
    pub entry: u32,
}

/// Location of a section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionInfo {
    /// Index of the section among the text sections
    pub index: usize,
    pub offset: u32,
    pub target: u32,
    pub size: u32,
}

impl DolHeader {
    /// The text sections in use.
    pub fn text_sections(&self) -> impl Iterator<Item = SectionInfo> + '_ {
        (0..TEXT_SECTIONS).filter_map(move |index| {
            let offset = self.text_offsets[index];
            if offset == 0 {
                return None;
            }

            Some(SectionInfo {
                index,
                offset,
                target: self.text_targets[index],
                size: self.text_sizes[index],
            })
        })
    }

    /// Text sections that may hold a code handler and its table: those loaded at the entry
    /// point or at [`CODE_HANDLER_ADDRESS`].
    pub fn handler_sections(&self) -> impl Iterator<Item = SectionInfo> + '_ {
        self.text_sections()
            .filter(move |s| s.target == self.entry || s.target == CODE_HANDLER_ADDRESS)
    }
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use binrw::{BinRead, BinWrite};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn header_is_0x100_bytes() -> binrw::BinResult<()> {
        let header = DolHeader {
            entry: 0x8000_3100,
            ..Default::default()
        };

        let mut raw = Vec::new();
        header.write(&mut Cursor::new(&mut raw))?;
        assert_eq!(raw.len(), HEADER_SIZE);
        assert_eq!(&raw[0xE0..0xE4], &[0x80, 0x00, 0x31, 0x00]);

        assert_eq!(DolHeader::read(&mut Cursor::new(raw))?, header);
        Ok(())
    }

    #[test]
    fn field_offsets() -> binrw::BinResult<()> {
        let mut raw = vec![0u8; HEADER_SIZE];
        raw[0x00..0x04].copy_from_slice(&0x100u32.to_be_bytes());
        raw[0x48..0x4C].copy_from_slice(&0x8000_3100u32.to_be_bytes());
        raw[0x90..0x94].copy_from_slice(&0x200u32.to_be_bytes());

        let header = DolHeader::read(&mut Cursor::new(raw))?;
        assert_eq!(
            header.text_sections().collect::<Vec<_>>(),
            vec![SectionInfo {
                index: 0,
                offset: 0x100,
                target: 0x8000_3100,
                size: 0x200,
            }]
        );
        Ok(())
    }

    #[test]
    fn handler_sections_by_address() {
        let mut header = DolHeader {
            entry: 0x8000_3100,
            ..Default::default()
        };
        header.text_offsets[..3].copy_from_slice(&[0x100, 0x300, 0x500]);
        header.text_targets[..3].copy_from_slice(&[0x8000_3100, 0x8000_4000, CODE_HANDLER_ADDRESS]);

        let indices: Vec<_> = header.handler_sections().map(|s| s.index).collect();
        assert_eq!(indices, vec![0, 2]);
    }
}
