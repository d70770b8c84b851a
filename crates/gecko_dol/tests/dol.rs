use std::io::Cursor;

use binrw::BinWrite;
use gecko_dol::error::{Error, Result};
use gecko_dol::types::{DolHeader, CODE_HANDLER_ADDRESS, HEADER_SIZE};
use gecko_dol::{decode, patch, DolImage, PatchOptions};
use gecko_gct::{GctTable, GctWriterOptions};
use gecko_list::{Code, CodeList};
use pretty_assertions::assert_eq;
use tracing_test::traced_test;

const SECTION_SIZE: usize = 0x200;
const TABLE_OFFSET: usize = 0x40;

fn sample_list() -> gecko_list::error::Result<CodeList> {
    let mut list = CodeList::new();
    list.add_code(
        None,
        "Bullet Bill",
        Code {
            enabled: true,
            ..Code::new("C27BA164 00000003\n3800000D 907F0000\n60000000 00000000")
        },
    )?;
    list.add_code(None, "Infinite Time", Code::new("042ABDF0 60000000"))?;
    Ok(list)
}

fn sample_gct() -> Result<Vec<u8>> {
    let mut gct = Vec::new();
    gecko_gct::encode(&sample_list()?, &mut gct, GctWriterOptions::default())?;
    Ok(gct)
}

/// An executable with a second text section loaded at `target`, holding `gct` after some
/// code handler instructions.
fn synthetic_dol(target: u32, entry: u32, gct: &[u8]) -> Result<Vec<u8>> {
    let mut header = DolHeader {
        entry,
        ..Default::default()
    };
    header.text_offsets[..2].copy_from_slice(&[HEADER_SIZE as u32, (HEADER_SIZE + SECTION_SIZE) as u32]);
    header.text_targets[..2].copy_from_slice(&[0x8000_4000, target]);
    header.text_sizes[..2].copy_from_slice(&[SECTION_SIZE as u32; 2]);

    let mut data = Vec::new();
    header.write(&mut Cursor::new(&mut data))?;

    // first section: ordinary code, nops
    for _ in 0..SECTION_SIZE / 4 {
        data.extend_from_slice(&[0x60, 0x00, 0x00, 0x00]);
    }

    // second section: handler stub, then the table
    let mut section = vec![0x60; TABLE_OFFSET];
    section.extend_from_slice(gct);
    section.resize(SECTION_SIZE, 0);
    data.extend_from_slice(&section);
    Ok(data)
}

#[traced_test]
#[test]
fn table_at_entry_point() -> Result<()> {
    let gct = sample_gct()?;
    let data = synthetic_dol(0x8000_3100, 0x8000_3100, &gct)?;

    let image = DolImage::from_bytes(data.clone())?;
    let embedded = image.find_table()?;
    assert_eq!(embedded.section, 1);
    assert_eq!(embedded.start, HEADER_SIZE + SECTION_SIZE + TABLE_OFFSET);
    assert_eq!(image.table_bytes(&embedded), gct.as_slice());

    let (from_dol, _) = image.table()?;
    let (direct, _) = GctTable::parse_classic(&gct)?;
    assert_eq!(from_dol, direct);

    let (list, diagnostics) = decode(data.as_slice())?;
    assert!(diagnostics.is_empty());
    assert_eq!(list.codes().count(), 2);
    Ok(())
}

#[traced_test]
#[test]
fn table_at_code_handler_address() -> Result<()> {
    let data = synthetic_dol(CODE_HANDLER_ADDRESS, 0x8000_4000, &sample_gct()?)?;
    let (list, _) = decode(data.as_slice())?;
    assert_eq!(list.codes().count(), 2);
    Ok(())
}

#[traced_test]
#[test]
fn other_sections_are_ignored() -> Result<()> {
    let data = synthetic_dol(0x8000_5000, 0x8000_4000, &sample_gct()?)?;
    assert!(matches!(decode(data.as_slice()), Err(Error::EmptyImage)));
    Ok(())
}

#[traced_test]
#[test]
fn patch_in_place() -> Result<()> {
    let data = synthetic_dol(0x8000_3100, 0x8000_3100, &sample_gct()?)?;
    let image = DolImage::from_bytes(data.clone())?;

    let mut list = CodeList::new();
    list.add_code(None, "Moon Jump", Code::new("04001234 00000001"))?;

    let mut patched = Vec::new();
    patch(&image, &list, &mut patched, PatchOptions::default())?;
    assert_eq!(patched.len(), data.len());
    assert_eq!(&patched[..HEADER_SIZE + SECTION_SIZE + TABLE_OFFSET], &data[..HEADER_SIZE + SECTION_SIZE + TABLE_OFFSET]);

    let (decoded, _) = decode(patched.as_slice())?;
    let payloads: Vec<_> = decoded.codes().map(|(_, _, c)| c.lines.as_str().to_string()).collect();
    assert_eq!(payloads, vec!["04001234 00000001".to_string()]);

    // the rest of the old table is cleared
    let table = HEADER_SIZE + SECTION_SIZE + TABLE_OFFSET;
    assert!(patched[table + 24..].iter().all(|b| *b == 0));
    Ok(())
}

#[traced_test]
#[test]
fn patch_too_large() -> Result<()> {
    let data = synthetic_dol(0x8000_3100, 0x8000_3100, &sample_gct()?)?;
    let image = DolImage::from_bytes(data)?;

    let mut list = CodeList::new();
    let lines = vec!["04001234 00000001"; SECTION_SIZE / 8].join("\n");
    list.add_code(None, "Huge", Code::new(lines))?;

    let mut patched = Vec::new();
    let result = patch(&image, &list, &mut patched, PatchOptions::default());
    assert!(matches!(
        result,
        Err(Error::TableTooLarge { available, .. }) if available == SECTION_SIZE - TABLE_OFFSET
    ));
    assert!(patched.is_empty());
    Ok(())
}
