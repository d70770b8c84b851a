use std::path::PathBuf;

use gecko_ini::error::Result;
use gecko_ini::{decode_path, encode, IniWriterOptions};
use gecko_list::{CodeList, MismatchPolicy};
use pretty_assertions::assert_eq;
use tracing_test::traced_test;

fn resource(name: &str) -> PathBuf {
    PathBuf::from(format!("{}/resources/{}", env!("CARGO_MANIFEST_DIR"), name))
}

#[traced_test]
#[test]
fn parse_ini() -> Result<()> {
    let mut list = CodeList::new();
    let diagnostics = decode_path(&resource("RMCP01.ini"), &mut list, MismatchPolicy::Abort)?;

    assert!(diagnostics.is_empty());
    assert_eq!(list.game_id(), "RMCP01");

    let enabled: Vec<_> = list.enabled_codes().map(|(_, n, _)| n.name.as_str()).collect();
    assert_eq!(enabled, vec!["Always Bullet Bill", "Infinite Time"]);
    assert_eq!(list.codes().count(), 3);

    Ok(())
}

#[traced_test]
#[test]
fn scrap_round_trip() -> Result<()> {
    let original = std::fs::read_to_string(resource("RMCP01.ini"))?;
    let mut list = CodeList::new();
    decode_path(&resource("RMCP01.ini"), &mut list, MismatchPolicy::Abort)?;

    let mut written = Vec::new();
    let options = IniWriterOptions::builder().include_scrap(true).build();
    encode(&list, &mut written, options)?;
    let written = String::from_utf8_lossy(&written);

    // everything outside the two sections comes back verbatim
    for block in ["[Core]\nCPUThread = True\nSkipIdle = True\n", "[Video_Settings]\nAspectRatio = 1\n"] {
        assert!(original.contains(block));
        assert!(written.contains(block), "{} missing from\n{}", block, written);
    }

    // and the codes read back the same
    let (reread, _) = gecko_ini::decode(written.as_bytes())?;
    let codes = |l: &CodeList| {
        l.codes()
            .map(|(_, n, c)| (n.name.clone(), c.clone()))
            .collect::<Vec<_>>()
    };
    assert_eq!(codes(&reread), codes(&list));
    assert_eq!(reread.scrap, list.scrap);

    Ok(())
}

#[traced_test]
#[test]
fn file_name_mismatch_aborts() -> Result<()> {
    let mut list = CodeList::new();
    list.set_game_id("GALE01")?;

    let result = decode_path(&resource("RMCP01.ini"), &mut list, MismatchPolicy::Abort);
    assert!(result.is_err());
    assert!(list.is_empty());
    assert_eq!(list.scrap, None);

    Ok(())
}
