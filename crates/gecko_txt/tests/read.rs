use std::fs::File;
use std::path::PathBuf;

use gecko_list::NodeKind;
use gecko_txt::error::Result;
use gecko_txt::{decode, encode, TxtWriterOptions};
use pretty_assertions::assert_eq;
use tracing_test::traced_test;

fn resource(name: &str) -> PathBuf {
    PathBuf::from(format!("{}/resources/{}", env!("CARGO_MANIFEST_DIR"), name))
}

#[traced_test]
#[test]
fn parse_txt() -> Result<()> {
    let file = File::open(resource("RMCP01.txt"))?;
    let (list, diagnostics) = decode(file)?;

    assert!(diagnostics.is_empty());
    assert_eq!(list.game_id(), "RMCP01");
    assert_eq!(list.game_name, "Mario Kart Wii (PAL)");
    assert_eq!(list.roots().len(), 2);

    let names: Vec<_> = list.walk().map(|(d, _, n)| (d, n.name.as_str())).collect();
    assert_eq!(
        names,
        vec![
            (0, "Items"),
            (1, "Always Bullet Bill"),
            (1, "No Item Boxes"),
            (1, "Karts"),
            (2, "Fast Acceleration"),
            (0, "Infinite Time"),
        ]
    );

    let (_, node, code) = list.codes().next().expect("first code");
    assert_eq!(node.title(), "Always Bullet Bill [Bully]");
    assert!(code.enabled);
    assert_eq!(code.lines.line_count(), 3);
    assert_eq!(code.comment, "Every item box gives a bullet bill.");
    assert_eq!(list.enabled_codes().count(), 1);

    Ok(())
}

#[traced_test]
#[test]
fn rewrite_is_byte_identical() -> Result<()> {
    let original = std::fs::read(resource("RMCP01.txt"))?;
    let (list, _) = decode(original.as_slice())?;

    let mut written = Vec::new();
    encode(&list, &mut written, TxtWriterOptions::default())?;

    assert_eq!(String::from_utf8_lossy(&written), String::from_utf8_lossy(&original));
    Ok(())
}

#[traced_test]
#[test]
fn appending_keeps_existing_nodes() -> Result<()> {
    let (mut list, _) = decode(File::open(resource("RMCP01.txt"))?)?;
    let before = list.walk().count();

    let extra = "RMCP01\nMario Kart Wii (PAL)\n\nMoon Jump\n* 28000000 00000000\n";
    let diagnostics =
        gecko_txt::decode_into(extra.as_bytes(), &mut list, Default::default())?;

    assert!(diagnostics.is_empty());
    assert_eq!(list.walk().count(), before + 1);
    let last = list.roots().last().and_then(|id| list.get(*id)).expect("root");
    assert_eq!(last.name, "Moon Jump");
    assert!(matches!(&last.kind, NodeKind::Code(c) if c.enabled));
    Ok(())
}
