use std::fs::File;
use std::path::PathBuf;

use gecko_list::{CodeList, MismatchPolicy};
use gecko_xml::error::Result;
use gecko_xml::{decode, decode_into};
use pretty_assertions::assert_eq;
use tracing_test::traced_test;

fn resource(name: &str) -> PathBuf {
    PathBuf::from(format!("{}/resources/{}", env!("CARGO_MANIFEST_DIR"), name))
}

#[traced_test]
#[test]
fn parse_database() -> Result<()> {
    let file = File::open(resource("RMCP01.xml"))?;
    let (list, diagnostics) = decode(file)?;

    assert!(diagnostics.is_empty());
    assert_eq!(list.game_id(), "RMCP01");

    let names: Vec<_> = list.walk().map(|(d, _, n)| (d, n.title())).collect();
    assert_eq!(
        names,
        vec![
            (0, "Items".to_string()),
            (1, "Item Modifier [Bully]".to_string()),
            (1, "Karts".to_string()),
            (2, "Fast Acceleration".to_string()),
            (0, "Infinite Time [Seeky]".to_string()),
        ]
    );

    let codes: Vec<_> = list.codes().collect();
    let (_, _, modifier) = codes[0];
    assert_eq!(
        modifier.lines.as_str(),
        "C27BA164 00000002\n3800000X 907F0000\n60000000 00000000"
    );
    assert_eq!(modifier.comment, "Every item box gives the chosen item");
    assert_eq!(modifier.placeholders.len(), 1);
    assert_eq!(modifier.placeholders[0].args, vec!["Green Shell", "Red Shell", "Banana"]);
    assert!(!modifier.placeholders[0].recursive);
    assert!(codes.iter().all(|(_, _, code)| !code.enabled));
    Ok(())
}

#[traced_test]
#[test]
fn import_next_to_existing_codes() -> Result<()> {
    let mut list = CodeList::new();
    list.add_category(None, "Mine")?;

    let file = File::open(resource("RMCP01.xml"))?;
    decode_into(file, &mut list, MismatchPolicy::Abort)?;

    assert_eq!(list.game_id(), "RMCP01");
    let roots: Vec<_> = list
        .roots()
        .iter()
        .filter_map(|id| list.get(*id))
        .map(|node| node.name.as_str())
        .collect();
    assert_eq!(roots, vec!["Mine", "Items", "Infinite Time"]);
    Ok(())
}
