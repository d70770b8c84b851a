//! Types for writing INI code lists
//!

use std::io::Write;

use bon::Builder;
use gecko_list::{CodeList, Diagnostics, Event};
use tracing::{debug, instrument};

use crate::error::Result;
use crate::read::{ENABLED_SECTION, GECKO_SECTION};

/// Options for how the INI file should be written
#[derive(Debug, Default, Clone, Copy, Builder)]
pub struct IniWriterOptions {
    /// Append the text kept from a previously imported INI file
    #[builder(default)]
    pub include_scrap: bool,
}

/// Render a code list as an INI file.
///
/// Categories are flattened. Enabled codes with malformed lines are left out of
/// `[Gecko_Enabled]` and reported.
pub fn to_string(list: &CodeList, options: IniWriterOptions) -> (String, Diagnostics) {
    let mut diagnostics = Diagnostics::new();
    let mut gecko = vec![format!("[{}]", GECKO_SECTION)];
    let mut enabled = Vec::new();

    for (_, node, code) in list.codes() {
        gecko.push(format!("${}", node.title()));
        gecko.extend(code.lines.lines().map(str::to_lowercase));

        if code.comment.is_empty() {
            gecko.push("*".into());
        } else {
            gecko.extend(code.comment.lines().map(|l| format!("*{}", l)));
        }

        if !code.enabled {
            continue;
        }
        match code.lines.first_invalid_line() {
            None if !code.lines.is_empty() => enabled.push(format!("${}", node.name)),
            None => {}
            Some((line, character)) => diagnostics.push(Event::InvalidCharacter {
                code: node.name.clone(),
                line,
                character,
            }),
        }
    }

    let (leading, trailing) = match list.scrap.as_deref() {
        Some(scrap) if options.include_scrap => split_scrap(scrap),
        _ => ("", ""),
    };

    let mut out = String::new();
    if !leading.is_empty() {
        debug!("writing {} bytes of scrap before the codes", leading.len());
        out.push_str(leading);
        out.push('\n');
    }
    out.push_str(&gecko.join("\n"));

    out.push_str(&format!("\n[{}]", ENABLED_SECTION));
    for line in enabled {
        out.push('\n');
        out.push_str(&line);
    }

    if !trailing.is_empty() {
        debug!("appending {} bytes of scrap", trailing.len());
        out.push('\n');
        out.push_str(trailing);
    }

    out.push('\n');
    (out, diagnostics)
}

/// Split scrap at its first section header. The lines before it must be written ahead of
/// `[Gecko]` to stay outside every section.
fn split_scrap(scrap: &str) -> (&str, &str) {
    let mut offset = 0;
    for line in scrap.split_inclusive('\n') {
        if line.trim_start().starts_with('[') {
            break;
        }
        offset += line.len();
    }
    let (leading, trailing) = scrap.split_at(offset);
    (leading.trim_matches('\n'), trailing.trim_matches('\n'))
}

/// Write a code list as an INI file.
#[instrument(skip_all, err)]
pub fn encode<W: Write>(list: &CodeList, mut writer: W, options: IniWriterOptions) -> Result<Diagnostics> {
    let (text, diagnostics) = to_string(list, options);
    writer.write_all(text.as_bytes())?;
    writer.flush()?;
    Ok(diagnostics)
}

#[cfg(test)]
mod test {
    use gecko_list::Code;
    use pretty_assertions::{assert_eq, assert_str_eq};
    use tracing_test::traced_test;

    use super::*;
    use crate::read::decode;

    #[traced_test]
    #[test]
    fn flattens_and_lowercases() -> Result<()> {
        let mut list = CodeList::new();
        let items = list.add_category(None, "Items")?;
        list.add_code(
            Some(items),
            "Always Bullet Bill",
            Code {
                author: "Bully".into(),
                comment: "Every item box".into(),
                enabled: true,
                ..Code::new("C27BA164 00000002\n3800000D 907F0000")
            },
        )?;
        list.add_code(None, "Infinite Time", Code::new("042ABDF0 60000000"))?;

        let (text, diagnostics) = to_string(&list, IniWriterOptions::default());
        assert!(diagnostics.is_empty());
        assert_str_eq!(
            text,
            "\
[Gecko]
$Always Bullet Bill [Bully]
c27ba164 00000002
3800000d 907f0000
*Every item box
$Infinite Time
042abdf0 60000000
*
[Gecko_Enabled]
$Always Bullet Bill
"
        );
        Ok(())
    }

    #[traced_test]
    #[test]
    fn invalid_codes_are_not_enabled() -> Result<()> {
        let mut list = CodeList::new();
        list.add_code(
            None,
            "Broken",
            Code {
                enabled: true,
                ..Code::new("04000000 00000001\nZZZZZZZZ 00000000")
            },
        )?;

        let (text, diagnostics) = to_string(&list, IniWriterOptions::default());
        assert!(text.ends_with("[Gecko_Enabled]\n"));
        assert_eq!(
            diagnostics.iter().next(),
            Some(&Event::InvalidCharacter {
                code: "Broken".into(),
                line: 2,
                character: Some('Z'),
            })
        );
        Ok(())
    }

    #[test]
    fn scrap_only_when_asked() {
        let mut list = CodeList::new();
        list.scrap = Some("[Core]\nCPUThread = True".into());

        let (without, _) = to_string(&list, IniWriterOptions::default());
        assert_str_eq!(without, "[Gecko]\n[Gecko_Enabled]\n");

        let options = IniWriterOptions::builder().include_scrap(true).build();
        let (with, _) = to_string(&list, options);
        assert_str_eq!(with, "[Gecko]\n[Gecko_Enabled]\n[Core]\nCPUThread = True\n");
    }

    #[traced_test]
    #[test]
    fn leading_scrap_stays_outside_sections() -> Result<()> {
        let mut list = CodeList::new();
        list.add_code(None, "Speed", Code::new("04000000 00000001"))?;
        list.scrap = Some("; comment\n[Core]\nX = 1".into());

        let options = IniWriterOptions::builder().include_scrap(true).build();
        let (text, _) = to_string(&list, options);
        assert_str_eq!(
            text,
            "; comment\n[Gecko]\n$Speed\n04000000 00000001\n*\n[Gecko_Enabled]\n[Core]\nX = 1\n"
        );

        let (decoded, diagnostics) = decode(text.as_bytes())?;
        assert!(diagnostics.is_empty());
        assert_eq!(decoded.scrap, list.scrap);
        let codes: Vec<_> = decoded.codes().collect();
        assert_eq!(codes.len(), 1);
        assert_eq!(codes[0].2.comment, "");
        Ok(())
    }
}
