//! Types for reading INI code lists
//!

use std::fs;
use std::io::Read;
use std::ops::Range;
use std::path::Path;

use gecko_list::name::{is_game_id, split_author};
use gecko_list::{Code, CodeList, Diagnostics, Event, HexCode, MismatchPolicy};
use tracing::{debug, instrument, trace};
use winnow::combinator::delimited;
use winnow::prelude::*;
use winnow::token::take_till;
use winnow::PResult;

use crate::error::Result;

pub(crate) const GECKO_SECTION: &str = "Gecko";
pub(crate) const ENABLED_SECTION: &str = "Gecko_Enabled";

/// `[name]`
fn section_header<'s>(input: &mut &'s str) -> PResult<&'s str> {
    delimited('[', take_till(0.., ']'), ']').parse_next(input)
}

/// A code collected from the `[Gecko]` body
#[derive(Debug, Default, Clone, PartialEq)]
struct Entry {
    name: String,
    author: String,
    lines: Vec<String>,
    comment: Vec<String>,
}

/// The line ranges making up the file
#[derive(Debug, Default, Clone, PartialEq)]
struct Layout {
    gecko: Option<Range<usize>>,
    enabled: Option<Range<usize>>,
}

impl Layout {
    /// Find the two sections. Each body runs from the line after its header to the next
    /// line starting with `[`.
    fn scan(lines: &[&str]) -> Self {
        let body = |header: usize| {
            let end = lines[header + 1..]
                .iter()
                .position(|l| l.starts_with('['))
                .map_or(lines.len(), |p| header + 1 + p);
            header + 1..end
        };

        let mut layout = Self::default();
        for (i, line) in lines.iter().enumerate() {
            match section_header.parse(line.trim_end()) {
                Ok(GECKO_SECTION) if layout.gecko.is_none() => layout.gecko = Some(body(i)),
                Ok(ENABLED_SECTION) if layout.enabled.is_none() => layout.enabled = Some(body(i)),
                _ => {}
            }
        }
        layout
    }

    /// Whether line `i` is a recognized header or part of a recognized body
    fn owns(&self, i: usize) -> bool {
        [&self.gecko, &self.enabled]
            .into_iter()
            .flatten()
            .any(|body| i + 1 == body.start || body.contains(&i))
    }
}

fn parse_gecko(lines: &[&str], body: Range<usize>, diagnostics: &mut Diagnostics) -> Vec<Entry> {
    let mut entries: Vec<Entry> = Vec::new();

    for i in body {
        let line = lines[i].trim_end();
        if line.trim().is_empty() {
            continue;
        }

        if let Some(title) = line.strip_prefix('$') {
            let (name, author) = split_author(title);
            trace!("code {:?} by {:?}", name, author);
            entries.push(Entry {
                name: name.trim().to_string(),
                author: author.to_string(),
                ..Default::default()
            });
            continue;
        }

        let Some(entry) = entries.last_mut() else {
            diagnostics.push(Event::OrphanLine {
                line: i + 1,
                text: line.to_string(),
            });
            continue;
        };

        match line.strip_prefix('*') {
            Some("") => {}
            Some(comment) => entry.comment.push(comment.to_string()),
            None => entry.lines.push(line.trim().to_uppercase()),
        }
    }

    entries
}

/// Read an INI code list into a new [`CodeList`].
pub fn decode<R: Read>(reader: R) -> Result<(CodeList, Diagnostics)> {
    let mut list = CodeList::new();
    let diagnostics = decode_into(reader, &mut list, MismatchPolicy::Continue)?;
    Ok((list, diagnostics))
}

/// Read an INI code list and append its codes to `list`.
pub fn decode_into<R: Read>(
    mut reader: R,
    list: &mut CodeList,
    policy: MismatchPolicy,
) -> Result<Diagnostics> {
    let mut raw = Vec::new();
    reader.read_to_end(&mut raw)?;
    decode_text(&gecko_list::text::decode(&raw), None, list, policy)
}

/// Read an INI file, taking the game id from its name as Dolphin does (`RMCP01.ini`).
#[instrument(skip(list), err)]
pub fn decode_path(path: &Path, list: &mut CodeList, policy: MismatchPolicy) -> Result<Diagnostics> {
    let raw = fs::read(path)?;
    let game_id = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| is_game_id(stem));
    decode_text(&gecko_list::text::decode(&raw), game_id.as_deref(), list, policy)
}

#[instrument(skip(text, list), err)]
fn decode_text(
    text: &str,
    game_id: Option<&str>,
    list: &mut CodeList,
    policy: MismatchPolicy,
) -> Result<Diagnostics> {
    let mut diagnostics = Diagnostics::new();
    let lines: Vec<&str> = text.lines().collect();
    let layout = Layout::scan(&lines);
    debug!("sections: {:?}", layout);

    let entries = layout
        .gecko
        .clone()
        .map(|body| parse_gecko(&lines, body, &mut diagnostics))
        .unwrap_or_default();

    let enabled: Vec<&str> = layout
        .enabled
        .clone()
        .map(|body| lines[body].iter().map(|l| l.trim_end()).collect())
        .unwrap_or_default();

    let scrap = lines
        .iter()
        .enumerate()
        .filter(|(i, _)| !layout.owns(*i))
        .map(|(_, l)| *l)
        .collect::<Vec<_>>()
        .join("\n");
    let scrap = scrap.trim_matches('\n');

    if let Some(game_id) = game_id {
        list.reconcile_game_id(game_id, policy, &mut diagnostics)?;
    }

    for line in &enabled {
        let Some(name) = line.strip_prefix('$') else {
            continue;
        };
        if entries.iter().filter(|e| e.name == name).count() > 1 {
            diagnostics.push(Event::AmbiguousName {
                name: name.to_string(),
            });
        }
    }

    for entry in entries {
        let name = if entry.name.is_empty() {
            list.placeholder_name()
        } else {
            entry.name
        };
        let marker = format!("${}", name);

        list.add_code(
            None,
            name,
            Code {
                lines: HexCode::from(entry.lines.join("\n")),
                comment: entry.comment.join("\n"),
                author: entry.author,
                enabled: enabled.contains(&marker.as_str()),
                ..Default::default()
            },
        )?;
    }

    if !scrap.is_empty() {
        list.scrap = Some(match list.scrap.take() {
            Some(existing) => format!("{}\n{}", existing, scrap),
            None => scrap.to_string(),
        });
    }

    Ok(diagnostics)
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use tracing_test::traced_test;

    use super::*;

    const SAMPLE: &str = "\
[Core]
CPUThread = True
[Gecko]
$Always Bullet Bill [Bully]
c27ba164 00000002
3800000d 907f0000
*Every item box
*gives a bullet bill.
$Infinite Time
042abdf0 60000000
*
[Video]
Aspect = 1
[Gecko_Enabled]
$Always Bullet Bill
";

    #[test]
    fn layout_finds_both_sections() {
        let lines: Vec<&str> = SAMPLE.lines().collect();
        let layout = Layout::scan(&lines);
        assert_eq!(layout.gecko, Some(3..11));
        assert_eq!(layout.enabled, Some(14..15));
        assert!(!layout.owns(0));
        assert!(layout.owns(2));
        assert!(!layout.owns(11));
        assert!(layout.owns(13));
    }

    #[test]
    fn missing_sections_run_to_the_end() {
        let lines = ["[Gecko]", "$A", "04000000 00000001"];
        let layout = Layout::scan(&lines);
        assert_eq!(layout.gecko, Some(1..3));
        assert_eq!(layout.enabled, None);
    }

    #[traced_test]
    #[test]
    fn parse_sample() -> Result<()> {
        let (list, diagnostics) = decode(SAMPLE.as_bytes())?;
        assert!(diagnostics.is_empty());

        let codes: Vec<_> = list.codes().collect();
        assert_eq!(codes.len(), 2);

        let (_, node, code) = codes[0];
        assert_eq!(node.name, "Always Bullet Bill");
        assert_eq!(code.author, "Bully");
        assert_eq!(code.lines.as_str(), "C27BA164 00000002\n3800000D 907F0000");
        assert_eq!(code.comment, "Every item box\ngives a bullet bill.");
        assert!(code.enabled);

        let (_, node, code) = codes[1];
        assert_eq!(node.name, "Infinite Time");
        assert_eq!(code.comment, "");
        assert!(!code.enabled);

        assert_eq!(
            list.scrap.as_deref(),
            Some("[Core]\nCPUThread = True\n[Video]\nAspect = 1")
        );
        Ok(())
    }

    #[traced_test]
    #[test]
    fn legacy_encoded_names() -> Result<()> {
        let input = b"[Gecko]\n$Caf\xe9\n04000000 00000001\n[Gecko_Enabled]\n$Caf\xe9\n";
        let (list, _) = decode(&input[..])?;

        let codes: Vec<_> = list.codes().collect();
        let (_, node, code) = codes[0];
        assert_eq!(node.name, "Café");
        assert!(code.enabled);
        Ok(())
    }

    #[traced_test]
    #[test]
    fn orphan_lines_are_reported() -> Result<()> {
        let input = "[Gecko]\n04000000 00000001\n$Code\n04000000 00000002\n";
        let (list, diagnostics) = decode(input.as_bytes())?;

        assert_eq!(list.codes().count(), 1);
        assert_eq!(
            diagnostics.iter().collect::<Vec<_>>(),
            vec![&Event::OrphanLine {
                line: 2,
                text: "04000000 00000001".into()
            }]
        );
        Ok(())
    }

    #[traced_test]
    #[test]
    fn duplicate_enabled_names_are_reported() -> Result<()> {
        let input = "[Gecko]\n$Same\n04000000 00000001\n$Same\n04000000 00000002\n[Gecko_Enabled]\n$Same\n";
        let (list, diagnostics) = decode(input.as_bytes())?;

        assert_eq!(list.enabled_codes().count(), 2);
        assert_eq!(diagnostics.len(), 1);
        assert!(matches!(
            diagnostics.iter().next(),
            Some(Event::AmbiguousName { name }) if name == "Same"
        ));
        Ok(())
    }

    #[traced_test]
    #[test]
    fn nameless_code_gets_placeholder() -> Result<()> {
        let input = "[Gecko]\n$\n04000000 00000001\n$ [Someone]\n04000000 00000002\n";
        let (list, _) = decode(input.as_bytes())?;

        let names: Vec<_> = list.codes().map(|(_, n, c)| (n.name.clone(), c.author.clone())).collect();
        assert_eq!(
            names,
            vec![
                ("Unknown Code 1".to_string(), String::new()),
                ("Unknown Code 2".to_string(), "Someone".to_string()),
            ]
        );
        Ok(())
    }
}
