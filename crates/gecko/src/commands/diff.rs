use std::fmt::Display;
use std::path::PathBuf;

use clap::Args;
use gecko_list::{Code, CodeList};
use indexmap::IndexMap;
use itertools::Itertools;
use miette::Result;
use owo_colors::OwoColorize;
use similar::{ChangeTag, TextDiff};

use crate::format::load_all;

#[derive(Debug, Eq, PartialEq)]
pub enum Change {
    Added(String),
    Removed(String),
    Comparison(String, String, String),
    Context(Vec<String>),
    Modified(String, Vec<Change>),
}

impl Display for Change {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Change::Added(v) => writeln!(f, "✅ {}", v.green()),
            Change::Removed(v) => writeln!(f, "❌ {}", v.red()),
            Change::Comparison(key, old, new) => {
                writeln!(f, "* {}: {} vs {}", key, old.red(), new.green())
            }
            Change::Context(lines) => writeln!(f, "{}", lines.iter().map(|l| format!(" {}", l)).join("\n")),
            Change::Modified(v, related) => {
                writeln!(f, "🔃 {}", v.blue())?;
                let body = related.iter().map(|c| c.to_string()).join("");
                writeln!(
                    f,
                    "{}",
                    body.split('\n')
                        .filter(|l| !l.trim().is_empty())
                        .map(|l| format!("  {}", l))
                        .join("\n")
                )
            }
        }
    }
}

#[derive(Args)]
pub struct DiffArgs {
    /// An input code list
    #[arg(short, long, value_name = "FILE")]
    left: PathBuf,

    /// An input code list
    #[arg(short, long, value_name = "FILE")]
    right: PathBuf,
}

/// Codes keyed by name, in document order. Later duplicates are suffixed with their position.
fn by_name(list: &CodeList) -> IndexMap<String, &Code> {
    let mut codes = IndexMap::new();
    for (i, (_, node, code)) in list.codes().enumerate() {
        let key = if codes.contains_key(&node.name) {
            format!("{} ({})", node.name, i + 1)
        } else {
            node.name.clone()
        };
        codes.insert(key, code);
    }
    codes
}

fn line_diff(old: &str, new: &str) -> Vec<String> {
    let diff = TextDiff::from_lines(old, new);
    diff.iter_all_changes()
        .map(|change| {
            let line = change.value().trim_end();
            match change.tag() {
                ChangeTag::Insert => format!("{} {}", "+".green(), line.green()),
                ChangeTag::Delete => format!("{} {}", "-".red(), line.red()),
                ChangeTag::Equal => format!("  {}", line.dimmed()),
            }
        })
        .collect()
}

fn compare_code(name: &str, left: &Code, right: &Code) -> Option<Change> {
    let mut related = Vec::new();

    if left.enabled != right.enabled {
        related.push(Change::Comparison(
            "enabled".into(),
            left.enabled.to_string(),
            right.enabled.to_string(),
        ));
    }
    if left.author != right.author {
        related.push(Change::Comparison(
            "author".into(),
            left.author.clone(),
            right.author.clone(),
        ));
    }
    if left.lines.lines().ne(right.lines.lines()) {
        let old = left.lines.lines().join("\n");
        let new = right.lines.lines().join("\n");
        related.push(Change::Context(line_diff(&old, &new)));
    }
    if left.comment != right.comment {
        related.push(Change::Context(line_diff(&left.comment, &right.comment)));
    }

    (!related.is_empty()).then(|| Change::Modified(name.to_string(), related))
}

/// Changes needed to turn `left` into `right`
pub fn compare(left: &CodeList, right: &CodeList) -> Vec<Change> {
    let mut result = Vec::new();

    if left.game_id() != right.game_id() {
        result.push(Change::Comparison(
            "game id".into(),
            left.game_id().to_string(),
            right.game_id().to_string(),
        ));
    }

    let left_codes = by_name(left);
    let right_codes = by_name(right);

    right_codes
        .keys()
        .filter(|k| !left_codes.contains_key(*k))
        .map(|k| Change::Added(k.clone()))
        .for_each(|c| result.push(c));

    left_codes
        .keys()
        .filter(|k| !right_codes.contains_key(*k))
        .map(|k| Change::Removed(k.clone()))
        .for_each(|c| result.push(c));

    left_codes
        .iter()
        .filter_map(|(k, l)| right_codes.get(k).and_then(|r| compare_code(k, l, r)))
        .for_each(|c| result.push(c));

    result
}

impl DiffArgs {
    pub fn handle(&self) -> Result<()> {
        let policy = gecko_list::MismatchPolicy::Continue;
        let (left, _) = load_all([self.left.as_path()], policy)?;
        let (right, _) = load_all([self.right.as_path()], policy)?;

        for change in compare(&left, &right) {
            print!("{}", change);
        }
        Ok(())
    }
}
