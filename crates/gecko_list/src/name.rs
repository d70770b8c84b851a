//! Helpers for the `name [author]` convention shared by every serialized form.

use winnow::prelude::*;
use winnow::stream::AsChar;
use winnow::token::take_while;
use winnow::PResult;

/// Game id written by older tools when the game was not known.
pub const LEGACY_UNKNOWN_GAME_ID: &str = "UNKW00";

/// Prefix of generated code names.
pub const PLACEHOLDER_PREFIX: &str = "Unknown Code";

fn game_id<'s>(input: &mut &'s str) -> PResult<&'s str> {
    take_while(4..=6, AsChar::is_alphanum).parse_next(input)
}

/// Whether the text is a 4 to 6 character alphanumeric game id.
pub fn is_game_id(text: &str) -> bool {
    game_id.parse(text).is_ok()
}

/// Split a serialized `name [author]` title into its name and author.
///
/// ```
/// use gecko_list::name::split_author;
///
/// assert_eq!(split_author("Moon Jump [Gecko]"), ("Moon Jump", "Gecko"));
/// assert_eq!(split_author("Moon Jump"), ("Moon Jump", ""));
/// ```
pub fn split_author(title: &str) -> (&str, &str) {
    let title = title.trim_end();
    if let Some(start) = title.find(" [") {
        if let Some(author) = title[start + 2..].strip_suffix(']') {
            return (title[..start].trim_end(), author.trim());
        }
    }
    (title, "")
}

/// Join a name and an author back into a title, leaving out an empty author.
pub fn join_author(name: &str, author: &str) -> String {
    if author.is_empty() {
        name.to_string()
    } else {
        format!("{} [{}]", name, author)
    }
}

/// The generated name with the given counter.
pub fn placeholder(n: usize) -> String {
    format!("{} {}", PLACEHOLDER_PREFIX, n)
}
