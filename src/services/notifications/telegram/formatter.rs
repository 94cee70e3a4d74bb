//! MarkdownV2 escaping for Telegram message text.

use std::borrow::Cow;

/// Characters that would otherwise be parsed as MarkdownV2 syntax.
///
/// Asterisks, underscores, pipes, backticks, brackets, parentheses and
/// backslashes are left alone so callers can still write bold, italic,
/// spoiler, code and link markup on purpose.
pub const RESERVED_CHARS: [char; 10] = ['~', '>', '#', '+', '-', '=', '{', '}', '.', '!'];

fn is_reserved(c: char) -> bool {
    RESERVED_CHARS.contains(&c)
}

/// Prefixes every reserved character with a backslash.
///
/// Borrows the input unchanged when nothing needs escaping.
pub fn escape_markdown_v2(text: &str) -> Cow<'_, str> {
    let reserved = text.chars().filter(|&c| is_reserved(c)).count();
    if reserved == 0 {
        return Cow::Borrowed(text);
    }

    let mut escaped = String::with_capacity(text.len() + reserved);
    for c in text.chars() {
        if is_reserved(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    Cow::Owned(escaped)
}

/// Optional-input form: `None` stays `None`.
pub fn escape_optional(text: Option<&str>) -> Option<Cow<'_, str>> {
    text.map(escape_markdown_v2)
}
