//! Cosmetic markdown stripping for model replies.
//!
//! This is a literal character/substring removal, not a markdown parser.
//! Single characters go first and `__` last, so the output never contains
//! anything the pass would remove again.

const STRIPPED_CHARS: [char; 8] = ['`', '#', '*', '~', '[', ']', '(', ')'];
const STRIPPED_SEQUENCES: [&str; 1] = ["__"];

pub fn strip_markdown(text: &str) -> String {
    let without_chars: String = text
        .chars()
        .filter(|ch| !STRIPPED_CHARS.contains(ch))
        .collect();

    STRIPPED_SEQUENCES
        .iter()
        .fold(without_chars, |acc, seq| acc.replace(seq, ""))
}
