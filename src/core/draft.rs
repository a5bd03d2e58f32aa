/// Split pasted multi-line draft text into item texts.
///
/// Each line is trimmed; blank lines are dropped. Order is preserved.
pub fn draft_lines(draft: &str) -> Vec<String> {
    draft
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}
