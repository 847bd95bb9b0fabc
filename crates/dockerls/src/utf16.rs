/// Convert a UTF-16 column offset (from LSP Position.character) to a char
/// column within the given line. The parse pipeline works in char columns,
/// not UTF-16 code units.
pub fn utf16_col_to_char_col(line: &str, utf16_col: u32) -> usize {
    let mut utf16_count = 0usize;
    for (char_idx, ch) in line.chars().enumerate() {
        if utf16_count >= utf16_col as usize {
            return char_idx;
        }
        utf16_count += ch.len_utf16();
    }
    line.chars().count()
}

/// Convert a char column within a line back to a UTF-16 column for LSP
/// Position/Range payloads.
pub fn char_col_to_utf16_col(line: &str, char_col: usize) -> u32 {
    line.chars()
        .take(char_col)
        .map(|ch| ch.len_utf16() as u32)
        .sum()
}
