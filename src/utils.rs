use regex::Regex;
use std::borrow::Cow;
use std::io::{self, BufWriter, Write};
use std::sync::LazyLock;

/// Single-character bracket tags such as `[a]`, used in timetables as footnote markers.
static BRACKET_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[.\]").unwrap());

/// Removes every `[x]` footnote tag from a token or line.
pub fn strip_bracket_tags(s: &str) -> Cow<'_, str> {
    BRACKET_TAG.replace_all(s, "")
}

/// Trimmed source lines with blank lines and `#` comments dropped.
pub fn significant_lines(source: &str) -> impl Iterator<Item = &str> {
    source
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
}

/// Writes compiled text to standard output in one buffered pass.
pub fn write_output(text: &str) -> io::Result<()> {
    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    writer.write_all(text.as_bytes())?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_bracket_tags() {
        assert_eq!(strip_bracket_tags("NSCO[a]"), "NSCO");
        assert_eq!(strip_bracket_tags("07:15[é] 08:00"), "07:15 08:00");
        // Only single-character tags are footnotes
        assert_eq!(strip_bracket_tags("[ab] 08:00"), "[ab] 08:00");
    }

    #[test]
    fn test_significant_lines() {
        let source = "# comment\n\n  name=601  \n\t\n  # indented comment\ndirection=\r\n";
        let lines: Vec<&str> = significant_lines(source).collect();
        assert_eq!(lines, vec!["name=601", "direction="]);
    }
}
