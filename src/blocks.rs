//! Schedule block mixer.
//!
//! Timetables copied out of PDF documents often come one column block at a
//! time. Each block starts with a line prefixed by `h=`. Blocks are merged side
//! by side into full schedule rows before they are pasted into a line
//! definition.

use super::error::BlockError;
use super::utils::significant_lines;

const BLOCK_MARKER: &str = "h=";

/// Splits text into `h=` blocks.
pub fn read_blocks(text: &str) -> Result<Vec<Vec<&str>>, BlockError> {
    let mut blocks: Vec<Vec<&str>> = Vec::new();
    for line in significant_lines(text) {
        let line = match line.strip_prefix(BLOCK_MARKER) {
            Some(rest) => {
                blocks.push(Vec::new());
                rest
            }
            None => line,
        };
        blocks
            .last_mut()
            .ok_or(BlockError::MissingHeader)?
            .push(line);
    }
    Ok(blocks)
}

/// Joins line `j` of every block into output line `j`.
pub fn mix_blocks(text: &str) -> Result<Vec<String>, BlockError> {
    let blocks = read_blocks(text)?;
    let Some(first) = blocks.first() else {
        return Ok(Vec::new());
    };

    let expected = first.len();
    for (k, block) in blocks.iter().enumerate() {
        if block.len() != expected {
            return Err(BlockError::LineCount {
                block: k + 1,
                found: block.len(),
                expected,
            });
        }
    }

    Ok((0..expected)
        .map(|j| {
            blocks
                .iter()
                .map(|block| block[j])
                .collect::<Vec<&str>>()
                .join(" ")
        })
        .collect())
}
