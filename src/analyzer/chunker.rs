//! Overlapping-Window Chunking
//!
//! Splits text into overlapping fixed-size windows for embedding. Windows
//! prefer to end on whitespace near the target size instead of cutting
//! mid-token; consecutive windows share roughly `overlap` characters.

use crate::constants::chunking;

pub struct Chunker {
    size: usize,
    overlap: usize,
}

impl Chunker {
    /// Create a chunker with the default window size and overlap.
    pub fn new() -> Self {
        Self::with_params(chunking::CHUNK_SIZE, chunking::CHUNK_OVERLAP)
    }

    /// Create a chunker with explicit parameters. The window size is
    /// clamped to at least one character and the overlap to below the
    /// window size.
    pub fn with_params(size: usize, overlap: usize) -> Self {
        let size = size.max(1);
        Self {
            size,
            overlap: overlap.min(size - 1),
        }
    }

    /// Split text into an ordered sequence of chunks covering the full
    /// input. The last chunk may be shorter than the target size.
    pub fn split(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        if chars.is_empty() {
            return Vec::new();
        }
        if chars.len() <= self.size {
            return vec![text.to_string()];
        }

        let mut chunks = Vec::new();
        let mut start = 0usize;
        loop {
            let hard_end = (start + self.size).min(chars.len());
            let end = if hard_end == chars.len() {
                hard_end
            } else {
                self.natural_break(&chars, start, hard_end)
            };

            chunks.push(chars[start..end].iter().collect());
            if end == chars.len() {
                break;
            }

            // Step back by the overlap, but always make forward progress
            // even for degenerate parameter combinations.
            let next = end.saturating_sub(self.overlap);
            start = if next > start { next } else { end };
        }

        chunks
    }

    /// Last whitespace within the trailing overlap window, or the hard cut
    /// when the window holds none.
    fn natural_break(&self, chars: &[char], start: usize, hard_end: usize) -> usize {
        let window_start = hard_end.saturating_sub(self.overlap).max(start + 1);
        for i in (window_start..hard_end).rev() {
            if chars[i].is_whitespace() {
                return i + 1;
            }
        }
        hard_end
    }
}

impl Default for Chunker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_yields_no_chunks() {
        assert!(Chunker::new().split("").is_empty());
    }

    #[test]
    fn test_short_input_is_one_chunk() {
        let chunks = Chunker::new().split("def main():\n    pass\n");
        assert_eq!(chunks, vec!["def main():\n    pass\n"]);
    }

    #[test]
    fn test_windows_cover_input_with_overlap() {
        // 800 unique five-character tokens: 4000 characters total
        let text: String = (0..800).map(|i| format!("{:04} ", i)).collect();
        let chunker = Chunker::with_params(2000, 200);
        let chunks = chunker.split(&text);

        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.chars().count() <= 2000));

        // Full coverage: stitching the chunks back together while dropping
        // each overlap reproduces the input.
        let mut rebuilt = chunks[0].clone();
        for pair in chunks.windows(2) {
            let overlap = overlap_len(&pair[0], &pair[1]);
            assert!(
                (150..=250).contains(&overlap),
                "expected ~200 shared characters, got {overlap}"
            );
            rebuilt.push_str(&pair[1][overlap..]);
        }
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn test_breaks_on_whitespace_near_target() {
        let text = "alpha ".repeat(700); // 4200 characters
        let chunks = Chunker::with_params(2000, 200).split(&text);
        for chunk in &chunks[..chunks.len() - 1] {
            assert!(
                chunk.ends_with(' '),
                "chunk should end at a token boundary"
            );
        }
    }

    #[test]
    fn test_unbroken_input_falls_back_to_hard_cut() {
        // No whitespace anywhere: every window takes the hard cut, so the
        // starts advance by size - overlap and the tail absorbs the rest.
        let text = "x".repeat(4500);
        let chunks = Chunker::with_params(2000, 200).split(&text);
        let lens: Vec<usize> = chunks.iter().map(String::len).collect();
        assert_eq!(lens, vec![2000, 2000, 900]);
    }

    /// Longest suffix of `a` that prefixes `b`.
    fn overlap_len(a: &str, b: &str) -> usize {
        let max = a.len().min(b.len());
        (0..=max)
            .rev()
            .find(|&n| a.ends_with(&b[..n]))
            .unwrap_or(0)
    }
}
