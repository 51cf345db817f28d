//! Fixed-size passage splitting for the semantic index.

use text_splitter::TextSplitter;

/// Default passage size in characters.
pub const DEFAULT_PASSAGE_SIZE: usize = 512;

/// A passage candidate before embedding.
#[derive(Debug, Clone, PartialEq)]
pub struct Passage {
    /// Position within the source document
    pub position: u32,

    /// Text content
    pub text: String,
}

/// Split document text into fixed-size passages.
pub fn split_passages(text: &str, target_size: usize) -> Vec<Passage> {
    let splitter = TextSplitter::new(target_size);

    let passages: Vec<Passage> = splitter
        .chunks(text)
        .filter(|chunk| !chunk.trim().is_empty())
        .enumerate()
        .map(|(position, chunk)| Passage {
            position: position as u32,
            text: chunk.trim().to_string(),
        })
        .collect();

    tracing::debug!(
        "Split {} bytes of text into {} passages (target size {})",
        text.len(),
        passages.len(),
        target_size
    );

    passages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_basic() {
        let text = "Indicator definitions are reviewed quarterly. ".repeat(40);
        let passages = split_passages(&text, 200);

        assert!(passages.len() > 1);
        for (i, passage) in passages.iter().enumerate() {
            assert_eq!(passage.position, i as u32);
            assert!(passage.text.len() <= 200);
            assert!(!passage.text.trim().is_empty());
        }
    }

    #[test]
    fn test_split_empty() {
        assert!(split_passages("", 200).is_empty());
        assert!(split_passages("   \n  ", 200).is_empty());
    }

    #[test]
    fn test_split_short_text_single_passage() {
        let passages = split_passages("One short line.", 200);
        assert_eq!(passages.len(), 1);
        assert_eq!(passages[0].text, "One short line.");
    }
}
