use crate::models::SegmenterKind;
use crate::utils::strings;
use unicode_segmentation::UnicodeSegmentation;

/// Splits text into paragraphs separated by blank lines.
///
/// Line endings are normalised, whitespace inside each paragraph collapses to
/// single spaces and empty paragraphs are dropped.
pub fn paragraphs(text: &str) -> Vec<String> {
    let normalized = text.replace("\r\n", "\n");
    let normalized = normalized.trim();
    if normalized.is_empty() {
        return Vec::new();
    }

    let mut out = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in normalized.split('\n') {
        if line.trim().is_empty() {
            flush_paragraph(&mut current, &mut out);
        } else {
            current.push(line);
        }
    }
    flush_paragraph(&mut current, &mut out);

    out
}

fn flush_paragraph(lines: &mut Vec<&str>, out: &mut Vec<String>) {
    if lines.is_empty() {
        return;
    }
    let para = strings::collapse_whitespace(&lines.join(" "));
    if !para.is_empty() {
        out.push(para);
    }
    lines.clear();
}

/// Flattens every paragraph's sentences into one ordered list.
pub fn sentences_of(paragraphs: &[String], kind: SegmenterKind) -> Vec<String> {
    paragraphs
        .iter()
        .flat_map(|para| match kind {
            SegmenterKind::Unicode => split_unicode(para),
            SegmenterKind::Heuristic => split_heuristic(para),
        })
        .collect()
}

fn split_unicode(paragraph: &str) -> Vec<String> {
    paragraph
        .split_sentence_bounds()
        .map(strings::collapse_whitespace)
        .filter(|s| !s.is_empty())
        .collect()
}

fn split_heuristic(paragraph: &str) -> Vec<String> {
    let chars: Vec<(usize, char)> = paragraph.char_indices().collect();
    let mut out = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < chars.len() {
        let (byte_idx, c) = chars[i];
        if strings::is_sentence_terminator(c) {
            let mut j = i + 1;
            while j < chars.len() && chars[j].1.is_whitespace() {
                j += 1;
            }
            // needs at least one whitespace char and an opener after it
            if j > i + 1 && j < chars.len() && strings::opens_sentence(chars[j].1) {
                push_sentence(&paragraph[start..byte_idx + c.len_utf8()], &mut out);
                start = chars[j].0;
                i = j;
                continue;
            }
        }
        i += 1;
    }
    push_sentence(&paragraph[start..], &mut out);

    out
}

fn push_sentence(raw: &str, out: &mut Vec<String>) {
    let sentence = strings::collapse_whitespace(raw);
    if !sentence.is_empty() {
        out.push(sentence);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Hello there. It is me.\n\nI choose you.";

    fn sentences(text: &str, kind: SegmenterKind) -> Vec<String> {
        sentences_of(&paragraphs(text), kind)
    }

    #[test]
    fn splits_paragraphs_on_blank_lines() {
        assert_eq!(
            paragraphs(SAMPLE),
            vec!["Hello there. It is me.", "I choose you."]
        );
    }

    #[test]
    fn paragraphs_collapse_internal_whitespace() {
        let text = "\r\n  First   line\r\nwraps here.\r\n \t \r\nSecond.\n\n\n\n";
        assert_eq!(paragraphs(text), vec!["First line wraps here.", "Second."]);
    }

    #[test]
    fn both_strategies_agree_on_simple_letter() {
        let expected = vec!["Hello there.", "It is me.", "I choose you."];
        assert_eq!(sentences(SAMPLE, SegmenterKind::Unicode), expected);
        assert_eq!(sentences(SAMPLE, SegmenterKind::Heuristic), expected);
    }

    #[test]
    fn empty_input_has_no_sentences() {
        for kind in [SegmenterKind::Unicode, SegmenterKind::Heuristic] {
            assert!(sentences("", kind).is_empty());
            assert!(sentences(" \n\n\t \r\n ", kind).is_empty());
        }
    }

    #[test]
    fn heuristic_only_splits_before_capitals_or_quotes() {
        let para = "Wait... then what? \"Nothing,\" she said. and so on! Yes.";
        assert_eq!(
            split_heuristic(para),
            vec![
                "Wait... then what?",
                "\"Nothing,\" she said. and so on!",
                "Yes.",
            ]
        );
    }

    #[test]
    fn heuristic_needs_whitespace_after_terminator() {
        assert_eq!(split_heuristic("Version 1.Two"), vec!["Version 1.Two"]);
    }

    #[test]
    fn segmentation_is_deterministic() {
        let text = "One day. Another day!\n\nA third? \"Yes.\" Fine.";
        for kind in [SegmenterKind::Unicode, SegmenterKind::Heuristic] {
            let first = sentences(text, kind);
            let second = sentences(text, kind);
            assert_eq!(first, second);
            assert!(first.iter().all(|s| !s.trim().is_empty()));
        }
    }
}
