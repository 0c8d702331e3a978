//! Cross-corpus comparison.
//!
//! Each corpus entry is segmented and compared with the new text in two
//! passes. The exact pass runs to completion first and records every
//! `(source_paragraph_index, new_text_index)` pair it reports; the similar
//! pass then skips those pairs. Pairs whose shingle sets are identical but
//! whose hashes differ come out of the similar pass as exact. Entries are independent, so they are compared
//! on a rayon pool and merged back in corpus order.

use super::exact_match::HashIndex;
use super::hasher::ContentHasher;
use super::near_duplicate::PairScanner;
use super::segmenter::Segmenter;
use super::shingle::ShingleSet;
use super::types::WithinTextResult;
use crate::models::{CorpusEntry, ExternalMatch, MatchKind, ParagraphUnit};
use rayon::ThreadPool;
use rayon::prelude::*;
use std::collections::HashSet;
use tracing::instrument;

/// Compares one new text with stored texts.
pub struct CrossCorpusComparator<'a> {
    segmenter: Segmenter,
    shingle_size: usize,
    scanner: &'a dyn PairScanner,
}

impl<'a> CrossCorpusComparator<'a> {
    /// Creates a comparator.
    #[must_use]
    pub const fn new(segmenter: Segmenter, shingle_size: usize, scanner: &'a dyn PairScanner) -> Self {
        Self {
            segmenter,
            shingle_size,
            scanner,
        }
    }

    /// Compares the new text with a single corpus entry.
    ///
    /// Matches come back sorted by source paragraph, then new-text paragraph.
    #[must_use]
    pub fn compare_entry(&self, new_text: &WithinTextResult, entry: &CorpusEntry) -> Vec<ExternalMatch> {
        if new_text.paragraphs.is_empty() {
            return Vec::new();
        }

        let existing = self.segmenter.segment(&entry.content);
        let (mut matches, exact_pairs) = exact_pass(entry, &existing, &new_text.hashes);

        let existing_sets: Vec<ShingleSet> = existing
            .iter()
            .map(|u| ShingleSet::from_text(&u.text, self.shingle_size))
            .collect();

        for pair in self.scanner.across(&existing_sets, &new_text.shingles) {
            if exact_pairs.contains(&(pair.left, pair.right)) {
                continue;
            }
            let (Some(unit), Some(new_unit)) =
                (existing.get(pair.left), new_text.paragraphs.get(pair.right))
            else {
                continue;
            };
            let kind = pair.kind();
            // equal hashes were settled by the exact pass against the first occurrence
            if kind == MatchKind::Exact
                && ContentHasher::hash(&unit.text) == ContentHasher::hash(&new_unit.text)
            {
                continue;
            }
            matches.push(ExternalMatch {
                source_id: entry.id.clone(),
                source_paragraph_index: pair.left,
                paragraph: unit.text.clone(),
                new_text_index: pair.right,
                kind,
            });
        }

        matches.sort_by_key(ExternalMatch::sort_key);
        tracing::trace!(entry = %entry.id, matches = matches.len(), "Compared corpus entry");
        matches
    }

    /// Compares the new text with every entry.
    ///
    /// Runs on `pool` when given, otherwise on rayon's global pool. The result
    /// keeps corpus order regardless of which worker finished first.
    #[instrument(
        skip_all,
        fields(
            operation = "compare_corpus",
            entries = entries.len(),
            paragraphs = new_text.paragraphs.len()
        )
    )]
    pub fn compare_all(
        &self,
        new_text: &WithinTextResult,
        entries: &[CorpusEntry],
        pool: Option<&ThreadPool>,
    ) -> Vec<ExternalMatch> {
        let run = || {
            entries
                .par_iter()
                .map(|entry| self.compare_entry(new_text, entry))
                .collect::<Vec<_>>()
        };
        let per_entry = match pool {
            Some(pool) => pool.install(run),
            None => run(),
        };

        let matches: Vec<ExternalMatch> = per_entry.into_iter().flatten().collect();
        tracing::debug!(matches = matches.len(), "Corpus comparison complete");
        matches
    }
}

/// Reports every stored paragraph whose hash occurs in the new text.
fn exact_pass(
    entry: &CorpusEntry,
    existing: &[ParagraphUnit],
    hashes: &HashIndex,
) -> (Vec<ExternalMatch>, HashSet<(usize, usize)>) {
    let mut matches = Vec::new();
    let mut pairs = HashSet::new();

    for unit in existing {
        if let Some(new_text_index) = hashes.lookup(&unit.text) {
            pairs.insert((unit.index, new_text_index));
            matches.push(ExternalMatch {
                source_id: entry.id.clone(),
                source_paragraph_index: unit.index,
                paragraph: unit.text.clone(),
                new_text_index,
                kind: MatchKind::Exact,
            });
        }
    }

    (matches, pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::deduplication::DuplicateDetector;
    use crate::services::deduplication::near_duplicate::{NearDuplicateDetector, SimilarPair};

    fn words(n: usize) -> String {
        (0..n).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ")
    }

    fn comparator(scanner: &dyn PairScanner) -> CrossCorpusComparator<'_> {
        CrossCorpusComparator::new(Segmenter::default(), 5, scanner)
    }

    #[test]
    fn test_single_exact_match() {
        let detector = DuplicateDetector::default();
        let new_text = detector.detect_within_text("X");
        let scanner = NearDuplicateDetector::default();
        let matches = comparator(&scanner).compare_entry(&new_text, &CorpusEntry::new("e1", "X"));

        assert_eq!(
            matches,
            vec![ExternalMatch {
                source_id: "e1".into(),
                source_paragraph_index: 0,
                paragraph: "X".to_string(),
                new_text_index: 0,
                kind: MatchKind::Exact,
            }]
        );
    }

    #[test]
    fn test_exact_uses_first_occurrence_in_new_text() {
        let detector = DuplicateDetector::default();
        let new_text = detector.detect_within_text("other\nsame\nsame");
        let scanner = NearDuplicateDetector::default();
        let matches =
            comparator(&scanner).compare_entry(&new_text, &CorpusEntry::new("e1", "same\nsame"));

        let pairs: Vec<_> = matches
            .iter()
            .map(|m| (m.source_paragraph_index, m.new_text_index))
            .collect();
        assert_eq!(pairs, vec![(0, 1), (1, 1)]);
    }

    #[test]
    fn test_similar_match_reports_stored_paragraph() {
        let detector = DuplicateDetector::default();
        let new_text = detector.detect_within_text(&words(19));
        let scanner = NearDuplicateDetector::default();
        let stored = format!("intro line\n{}", words(20));
        let matches = comparator(&scanner).compare_entry(&new_text, &CorpusEntry::new("e1", stored));

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].kind, MatchKind::Similar);
        assert_eq!(matches[0].source_paragraph_index, 1);
        assert_eq!(matches[0].new_text_index, 0);
        assert_eq!(matches[0].paragraph, words(20));
    }

    /// Reports every pair as similar, to exercise exact-pair suppression.
    struct EverythingSimilar;

    impl PairScanner for EverythingSimilar {
        fn within(&self, _sets: &[ShingleSet]) -> Vec<SimilarPair> {
            Vec::new()
        }

        fn across(&self, left: &[ShingleSet], right: &[ShingleSet]) -> Vec<SimilarPair> {
            (0..left.len())
                .flat_map(|i| (0..right.len()).map(move |j| SimilarPair { left: i, right: j, similarity: 0.9 }))
                .collect()
        }
    }

    #[test]
    fn test_similar_pass_skips_exact_pairs() {
        let detector = DuplicateDetector::default();
        let new_text = detector.detect_within_text("A\nB");
        let matches =
            comparator(&EverythingSimilar).compare_entry(&new_text, &CorpusEntry::new("e1", "A"));

        let got: Vec<_> = matches
            .iter()
            .map(|m| (m.source_paragraph_index, m.new_text_index, m.kind))
            .collect();
        assert_eq!(got, vec![(0, 0, MatchKind::Exact), (0, 1, MatchKind::Similar)]);
    }

    #[test]
    fn test_identical_shingles_with_different_hashes_are_exact() {
        let detector = DuplicateDetector::default();
        let new_text = detector.detect_within_text("a b c d e a b c d e a b c d e");
        let scanner = NearDuplicateDetector::default();
        let matches = comparator(&scanner)
            .compare_entry(&new_text, &CorpusEntry::new("e1", "a b c d e a b c d e"));

        let got: Vec<_> = matches
            .iter()
            .map(|m| (m.source_paragraph_index, m.new_text_index, m.kind))
            .collect();
        assert_eq!(got, vec![(0, 0, MatchKind::Exact)]);
    }

    #[test]
    fn test_repeated_paragraph_in_new_text_is_not_reported_twice() {
        let detector = DuplicateDetector::default();
        let new_text = detector.detect_within_text(&format!("{0}\n{0}", words(12)));
        let scanner = NearDuplicateDetector::default();
        let matches =
            comparator(&scanner).compare_entry(&new_text, &CorpusEntry::new("e1", words(12)));

        let got: Vec<_> = matches
            .iter()
            .map(|m| (m.source_paragraph_index, m.new_text_index, m.kind))
            .collect();
        assert_eq!(got, vec![(0, 0, MatchKind::Exact)]);
    }

    #[test]
    fn test_empty_new_text_matches_nothing() {
        let detector = DuplicateDetector::default();
        let new_text = detector.detect_within_text("");
        let scanner = NearDuplicateDetector::default();
        assert!(comparator(&scanner)
            .compare_entry(&new_text, &CorpusEntry::new("e1", ""))
            .is_empty());
    }

    #[test]
    fn test_compare_all_keeps_corpus_order() {
        let detector = DuplicateDetector::default();
        let new_text = detector.detect_within_text("shared");
        let entries: Vec<_> = (0..32)
            .map(|i| CorpusEntry::new(format!("e{i:02}"), "shared"))
            .collect();
        let scanner = NearDuplicateDetector::default();
        let pool = rayon::ThreadPoolBuilder::new().num_threads(4).build().unwrap();

        let matches = comparator(&scanner).compare_all(&new_text, &entries, Some(&pool));
        let ids: Vec<_> = matches.iter().map(|m| m.source_id.to_string()).collect();
        let expected: Vec<_> = (0..32).map(|i| format!("e{i:02}")).collect();
        assert_eq!(ids, expected);
    }
}
