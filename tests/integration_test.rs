//! Integration tests for paradup.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use paradup::services::deduplication::{NearDuplicateDetector, build_report};
use paradup::{
    CorpusEntry, CorpusStore, DuplicateDetectionService, DuplicateDetector, DuplicateReport,
    EntryId, Error, ExternalMatch, FetchResult, InternalMatch, MatchKind, MemoryCorpusStore,
    Result, Scope, SqliteCorpusStore, TextEntry,
};
use std::collections::HashSet;
use std::sync::Arc;

fn words(n: usize) -> String {
    (0..n).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ")
}

/// A corpus whose reads always fail.
struct UnreachableStore;

impl CorpusStore for UnreachableStore {
    fn find_entries(&self, _scope: &Scope) -> Result<Vec<CorpusEntry>> {
        Err(Error::operation("find_entries", "connection refused"))
    }

    fn save(&self, _entry: &TextEntry) -> Result<()> {
        Ok(())
    }

    fn update_duplicate_metadata(&self, _id: &EntryId, _report: &DuplicateReport) -> Result<()> {
        Ok(())
    }

    fn get(&self, _id: &EntryId, _scope: &Scope) -> Result<Option<TextEntry>> {
        Ok(None)
    }

    fn list(&self, _scope: &Scope, _offset: usize, _limit: usize) -> Result<Vec<TextEntry>> {
        Ok(Vec::new())
    }
}

#[test]
fn test_error_types() {
    let err = Error::InvalidInput("test message".to_string());
    assert!(err.to_string().contains("invalid input"));

    let err = Error::operation("find_entries", "connection refused");
    let display = err.to_string();
    assert!(display.contains("find_entries"));
    assert!(display.contains("connection refused"));
}

#[test]
fn test_identical_lines_are_internal_exact() {
    let result = DuplicateDetector::default().detect_within_text("A.\nA.");
    assert_eq!(
        result.internal_matches,
        vec![InternalMatch {
            index: 1,
            paragraph: "A.".to_string(),
            original_index: 0,
            kind: MatchKind::Exact,
        }]
    );
}

#[test]
fn test_chained_duplicates_point_to_first() {
    let result = DuplicateDetector::default().detect_within_text("A.\nB.\nA.\nA.");
    let got: Vec<_> = result
        .internal_matches
        .iter()
        .map(|m| (m.index, m.original_index))
        .collect();
    assert_eq!(got, vec![(2, 0), (3, 0)]);
}

#[test]
fn test_single_paragraph_corpus_exact() {
    let detector = DuplicateDetector::default();
    let within = detector.detect_within_text("X");
    let external = detector.detect_against_corpus(&within, &[CorpusEntry::new("e1", "X")]);
    assert_eq!(
        external,
        vec![ExternalMatch {
            source_id: EntryId::new("e1"),
            source_paragraph_index: 0,
            paragraph: "X".to_string(),
            new_text_index: 0,
            kind: MatchKind::Exact,
        }]
    );
}

#[test]
fn test_threshold_boundaries() {
    let detector = NearDuplicateDetector::default();

    // 4 shared of 5 shingles: exactly 0.8
    let (a, b) = (words(9), words(8));
    assert!((detector.similarity(&a, &b) - 0.8).abs() < f64::EPSILON);
    assert!(detector.is_similar(&a, &b));

    // 11 shared of 14: below the threshold
    assert!(!detector.is_similar(&words(18), &words(15)));

    // identical: 1.0 is never Similar
    assert!((detector.similarity(&a, &a) - 1.0).abs() < f64::EPSILON);
    assert!(!detector.is_similar(&a, &a));
}

#[test]
fn test_similar_reported_at_exact_threshold() {
    let text = format!("{}\n{}", words(9), words(8));
    let result = DuplicateDetector::default().detect_within_text(&text);
    assert_eq!(result.internal_matches.len(), 1);
    assert_eq!(result.internal_matches[0].kind, MatchKind::Similar);
    assert_eq!(result.internal_matches[0].original_index, 0);
}

#[test]
fn test_short_paragraphs_have_zero_similarity() {
    let detector = NearDuplicateDetector::default();
    assert!(detector.similarity("four words only here", "four words only here").abs() < f64::EPSILON);
    assert!(detector.similarity("", &words(10)).abs() < f64::EPSILON);
}

#[test]
fn test_one_word_change_in_short_sentence_is_not_similar() {
    // With 5-word shingles a single substitution in a 9-word line removes
    // most shared windows.
    let text = "the quick brown fox jumps over the lazy dog\n\
                the quick brown fox leaps over a lazy dog";
    let result = DuplicateDetector::default().detect_within_text(text);
    assert!(result.internal_matches.is_empty());
}

#[test]
fn test_exact_and_similar_are_mutually_exclusive() {
    let text = format!("{0}\n{1}\n{0}\n{2}", words(20), words(19), words(21));
    let corpus = vec![
        CorpusEntry::new("e1", format!("{}\n{}", words(20), words(19))),
        CorpusEntry::new("e2", words(21)),
    ];
    let report = DuplicateDetector::default().detect(&text, &corpus);
    assert!(!report.is_empty());

    let internal_exact: HashSet<_> = report
        .internal
        .iter()
        .filter(|m| m.kind == MatchKind::Exact)
        .map(|m| (m.original_index, m.index))
        .collect();
    for m in report.internal.iter().filter(|m| m.kind == MatchKind::Similar) {
        assert!(!internal_exact.contains(&(m.original_index, m.index)));
    }

    let external_exact: HashSet<_> = report
        .external
        .iter()
        .filter(|m| m.kind == MatchKind::Exact)
        .map(|m| (m.source_id.clone(), m.source_paragraph_index, m.new_text_index))
        .collect();
    for m in report.external.iter().filter(|m| m.kind == MatchKind::Similar) {
        assert!(!external_exact.contains(&(
            m.source_id.clone(),
            m.source_paragraph_index,
            m.new_text_index
        )));
    }
}

#[test]
fn test_external_matches_are_grouped_by_entry_in_corpus_order() {
    let corpus: Vec<_> = ["z", "a", "m"]
        .iter()
        .map(|id| CorpusEntry::new(*id, "Shared line.\nShared line."))
        .collect();
    let report = DuplicateDetector::default().detect("Shared line.", &corpus);

    let ids: Vec<_> = report.external.iter().map(|m| m.source_id.as_str()).collect();
    assert_eq!(ids, vec!["z", "z", "a", "a", "m", "m"]);
    let indices: Vec<_> = report.external.iter().map(|m| m.source_paragraph_index).collect();
    assert_eq!(indices, vec![0, 1, 0, 1, 0, 1]);
}

#[test]
fn test_exact_match_ignores_case_and_spacing() {
    let corpus = vec![CorpusEntry::new("e1", "Hello   World.")];
    let report = DuplicateDetector::default().detect("hello world.", &corpus);
    assert_eq!(report.external.len(), 1);
    assert_eq!(report.external[0].kind, MatchKind::Exact);
    assert_eq!(report.external[0].paragraph, "Hello   World.");
}

#[test]
fn test_report_builder_is_pure_aggregation() {
    let detector = DuplicateDetector::default();
    let within = detector.detect_within_text("A.\nA.");
    let external = detector.detect_against_corpus(&within, &[CorpusEntry::new("e", "A.")]);
    let report = build_report(within.internal_matches.clone(), external.clone());
    assert_eq!(report.internal, within.internal_matches);
    assert_eq!(report.external, external);
    // one internal repeat, and the stored "A." points at the first occurrence only
    assert_eq!(report.count_kind(MatchKind::Exact), 2);
    assert_eq!(external.len(), 1);
    assert_eq!(external[0].new_text_index, 0);
}

#[test]
fn test_identical_shingle_sets_surface_as_exact() {
    let a = "a b c d e a b c d e";
    let b = "a b c d e a b c d e a b c d e";
    assert!((NearDuplicateDetector::default().similarity(a, b) - 1.0).abs() < f64::EPSILON);

    let detector = DuplicateDetector::default();
    let within = detector.detect_within_text(&format!("{a}\n{b}"));
    let internal: Vec<_> = within
        .internal_matches
        .iter()
        .map(|m| (m.index, m.original_index, m.kind))
        .collect();
    assert_eq!(internal, vec![(1, 0, MatchKind::Exact)]);

    let report = detector.detect(b, &[CorpusEntry::new("e1", a)]);
    let external: Vec<_> = report
        .external
        .iter()
        .map(|m| (m.source_paragraph_index, m.new_text_index, m.kind))
        .collect();
    assert_eq!(external, vec![(0, 0, MatchKind::Exact)]);
    assert_eq!(report.count_kind(MatchKind::Similar), 0);
}

#[test]
fn test_fetched_batch_scenario() {
    let service = DuplicateDetectionService::new(
        Arc::new(MemoryCorpusStore::new()),
        DuplicateDetector::default(),
    );
    let items = service
        .compare_fetched_batch(vec![
            FetchResult::content("a", "hello"),
            FetchResult::error("b", "timeout"),
        ])
        .unwrap();

    let json = serde_json::to_value(&items).unwrap();
    assert_eq!(
        json,
        serde_json::json!([
            {"url": "a", "report": {"internal": [], "external": []}},
            {"url": "b", "error": "timeout"}
        ])
    );
}

#[test]
fn test_corpus_read_failure_aborts_request() {
    let service = DuplicateDetectionService::new(Arc::new(UnreachableStore), DuplicateDetector::default());

    let err = service.check("Anything.", &Scope::All).unwrap_err();
    assert!(matches!(err, Error::OperationFailed { ref operation, .. } if operation == "find_entries"));
    assert!(service.submit("Anything.", "alice").is_err());
    assert!(
        service
            .compare_fetched_batch(vec![FetchResult::content("a", "page text")])
            .is_err()
    );
}

#[test]
fn test_submission_flow_on_sqlite() {
    let service = DuplicateDetectionService::new(
        Arc::new(SqliteCorpusStore::in_memory().unwrap()),
        DuplicateDetector::default(),
    );

    let first = service
        .submit(&format!("Introduction.\n{}", words(20)), "alice")
        .unwrap();
    assert!(first.report.is_empty());

    let second = service
        .submit(&format!("{}\nIntroduction.", words(19)), "alice")
        .unwrap();
    let kinds: Vec<_> = second
        .report
        .external
        .iter()
        .map(|m| (m.source_paragraph_index, m.new_text_index, m.kind))
        .collect();
    assert_eq!(kinds, vec![(0, 1, MatchKind::Exact), (1, 0, MatchKind::Similar)]);
    assert!(second.report.external.iter().all(|m| m.source_id == first.id));

    let page = service.list("alice", 1, 10).unwrap();
    assert_eq!(page.total_entries, 2);
    assert_eq!(page.entries[0].id, second.id);

    let stored = service.get(&second.id, "alice").unwrap();
    assert_eq!(stored.duplicates, second.report);
    assert!(matches!(service.get(&second.id, "mallory"), Err(Error::NotFound(_))));
}

#[test]
fn test_blank_submission_rejected() {
    let service = DuplicateDetectionService::new(
        Arc::new(MemoryCorpusStore::new()),
        DuplicateDetector::default(),
    );
    assert!(matches!(service.submit("\n\n", "alice"), Err(Error::InvalidInput(_))));
}
