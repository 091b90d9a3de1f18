// Unit tests for term importance ranking and output helpers.
//
// Tests the DegenerateInput boundary (documents vs vocabulary size), ranked
// output length and ordering, and truncate_chars UTF-8 safety.

use titlecraft::output::truncate_chars;
use titlecraft::scoring::importance::{FitPolicy, ImportanceRanker};
use titlecraft::scoring::regression::least_squares;
use titlecraft::topics::normalize::NormalizedDocument;
use titlecraft::topics::tfidf::{TermMatrix, TfIdfVectorizer};
use titlecraft::topics::traits::Vectorizer;
use titlecraft::AnalysisError;

fn matrix(texts: &[&str]) -> TermMatrix {
    let docs: Vec<NormalizedDocument> = texts
        .iter()
        .enumerate()
        .map(|(i, t)| NormalizedDocument {
            source_id: i,
            text: t.to_string(),
        })
        .collect();
    TfIdfVectorizer::default().fit_transform(&docs)
}

// ============================================================
// DegenerateInput — document count vs vocabulary size
// ============================================================

#[test]
fn two_documents_five_terms_is_degenerate() {
    let m = matrix(&["alpha bravo charlie", "delta echo"]);
    assert_eq!(m.n_terms(), 5);
    let err = ImportanceRanker::default().fit(&m, &[10.0, 20.0]).unwrap_err();
    assert!(
        matches!(err, AnalysisError::DegenerateInput { .. }),
        "Expected DegenerateInput, got {err:?}"
    );
}

#[test]
fn documents_equal_to_vocabulary_is_degenerate() {
    let m = matrix(&["alpha", "bravo", "charlie", "delta", "echo"]);
    assert_eq!(m.n_documents(), m.n_terms());
    let result = ImportanceRanker::default().fit(&m, &[1.0, 2.0, 3.0, 4.0, 5.0]);
    assert!(matches!(result, Err(AnalysisError::DegenerateInput { .. })));
}

#[test]
fn one_more_document_than_terms_fits() {
    let m = matrix(&["alpha", "bravo", "charlie", "delta", "echo", "alpha bravo"]);
    assert_eq!(m.n_terms(), 5);
    let importance = ImportanceRanker::default()
        .fit(&m, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0])
        .unwrap();
    assert_eq!(importance.len(), 5);
}

#[test]
fn zero_variance_target_is_degenerate() {
    let m = matrix(&["alpha", "bravo", "alpha bravo", "bravo"]);
    let result = ImportanceRanker::default().fit(&m, &[7.0; 4]);
    assert!(matches!(result, Err(AnalysisError::DegenerateInput { .. })));
}

#[test]
fn empty_vocabulary_is_degenerate() {
    let m = matrix(&["the", "and", "of"]);
    let result = ImportanceRanker::new(FitPolicy::MinimumNorm).fit(&m, &[1.0, 2.0, 3.0]);
    assert!(matches!(result, Err(AnalysisError::DegenerateInput { .. })));
}

#[test]
fn minimum_norm_policy_accepts_underdetermined() {
    let m = matrix(&["alpha bravo charlie", "delta echo"]);
    let importance = ImportanceRanker::new(FitPolicy::MinimumNorm)
        .fit(&m, &[10.0, 20.0])
        .unwrap();
    assert_eq!(importance.len(), 5);
    // The two-row fit is exact
    assert!((importance.r_squared() - 1.0).abs() < 1e-9);
}

// ============================================================
// Ranked output
// ============================================================

#[test]
fn ranked_length_equals_vocabulary() {
    let m = matrix(&[
        "gaming live", "gaming news", "cooking live", "cooking news", "travel vlog",
        "travel live", "gaming vlog",
    ]);
    let views = [900.0, 700.0, 200.0, 100.0, 50.0, 300.0, 800.0];
    let importance = ImportanceRanker::default().fit(&m, &views).unwrap();
    assert_eq!(importance.ranked().len(), m.n_terms());
    assert_eq!(importance.top(3).len(), 3);
    assert_eq!(importance.top(100).len(), m.n_terms());
}

#[test]
fn ranked_is_descending() {
    let m = matrix(&[
        "gaming live", "gaming news", "cooking live", "cooking news", "travel vlog",
        "travel live", "gaming vlog",
    ]);
    let views = [900.0, 700.0, 200.0, 100.0, 50.0, 300.0, 800.0];
    let ranked = ImportanceRanker::default().fit(&m, &views).unwrap().ranked();
    for pair in ranked.windows(2) {
        assert!(pair[0].coefficient >= pair[1].coefficient);
    }
    assert_eq!(ranked[0].term, "gaming", "gaming videos have the most views");
}

#[test]
fn identical_columns_share_coefficient() {
    // "xray" and "yankee" always co-occur, so their columns are identical
    // and the minimum-norm fit splits the weight evenly between them.
    let m = matrix(&["yankee xray", "zulu", "yankee xray zulu", "zulu zulu", "quebec"]);
    assert_eq!(m.vocabulary(), &["quebec", "xray", "yankee", "zulu"]);
    let views = [50.0, 10.0, 40.0, 5.0, 1.0];
    let ranked = ImportanceRanker::default().fit(&m, &views).unwrap().ranked();
    let xi = ranked.iter().position(|r| r.term == "xray").unwrap();
    let yi = ranked.iter().position(|r| r.term == "yankee").unwrap();
    assert!(
        (ranked[xi].coefficient - ranked[yi].coefficient).abs() < 1e-6,
        "co-occurring terms should share a coefficient"
    );
    assert_eq!(xi.abs_diff(yi), 1, "co-occurring terms should rank next to each other");
    assert_eq!(ranked.last().unwrap().term, "quebec");
}

// ============================================================
// least_squares — direct
// ============================================================

#[test]
fn least_squares_recovers_intercept() {
    let x = vec![vec![1.0], vec![2.0], vec![3.0]];
    let y = vec![12.0, 14.0, 16.0];
    let fit = least_squares(&x, &y);
    assert!((fit.intercept - 10.0).abs() < 1e-9);
    assert!((fit.coefficients[0] - 2.0).abs() < 1e-9);
}

// ============================================================
// truncate_chars — UTF-8 safety
// ============================================================

#[test]
fn truncate_short_string_unchanged() {
    assert_eq!(truncate_chars("hello", 10), "hello");
}

#[test]
fn truncate_multibyte() {
    assert_eq!(truncate_chars("🎮🎮🎮🎮", 2), "🎮🎮...");
}
