//! Integration tests for the classification engine
//!
//! Covers the decision boundaries of both threshold conventions, scanning
//! edge cases, evidence ordering and determinism.

use chanlist_classify::{
    classify, classify_chars, classify_words, Classifier, Document, Screen, ScanOptions,
    Strategy, Verdict,
};
use chanlist_common::config::parse_toml_config;
use serde_json::json;

fn no_videos() -> Vec<String> {
    Vec::new()
}

// ============================================================================
// Phrase variant
// ============================================================================

#[test]
fn test_phrase_threshold_boundary() {
    let keys = ["alpha", "beta", "gamma"];

    let at_threshold = Document::new("alpha here", "and beta there", no_videos());
    let verdict = classify(&at_threshold, keys, 2, &ScanOptions::default());
    assert_eq!(verdict.distinct_hit_count, 2);
    assert!(!verdict.ok, "reaching the threshold must reject");

    let below = Document::new("alpha here", "nothing else", no_videos());
    let verdict = classify(&below, keys, 2, &ScanOptions::default());
    assert_eq!(verdict.distinct_hit_count, 1);
    assert!(verdict.ok);
}

#[test]
fn test_phrase_counts_across_fields() {
    let doc = Document::new(
        "Baby Shark",
        "baby songs for every baby",
        ["Baby shark dance", "Wheels on the bus"],
    );
    let verdict = classify(&doc, ["baby", "bus", "shark"], 10, &ScanOptions::default());

    assert_eq!(verdict.distinct_hit_count, 3);
    assert_eq!(verdict.total_hit_count, 4 + 1 + 2);

    let baby = &verdict.matches[0];
    assert_eq!(baby.key, "baby");
    assert_eq!(baby.hits_total_in_document, 4);
    let per_field: Vec<(&str, usize)> = baby
        .per_field
        .iter()
        .map(|h| (h.field.as_str(), h.count))
        .collect();
    assert_eq!(
        per_field,
        vec![
            ("channelInfo.title", 1),
            ("channelInfo.description", 2),
            ("videos[0].title", 1),
        ]
    );
}

#[test]
fn test_overlapping_key_counts_are_finite() {
    let doc = Document::new("aaaa", "", no_videos());
    let verdict = classify(&doc, ["aa"], 5, &ScanOptions::default());

    assert_eq!(verdict.total_hit_count, 2);
    assert_eq!(verdict.matches[0].per_field[0].count, 2);
}

#[test]
fn test_ties_keep_key_order() {
    let doc = Document::new("zeta beta", "alpha alpha", no_videos());
    let verdict = classify(&doc, ["zeta", "alpha", "beta"], 10, &ScanOptions::default());

    let keys: Vec<&str> = verdict.matches.iter().map(|m| m.key.as_str()).collect();
    assert_eq!(keys, vec!["alpha", "zeta", "beta"]);
}

#[test]
fn test_samples_come_from_original_text() {
    let doc = Document::new("", "Watch FUN Videos for Kids!", no_videos());
    let verdict = classify(&doc, ["fun videos"], 5, &ScanOptions::default());

    assert_eq!(
        verdict.matches[0].per_field[0].samples,
        vec!["Watch FUN Videos for Kids!"]
    );
}

#[test]
fn test_unicode_case_folding() {
    let doc = Document::new("ДЕТСКИЕ песни", "", no_videos());
    let verdict = classify(&doc, ["детские"], 5, &ScanOptions::default());
    assert_eq!(verdict.total_hit_count, 1);
    assert_eq!(verdict.matches[0].per_field[0].samples, vec!["ДЕТСКИЕ песни"]);
}

#[test]
fn test_final_sigma_counts_and_samples_agree() {
    let doc = Document::new("ΟΔΟΣ ΠΑΙΧΝΙΔΙΩΝ", "μια οδος για παιδιά", ["Οδοσ"]);
    let verdict = classify(&doc, ["οδος"], 5, &ScanOptions::default());

    let record = &verdict.matches[0];
    assert_eq!(record.hits_total_in_document, 3);
    assert_eq!(record.per_field.len(), 3);
    for hits in &record.per_field {
        assert_eq!(hits.samples.len(), hits.count, "field {}", hits.field);
    }
    assert_eq!(record.per_field[1].samples, vec!["μια οδος για παιδιά"]);
}

#[test]
fn test_samples_map_back_through_expanding_fold() {
    let options = ScanOptions {
        max_samples_per_field: 3,
        sample_window: 2,
    };
    let doc = Document::new("İSTANBUL KIDS", "", no_videos());
    let verdict = classify(&doc, ["kids"], 5, &options);

    assert_eq!(verdict.total_hit_count, 1);
    assert_eq!(verdict.matches[0].per_field[0].samples, vec!["…L KIDS"]);
}

#[test]
fn test_blank_keys_are_ignored() {
    let doc = Document::new("anything at all", "", no_videos());
    let verdict = classify(&doc, ["", "   ", "\t"], 1, &ScanOptions::default());
    assert_eq!(verdict.distinct_hit_count, 0);
    assert!(verdict.ok);
}

#[test]
fn test_negative_and_fractional_thresholds() {
    let doc = Document::new("alpha", "", no_videos());
    let keys = ["alpha"];

    let verdict = classify(&doc, keys, -3.0, &ScanOptions::default());
    assert_eq!(verdict.threshold, 0);
    assert!(!verdict.ok);

    let verdict = classify(&doc, keys, 1.99, &ScanOptions::default());
    assert_eq!(verdict.threshold, 1);
    assert!(!verdict.ok);

    let verdict = classify(&doc, keys, 2.5, &ScanOptions::default());
    assert_eq!(verdict.threshold, 2);
    assert!(verdict.ok);
}

#[test]
fn test_null_document_yields_empty_fields() {
    let doc = Document::from_json(json!(null));
    let verdict = classify(&doc, ["kids"], 1, &ScanOptions::default());
    assert!(verdict.ok);
    assert_eq!(verdict.total_hit_count, 0);
    assert!(verdict.matches.is_empty());
}

// ============================================================================
// Word variant
// ============================================================================

#[test]
fn test_word_variant_requires_boundaries() {
    let doc = Document::new("Cartoon cars", "car-wash for CAR lovers", ["scar", "car"]);
    let verdict = classify_words(&doc, ["car"], 1, &ScanOptions::default());

    let fields: Vec<&str> = verdict.matches[0]
        .per_field
        .iter()
        .map(|h| h.field.as_str())
        .collect();
    assert_eq!(fields, vec!["channelInfo.description", "videos[1].title"]);
    assert_eq!(verdict.total_hit_count, 3);
}

// ============================================================================
// Character-set variant
// ============================================================================

#[test]
fn test_char_set_fails_on_single_dense_field() {
    let doc = Document::new("plain title", "абвг", ["clean", "also clean"]);
    let verdict = classify_chars(&doc, ["а", "б", "в", "г", "д"], 3, &ScanOptions::default());

    assert!(!verdict.ok);
    assert_eq!(
        verdict.failing_fields().collect::<Vec<_>>(),
        vec!["channelInfo.description"]
    );
    assert_eq!(verdict.fields.len(), 1);
    assert_eq!(verdict.fields[0].distinct, 4);
}

#[test]
fn test_char_set_limit_is_per_field_not_per_document() {
    // 4 distinct flagged chars in the document, never more than 2 per field
    let doc = Document::new("аб", "вг", ["аааааааааа"]);
    let verdict = classify_chars(&doc, ["а", "б", "в", "г"], 3, &ScanOptions::default());

    assert!(verdict.ok);
    assert_eq!(verdict.distinct_hit_count, 4);
    // reporting is not gated by the limit
    assert_eq!(verdict.fields.len(), 3);
    assert!(verdict.fields.iter().all(|f| !f.exceeded));
}

#[test]
fn test_char_set_at_limit_passes() {
    let doc = Document::new("абв", "", no_videos());
    let verdict = classify_chars(&doc, ["абвг"], 3, &ScanOptions::default());
    assert_eq!(verdict.fields[0].distinct, 3);
    assert!(verdict.ok);
}

#[test]
fn test_char_set_samples_show_context() {
    let options = ScanOptions {
        max_samples_per_field: 1,
        sample_window: 2,
    };
    let doc = Document::new("hello wörld wörld", "", no_videos());
    let verdict = classify_chars(&doc, ["ö"], 0, &options);

    assert_eq!(verdict.matches[0].per_field[0].samples, vec!["… wörl…"]);
}

// ============================================================================
// Determinism and reuse
// ============================================================================

fn busy_document() -> Document {
    Document::new(
        "Kids TV - Songs for Kids",
        "Nursery rhymes, kids songs and learning videos for toddlers.\nNew videos weekly!",
        (0..20).map(|i| format!("Kids song #{} - nursery rhymes for toddlers", i)),
    )
}

#[test]
fn test_repeated_calls_are_identical() {
    let keys = ["kids", "nursery rhymes", "toddlers", "learning", "songs"];
    let first: Verdict = classify(&busy_document(), keys, 3, &ScanOptions::default());
    for _ in 0..5 {
        let again = classify(&busy_document(), keys, 3, &ScanOptions::default());
        assert_eq!(again, first);
    }
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&classify(&busy_document(), keys, 3, &ScanOptions::default()))
            .unwrap()
    );
}

#[test]
fn test_prepared_classifier_is_shareable_across_threads() {
    let classifier = std::sync::Arc::new(Classifier::new(
        ["kids", "toddlers"],
        Strategy::phrase(),
        2,
        ScanOptions::default(),
    ));
    let expected = classifier.classify(&busy_document());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let classifier = std::sync::Arc::clone(&classifier);
            std::thread::spawn(move || classifier.classify(&busy_document()))
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

// ============================================================================
// Config-driven screen
// ============================================================================

#[test]
fn test_screen_from_toml_config() {
    let config = parse_toml_config(
        r#"
        [classifier]
        max_samples_per_field = 1
        sample_window = 10

        [[checks]]
        name = "kids_taxonomy_a"
        threshold = 2
        keys = ["nursery rhymes", "toddlers"]

        [[checks]]
        name = "kids_taxonomy_b"
        threshold = 3
        keys = ["cocomelon", "toddlers"]

        [[checks]]
        name = "cyrillic"
        variant = "char_set"
        threshold = 3
        keys = ["ж", "щ", "ы", "э"]
        "#,
    )
    .unwrap();

    let screen = Screen::from_config(&config.checks, &config.classifier);
    let report = screen.run(&busy_document());

    assert!(!report.ok);
    assert_eq!(report.rejected_by().collect::<Vec<_>>(), vec!["kids_taxonomy_a"]);

    let a = &report.checks[0].verdict;
    assert!(a.matches.iter().all(|m| m.per_field.iter().all(|h| h.samples.len() <= 1)));
}
