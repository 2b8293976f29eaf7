//! Named checks run together against one document
//!
//! A screen is the configured set of taxonomies (phrase lists, word lists,
//! flagged alphabets). Fields are extracted once and shared by every check.

use crate::document::Document;
use crate::engine::{Classifier, ScanOptions, Strategy};
use crate::fields::extract_fields;
use crate::verdict::Verdict;
use chanlist_common::config::{CheckSpec, CheckVariant, ClassifierSettings};
use serde::Serialize;

/// Verdict of one named check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckOutcome {
    /// Check name
    pub name: String,
    /// Check verdict
    pub verdict: Verdict,
}

/// Combined result of a screen run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScreenReport {
    /// True when every check passed
    pub ok: bool,
    /// Outcomes in check order
    pub checks: Vec<CheckOutcome>,
}

impl ScreenReport {
    /// Names of checks that rejected the document
    pub fn rejected_by(&self) -> impl Iterator<Item = &str> {
        self.checks
            .iter()
            .filter(|outcome| !outcome.verdict.ok)
            .map(|outcome| outcome.name.as_str())
    }
}

/// Ordered list of named checks
#[derive(Debug, Clone, Default)]
pub struct Screen {
    checks: Vec<(String, Classifier)>,
}

impl Screen {
    /// Empty screen (every document passes)
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a check
    pub fn with_check(mut self, name: impl Into<String>, classifier: Classifier) -> Self {
        self.checks.push((name.into(), classifier));
        self
    }

    /// Build from `[[checks]]` config entries
    ///
    /// Entries without usable keys are kept; they pass unless their rule
    /// rejects an empty hit set (a per-document threshold of 0).
    pub fn from_config(specs: &[CheckSpec], settings: &ClassifierSettings) -> Self {
        let options = ScanOptions::from(settings);
        specs.iter().fold(Self::new(), |screen, spec| {
            let strategy = match spec.variant {
                CheckVariant::Phrase => Strategy::phrase(),
                CheckVariant::Word => Strategy::word(),
                CheckVariant::CharSet => Strategy::char_set(),
            };
            let classifier = Classifier::new(&spec.keys, strategy, spec.threshold, options.clone());
            screen.with_check(spec.name.clone(), classifier)
        })
    }

    /// Number of checks
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// True when no checks are configured
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Check names in order
    pub fn check_names(&self) -> impl Iterator<Item = &str> {
        self.checks.iter().map(|(name, _)| name.as_str())
    }

    /// Only the checks with the given name
    pub fn only(&self, name: &str) -> Option<Self> {
        let checks: Vec<_> = self
            .checks
            .iter()
            .filter(|(check, _)| check == name)
            .cloned()
            .collect();
        (!checks.is_empty()).then_some(Self { checks })
    }

    /// Run every check against the document
    pub fn run(&self, document: &Document) -> ScreenReport {
        let fields = extract_fields(document);
        let checks: Vec<CheckOutcome> = self
            .checks
            .iter()
            .map(|(name, classifier)| CheckOutcome {
                name: name.clone(),
                verdict: classifier.classify_fields(&fields),
            })
            .collect();

        ScreenReport {
            ok: checks.iter().all(|outcome| outcome.verdict.ok),
            checks,
        }
    }
}
