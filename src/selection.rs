//! Selection Ledger
//!
//! Tracks the option chosen at each wizard stage, supports rewinding
//! (changing an earlier answer invalidates everything downstream), and
//! produces the normalized selection history used both for product
//! filtering and for cart line items.
//!
//! Custom values are a first-class variant of [`SelectionValue`], not a
//! string prefix. Anywhere a selection is displayed or exported the label
//! is already the plain human-readable text.

use crate::catalog::FilterSet;
use crate::stage::{self, StageKind};
use chrono::{DateTime, Utc};

/// The answer recorded at a stage: one of the stage's listed options, or
/// a free-form custom value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionValue {
    Standard { option_id: String },
    Custom { raw_text: String },
}

impl SelectionValue {
    pub fn standard(option_id: impl Into<String>) -> Self {
        Self::Standard {
            option_id: option_id.into(),
        }
    }

    pub fn custom(raw_text: impl Into<String>) -> Self {
        Self::Custom {
            raw_text: raw_text.into(),
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom { .. })
    }

    /// The value used for catalog filtering: the option id for standard
    /// answers, the raw text for custom ones (which will simply match no
    /// catalog product).
    pub fn filter_value(&self) -> &str {
        match self {
            Self::Standard { option_id } => option_id,
            Self::Custom { raw_text } => raw_text,
        }
    }
}

/// One recorded answer, as kept in the ledger and copied into cart items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub stage_index: usize,
    /// Display title of the stage the answer belongs to
    pub stage_title: &'static str,
    pub value: SelectionValue,
    /// Human-readable label; custom values appear verbatim, untagged
    pub display_label: String,
    pub recorded_at: DateTime<Utc>,
}

/// Per-stage answer store with rewind semantics.
///
/// Invariants:
/// - answers are strictly sequential: an answer at stage `k` implies
///   answers at every stage below `k`
/// - `last_stage_reached` is monotonically non-decreasing except on
///   explicit reset
#[derive(Debug, Clone, Default)]
pub struct SelectionLedger {
    /// Ordered answers; position equals stage index
    history: Vec<Selection>,
    last_stage_reached: usize,
}

impl SelectionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the answer for a stage.
    ///
    /// If the stage was already answered and the user has since moved on,
    /// every answer at a higher stage is discarded first: a rewound answer
    /// invalidates everything downstream.
    ///
    /// An out-of-range or non-sequential `stage_index` is a programming
    /// error, not a runtime failure.
    pub fn record_selection(&mut self, stage_index: usize, value: SelectionValue) {
        let def = stage::stage(stage_index)
            .filter(|d| d.kind != StageKind::ComputedListing)
            .expect("record_selection: stage index out of range");
        debug_assert!(
            stage_index <= self.history.len(),
            "record_selection: stage {} would leave a gap (answered through {})",
            stage_index,
            self.history.len()
        );

        let display_label = match &value {
            SelectionValue::Standard { option_id } => def
                .option_name(option_id)
                .map(str::to_owned)
                .unwrap_or_else(|| option_id.clone()),
            SelectionValue::Custom { raw_text } => raw_text.clone(),
        };

        // Rewinding: drop every answer downstream of the stage being
        // re-answered before recording the new value.
        if stage_index < self.last_stage_reached {
            self.history.truncate(stage_index + 1);
        }

        let selection = Selection {
            stage_index,
            stage_title: def.title,
            value,
            display_label,
            recorded_at: Utc::now(),
        };

        if stage_index < self.history.len() {
            self.history[stage_index] = selection;
        } else {
            self.history.push(selection);
        }

        self.last_stage_reached = self.last_stage_reached.max(stage_index);
        tracing::debug!(
            stage = stage_index,
            answered = self.history.len(),
            "selection recorded"
        );
    }

    /// Clear all answers. Idempotent.
    pub fn reset(&mut self) {
        self.history.clear();
        self.last_stage_reached = 0;
    }

    /// Highest stage index answered since the last reset.
    pub fn last_stage_reached(&self) -> usize {
        self.last_stage_reached
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// The current answer at a stage, if any.
    pub fn get(&self, stage_index: usize) -> Option<&Selection> {
        self.history.get(stage_index)
    }

    /// True if any recorded answer is a custom value.
    pub fn has_custom_selection(&self) -> bool {
        self.history.iter().any(|s| s.value.is_custom())
    }

    /// Project the current answers into the filter set consumed by the
    /// catalog collaborator. Unanswered stages are omitted.
    pub fn to_filter_set(&self) -> FilterSet {
        let mut filters = FilterSet::default();
        for sel in &self.history {
            if let Some(field) = stage::stage(sel.stage_index).and_then(|d| d.field) {
                filters.set(field, sel.value.filter_value().to_owned());
            }
        }
        filters
    }

    /// An immutable ordered copy of the answer history, suitable for
    /// attaching to a cart item or an order payload.
    pub fn history_snapshot(&self) -> Vec<Selection> {
        self.history.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::StageId;

    fn answer(ledger: &mut SelectionLedger, through: usize) {
        let ids = ["y-strainer", "stainless-steel", "flanged", "2", "150"];
        for (i, id) in ids.iter().enumerate().take(through + 1) {
            ledger.record_selection(i, SelectionValue::standard(*id));
        }
    }

    #[test]
    fn test_record_resolves_display_label() {
        let mut ledger = SelectionLedger::new();
        ledger.record_selection(0, SelectionValue::standard("y-strainer"));
        assert_eq!(ledger.get(0).unwrap().display_label, "Y Strainer");
        assert_eq!(ledger.last_stage_reached(), 0);
    }

    #[test]
    fn test_custom_value_is_stored_verbatim() {
        let mut ledger = SelectionLedger::new();
        answer(&mut ledger, 0);
        ledger.record_selection(1, SelectionValue::custom("Hastelloy C-276"));
        let sel = ledger.get(1).unwrap();
        assert!(sel.value.is_custom());
        assert_eq!(sel.display_label, "Hastelloy C-276");
    }

    #[test]
    fn test_rewind_truncates_downstream() {
        let mut ledger = SelectionLedger::new();
        answer(&mut ledger, 4);
        assert_eq!(ledger.len(), 5);
        assert_eq!(ledger.last_stage_reached(), 4);

        ledger.record_selection(1, SelectionValue::standard("cast-iron"));
        assert_eq!(ledger.len(), 2);
        assert!(ledger.get(2).is_none());
        assert_eq!(ledger.get(1).unwrap().display_label, "Cast Iron");
        // Monotone: rewinding does not lower the watermark
        assert_eq!(ledger.last_stage_reached(), 4);
    }

    #[test]
    fn test_filter_set_omits_unset_stages() {
        let mut ledger = SelectionLedger::new();
        answer(&mut ledger, 1);
        let filters = ledger.to_filter_set();
        assert_eq!(filters.get(StageId::Type), Some("y-strainer"));
        assert_eq!(filters.get(StageId::Material), Some("stainless-steel"));
        assert_eq!(filters.get(StageId::Connection), None);
        assert_eq!(filters.get(StageId::Pressure), None);
    }

    #[test]
    fn test_custom_filter_value_is_raw_text() {
        let mut ledger = SelectionLedger::new();
        ledger.record_selection(0, SelectionValue::custom("tee strainer"));
        assert_eq!(ledger.to_filter_set().get(StageId::Type), Some("tee strainer"));
    }

    #[test]
    fn test_snapshot_labels_carry_no_tagging() {
        let mut ledger = SelectionLedger::new();
        answer(&mut ledger, 0);
        ledger.record_selection(1, SelectionValue::custom("Monel 400"));
        for sel in ledger.history_snapshot() {
            assert!(!sel.display_label.contains("custom:"));
        }
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut ledger = SelectionLedger::new();
        answer(&mut ledger, 3);
        ledger.reset();
        assert!(ledger.is_empty());
        assert_eq!(ledger.last_stage_reached(), 0);
        ledger.reset();
        assert!(ledger.is_empty());
    }

    #[test]
    #[should_panic]
    fn test_listing_stage_rejected() {
        let mut ledger = SelectionLedger::new();
        ledger.record_selection(crate::stage::listing_index(), SelectionValue::standard("x"));
    }
}
