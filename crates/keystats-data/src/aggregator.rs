//! Key-press aggregation into frequency tables.

use keystats_core::models::{ComboKey, FrequencyTable, KeyClass, LogRecord, RunTotals};

// ── KeyStats ──────────────────────────────────────────────────────────────────

/// All frequency tables and bucket totals for one run.
///
/// Built empty, filled through [`KeyStats::record`], then handed read-only
/// to the reporter.
#[derive(Debug, Clone, Default)]
pub struct KeyStats {
    /// Every key, regardless of bucket.
    pub all_keys: FrequencyTable<String>,
    /// Modifier keys pressed on their own.
    pub modifiers: FrequencyTable<String>,
    /// Non-modifier keys pressed with at least one modifier held.
    pub combinations: FrequencyTable<ComboKey>,
    /// Non-modifier keys pressed with no modifier held.
    pub plain_keys: FrequencyTable<String>,
    pub totals: RunTotals,
}

impl KeyStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count `record` into the all-keys table and exactly one bucket.
    ///
    /// Returns the bucket the record went to.
    pub fn record(&mut self, record: &LogRecord) -> KeyClass {
        let class = KeyClass::of(record);
        let count = record.count;

        self.all_keys.add(record.value.clone(), count);
        self.totals.add(class, count);

        match class {
            KeyClass::Modifier => self.modifiers.add(record.value.clone(), count),
            KeyClass::Combination => self.combinations.add(record.combo_key(), count),
            KeyClass::Plain => self.plain_keys.add(record.value.clone(), count),
        }

        class
    }

    /// Fold another run's counts into this one.
    pub fn merge(&mut self, other: KeyStats) {
        self.all_keys.merge(other.all_keys);
        self.modifiers.merge(other.modifiers);
        self.combinations.merge(other.combinations);
        self.plain_keys.merge(other.plain_keys);
        self.totals.merge(other.totals);
    }

    /// Sum of all three bucket totals.
    pub fn grand_total(&self) -> u64 {
        self.totals.grand_total()
    }

    pub fn is_empty(&self) -> bool {
        self.grand_total() == 0
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
