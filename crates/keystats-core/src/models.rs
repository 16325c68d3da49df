use std::collections::HashMap;
use std::hash::Hash;

// ── Modifier ──────────────────────────────────────────────────────────────────

/// One of the four tracked modifier keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Modifier {
    Shift,
    Alt,
    Ctrl,
    Meta,
}

impl Modifier {
    /// All modifiers, in the order their names are checked.
    pub const ALL: [Modifier; 4] = [Modifier::Shift, Modifier::Alt, Modifier::Ctrl, Modifier::Meta];

    /// Key name as written by the key logger.
    pub fn as_str(&self) -> &'static str {
        match self {
            Modifier::Shift => "Shift",
            Modifier::Alt => "Alt",
            Modifier::Ctrl => "Ctrl",
            Modifier::Meta => "Meta",
        }
    }

    /// Match a logged key name against the modifier names.
    ///
    /// The comparison is exact and case-sensitive: `"shift"` is a plain key.
    pub fn from_key_name(name: &str) -> Option<Modifier> {
        Self::ALL.into_iter().find(|m| m.as_str() == name)
    }
}

// ── LogRecord ─────────────────────────────────────────────────────────────────

/// One parsed line of a key log file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// Number of identical key events collapsed into this line.
    pub count: u64,
    /// Key name, e.g. `"a"`, `"Shift"`, `"F5"`.
    pub value: String,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

impl LogRecord {
    /// `true` when any of the four modifier flags was held.
    pub fn has_modifier_flag(&self) -> bool {
        self.ctrl || self.shift || self.alt || self.meta
    }

    /// The modifier this record's key *is*, if any.
    pub fn modifier(&self) -> Option<Modifier> {
        Modifier::from_key_name(&self.value)
    }

    /// Key of this record in the combinations table.
    pub fn combo_key(&self) -> ComboKey {
        ComboKey {
            value: self.value.clone(),
            ctrl: self.ctrl,
            shift: self.shift,
            alt: self.alt,
            meta: self.meta,
        }
    }
}

// ── ComboKey ──────────────────────────────────────────────────────────────────

/// A key together with the modifier flags it was pressed with.
///
/// Field order doubles as the ranking tie-break order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComboKey {
    pub value: String,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

impl ComboKey {
    /// Human-readable form, e.g. `"shift + ctrl + a"`.
    ///
    /// Prefixes are prepended in the order ctrl, shift, alt, meta, so ctrl
    /// ends up closest to the key and meta furthest from it.
    pub fn label(&self) -> String {
        let mut label = self.value.clone();
        for (held, prefix) in [
            (self.ctrl, "ctrl + "),
            (self.shift, "shift + "),
            (self.alt, "alt + "),
            (self.meta, "meta + "),
        ] {
            if held {
                label.insert_str(0, prefix);
            }
        }
        label
    }
}

// ── KeyClass ──────────────────────────────────────────────────────────────────

/// The bucket a record is counted in. Every record lands in exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyClass {
    Modifier,
    Combination,
    Plain,
}

impl KeyClass {
    /// Classify a record. A modifier key wins over its own flags.
    pub fn of(record: &LogRecord) -> KeyClass {
        if record.modifier().is_some() {
            KeyClass::Modifier
        } else if record.has_modifier_flag() {
            KeyClass::Combination
        } else {
            KeyClass::Plain
        }
    }
}

// ── FrequencyTable ────────────────────────────────────────────────────────────

/// Accumulated counts per key. Missing keys count as zero.
#[derive(Debug, Clone)]
pub struct FrequencyTable<K> {
    counts: HashMap<K, u64>,
}

impl<K> Default for FrequencyTable<K> {
    fn default() -> Self {
        Self {
            counts: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash> FrequencyTable<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` to `key`, inserting it at zero first if absent.
    ///
    /// Counts saturate at `u64::MAX`.
    pub fn add(&mut self, key: K, count: u64) {
        let slot = self.counts.entry(key).or_insert(0);
        *slot = slot.saturating_add(count);
    }

    /// Current count for `key`, or `0`.
    pub fn get<Q>(&self, key: &Q) -> u64
    where
        K: std::borrow::Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Sum of every count in the table.
    pub fn total(&self) -> u64 {
        self.counts.values().fold(0, |acc, v| acc.saturating_add(*v))
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, u64)> {
        self.counts.iter().map(|(k, v)| (k, *v))
    }

    /// Fold every entry of `other` into `self`.
    pub fn merge(&mut self, other: FrequencyTable<K>) {
        for (key, count) in other.counts {
            self.add(key, count);
        }
    }
}

impl<K: Eq + Hash + Ord> FrequencyTable<K> {
    /// Entries sorted by count descending, ties broken by key ascending.
    pub fn ranked(&self) -> Vec<(&K, u64)> {
        let mut entries: Vec<(&K, u64)> = self.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }
}

// ── RunTotals ─────────────────────────────────────────────────────────────────

/// Per-bucket event totals for one run. Every counter saturates at `u64::MAX`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunTotals {
    pub modifiers: u64,
    pub combinations: u64,
    pub plain: u64,
}

impl RunTotals {
    pub fn grand_total(&self) -> u64 {
        self.modifiers
            .saturating_add(self.combinations)
            .saturating_add(self.plain)
    }

    /// Add `count` to the counter for `class`.
    pub fn add(&mut self, class: KeyClass, count: u64) {
        match class {
            KeyClass::Modifier => self.modifiers = self.modifiers.saturating_add(count),
            KeyClass::Combination => self.combinations = self.combinations.saturating_add(count),
            KeyClass::Plain => self.plain = self.plain.saturating_add(count),
        }
    }

    /// Fold another run's totals into these.
    pub fn merge(&mut self, other: RunTotals) {
        self.add(KeyClass::Modifier, other.modifiers);
        self.add(KeyClass::Combination, other.combinations);
        self.add(KeyClass::Plain, other.plain);
    }

    /// Subtotal of one bucket.
    pub fn of(&self, class: KeyClass) -> u64 {
        match class {
            KeyClass::Modifier => self.modifiers,
            KeyClass::Combination => self.combinations,
            KeyClass::Plain => self.plain,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
