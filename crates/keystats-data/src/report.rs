//! Ranked text report over a [`KeyStats`].

use std::fmt;

use keystats_core::formatting::share;
use keystats_core::models::KeyClass;
use keystats_core::settings::{Settings, DEFAULT_TOP};

use crate::aggregator::KeyStats;

const RULE: &str = "______________________";

// ── ReportOptions ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    /// Entries listed per ranked section. Modifiers are never truncated.
    pub top: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            top: DEFAULT_TOP as usize,
        }
    }
}

impl From<&Settings> for ReportOptions {
    fn from(s: &Settings) -> Self {
        Self {
            top: s.top as usize,
        }
    }
}

// ── Report ────────────────────────────────────────────────────────────────────

/// Borrowing view that renders the report through [`fmt::Display`].
pub struct Report<'a> {
    stats: &'a KeyStats,
    options: ReportOptions,
}

impl<'a> Report<'a> {
    pub fn new(stats: &'a KeyStats, options: ReportOptions) -> Self {
        Self { stats, options }
    }
}

/// Render the full report as a string.
pub fn render_report(stats: &KeyStats, options: &ReportOptions) -> String {
    Report::new(stats, *options).to_string()
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.stats;
        let totals = &stats.totals;
        let total = totals.grand_total();
        let top = self.options.top;
        let modifier_total = totals.of(KeyClass::Modifier);
        let combination_total = totals.of(KeyClass::Combination);
        let plain_total = totals.of(KeyClass::Plain);

        writeln!(f, "TOTAL KEYS PRESSED: {}", total)?;
        writeln!(f, "{}", RULE)?;

        if total == 0 {
            writeln!(f)?;
            return writeln!(f, "No key presses recorded.");
        }

        section_header(f, "MODIFIERS", Some(share(modifier_total, total)))?;
        let modifiers = stats.modifiers.ranked();
        write_ranked(
            f,
            modifiers.iter().map(|(k, v)| (k.as_str().to_owned(), *v)),
            modifier_total,
            usize::MAX,
        )?;

        section_header(f, "COMBINATIONS", Some(share(combination_total, total)))?;
        let combinations = stats.combinations.ranked();
        write_ranked(
            f,
            combinations.iter().map(|(k, v)| (k.label(), *v)),
            combination_total,
            top,
        )?;

        section_header(f, "NO_MODIFIER REGULAR KEYS", Some(share(plain_total, total)))?;
        let plain = stats.plain_keys.ranked();
        write_ranked(
            f,
            plain.iter().map(|(k, v)| (k.as_str().to_owned(), *v)),
            plain_total,
            top,
        )?;

        section_header(f, "ALL KEYS", None)?;
        let all = stats.all_keys.ranked();
        write_ranked(
            f,
            all.iter().map(|(k, v)| (k.as_str().to_owned(), *v)),
            total,
            top,
        )
    }
}

fn section_header(f: &mut fmt::Formatter<'_>, title: &str, pct: Option<String>) -> fmt::Result {
    writeln!(f)?;
    match pct {
        Some(pct) => writeln!(f, "{}: {}%", title, pct)?,
        None => writeln!(f, "{}", title)?,
    }
    writeln!(f)
}

/// Write `1. <label> (<pct>%)` lines, at most `limit` of them.
fn write_ranked(
    f: &mut fmt::Formatter<'_>,
    entries: impl Iterator<Item = (String, u64)>,
    subtotal: u64,
    limit: usize,
) -> fmt::Result {
    for (rank, (label, count)) in entries.take(limit).enumerate() {
        writeln!(f, "{}. {} ({}%)", rank + 1, label, share(count, subtotal))?;
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
