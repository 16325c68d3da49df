//! Line parser for key log files.
//!
//! Each line is `<count> <value> <ctrl> <shift> <alt> <meta>`, separated by
//! any amount of whitespace.

use keystats_core::error::ParseError;
use keystats_core::models::LogRecord;

const FIELDS: [&str; 6] = ["count", "value", "ctrl", "shift", "alt", "meta"];

/// Parse one log line into a [`LogRecord`].
///
/// Tokens past the sixth are ignored.
pub fn parse_line(line: &str) -> Result<LogRecord, ParseError> {
    let tokens: Vec<&str> = line.split_whitespace().take(FIELDS.len()).collect();
    if tokens.len() < FIELDS.len() {
        return Err(ParseError::MissingField {
            field: FIELDS[tokens.len()],
            found: tokens.len(),
        });
    }

    let count = tokens[0]
        .parse::<u64>()
        .map_err(|source| ParseError::InvalidCount {
            token: tokens[0].to_string(),
            source,
        })?;

    Ok(LogRecord {
        count,
        value: tokens[1].to_string(),
        ctrl: parse_flag(tokens[2]),
        shift: parse_flag(tokens[3]),
        alt: parse_flag(tokens[4]),
        meta: parse_flag(tokens[5]),
    })
}

/// Only the exact token `false` is false; anything else counts as held.
fn parse_flag(token: &str) -> bool {
    token != "false"
}

// ── Tests ─────────────────────────────────────────────────────────────────────
