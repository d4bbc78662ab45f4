//! Text format of a hardware record file.
//!
//! A record is newline-separated text: an optional `@ <ownerId>` line
//! followed by zero or more `<fieldName> <numericValue>` lines. Field order
//! is not significant and duplicate names last-win. Sensor values are
//! floating point; actuator values are integers.
//!
//! Parsing is deliberately lenient: the counterpart process may rewrite a
//! file mid-read, so malformed tokens are skipped rather than failing the
//! whole read. Ownership must be validated by the caller *after* parsing.

use std::collections::BTreeMap;

use shipbot_types::owner;

/// A parsed record file: the owner tag plus the raw field map.
///
/// A file with no `@` marker reports [`owner::BOOTSTRAP`], which readers
/// treat the same as "the counterpart has not written yet".
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub owner: i64,
    pub fields: BTreeMap<String, f64>,
}

impl RawRecord {
    /// Field map with every value truncated to an integer, for actuator
    /// records.
    pub fn integer_fields(&self) -> BTreeMap<String, i64> {
        self.fields
            .iter()
            .map(|(name, value)| (name.clone(), *value as i64))
            .collect()
    }
}

/// Tokenize record text into a [`RawRecord`].
///
/// Numbers bind to the most recently seen word token. The `@` marker
/// introduces the next number as the owner id (both `@ 2` and the attached
/// `@2` form are accepted); a later marker overrides an earlier one.
/// Anything unparseable is ignored.
pub fn parse(input: &str) -> RawRecord {
    let mut fields = BTreeMap::new();
    let mut owner = owner::BOOTSTRAP;
    let mut current_field: Option<String> = None;
    let mut owner_pending = false;

    for token in input.split_whitespace() {
        if let Some(rest) = token.strip_prefix('@') {
            if rest.is_empty() {
                owner_pending = true;
            } else if let Ok(value) = rest.parse::<f64>() {
                owner = value as i64;
            }
            continue;
        }
        if let Ok(value) = token.parse::<f64>() {
            if owner_pending {
                owner = value as i64;
                owner_pending = false;
            } else if let Some(field) = &current_field {
                fields.insert(field.clone(), value);
            }
            continue;
        }
        if token.chars().next().is_some_and(|c| c.is_ascii_alphabetic()) {
            current_field = Some(token.to_string());
        }
    }

    RawRecord { owner, fields }
}

/// Render an actuator record: owner marker first, then one line per field.
pub fn render_actuator(owner: i64, fields: &BTreeMap<String, i64>) -> String {
    let mut out = format!("@ {owner}\n");
    for (name, value) in fields {
        out.push_str(name);
        out.push(' ');
        out.push_str(&value.to_string());
        out.push('\n');
    }
    out
}

/// Render a sensor record with floating-point values. Used when
/// bootstrapping sensor files and by test fixtures.
pub fn render_sensor(owner: i64, fields: &BTreeMap<String, f64>) -> String {
    let mut out = format!("@ {owner}\n");
    for (name, value) in fields {
        out.push_str(name);
        out.push(' ');
        out.push_str(&value.to_string());
        out.push('\n');
    }
    out
}
