use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use super::chunk::{Chunk, Value};
use super::utils;

/// Transform applied to every value of one column.
///
/// In TOML: `ErrorCode = { kind = "strip_truncate", max_chars = 10 }` or
/// `DinCount = { kind = "numeric_or_zero" }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnRule {
    StripTruncate { max_chars: usize },
    NumericOrZero,
    IntegerOrZero,
    FillZeroIfMissing,
    Passthrough,
}

impl ColumnRule {
    pub fn apply(&self, value: &Value) -> Value {
        match *self {
            ColumnRule::StripTruncate { max_chars } => utils::strip_truncate(value, max_chars),
            ColumnRule::NumericOrZero => utils::numeric_or_zero(value),
            ColumnRule::IntegerOrZero => utils::integer_or_zero(value),
            ColumnRule::FillZeroIfMissing => utils::fill_zero_if_missing(value),
            ColumnRule::Passthrough => value.clone(),
        }
    }
}

/// Built-in rule tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleProfile {
    /// Audit input files: flag columns cut to one character, counters forced numeric.
    Audit,
    #[default]
    Passthrough,
}

impl RuleProfile {
    pub fn rules(self) -> BTreeMap<String, ColumnRule> {
        use ColumnRule::*;
        let table: &[(&str, ColumnRule)] = match self {
            RuleProfile::Audit => &[
                ("SrcSubjIdNb", StripTruncate { max_chars: 10 }),
                ("DinFoundFlag", StripTruncate { max_chars: 1 }),
                ("ProcessStg", StripTruncate { max_chars: 1 }),
                ("SequenceNb", FillZeroIfMissing),
                ("AinFromNas", NumericOrZero),
                ("AinChangeFlag", StripTruncate { max_chars: 1 }),
                ("ErrorCode", StripTruncate { max_chars: 10 }),
                ("FieldIndicator", StripTruncate { max_chars: 1 }),
                ("DinCount", NumericOrZero),
                ("DataProvider", IntegerOrZero),
                ("PinCount", NumericOrZero),
                ("NonStdLinCount", NumericOrZero),
                ("QtyFromNas", StripTruncate { max_chars: 1 }),
            ],
            RuleProfile::Passthrough => &[],
        };
        table
            .iter()
            .map(|(name, rule)| (name.to_string(), *rule))
            .collect()
    }
}

/// Column name → rule. Columns without an entry are left alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    rules: BTreeMap<String, ColumnRule>,
}

impl RuleSet {
    /// Profile table with `overrides` replacing same-named entries.
    pub fn new(profile: RuleProfile, overrides: &BTreeMap<String, ColumnRule>) -> Self {
        let mut rules = profile.rules();
        rules.extend(overrides.iter().map(|(k, v)| (k.clone(), *v)));
        Self { rules }
    }

    pub fn get(&self, column: &str) -> Option<&ColumnRule> {
        self.rules.get(column)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rewrite `chunk` in place. Same rows, same columns.
    pub fn normalize(&self, chunk: &mut Chunk) {
        let targets: Vec<(usize, &ColumnRule)> = chunk
            .columns
            .iter()
            .enumerate()
            .filter_map(|(idx, name)| self.rules.get(name).map(|rule| (idx, rule)))
            .filter(|(_, rule)| **rule != ColumnRule::Passthrough)
            .collect();
        if targets.is_empty() {
            return;
        }
        debug!(chunk = chunk.index, columns = targets.len(), "normalizing");

        for row in chunk.rows.iter_mut() {
            for &(idx, rule) in &targets {
                row[idx] = rule.apply(&row[idx]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(columns: &[&str], rows: &[&[Value]]) -> Chunk {
        let mut c = Chunk::new(0, 1, columns.iter().map(|s| s.to_string()).collect());
        c.rows = rows.iter().map(|r| r.to_vec()).collect();
        c
    }

    #[test]
    fn audit_profile_cleans_known_columns() {
        let rules = RuleSet::new(RuleProfile::Audit, &BTreeMap::new());
        let mut c = chunk(
            &["SrcSubjIdNb", "DinFoundFlag", "SequenceNb", "DinCount", "DataProvider", "ErrorCode", "Other"],
            &[
                &[
                    Value::text(" 123456789012 "),
                    Value::text("Yes"),
                    Value::Null,
                    Value::text("bad"),
                    Value::text(" 7.8 "),
                    Value::text("E-0001-LONG-CODE"),
                    Value::text("  untouched "),
                ],
                &[
                    Value::Null,
                    Value::text(" N"),
                    Value::text("12"),
                    Value::text("3"),
                    Value::Null,
                    Value::text("ok"),
                    Value::Null,
                ],
            ],
        );

        rules.normalize(&mut c);

        assert_eq!(
            c.rows[0],
            vec![
                Value::text("1234567890"),
                Value::text("Y"),
                Value::Int(0),
                Value::Int(0),
                Value::Int(7),
                Value::text("E-0001-LON"),
                Value::text("  untouched "),
            ]
        );
        assert_eq!(
            c.rows[1],
            vec![
                Value::Null,
                Value::text("N"),
                Value::text("12"),
                Value::Int(3),
                Value::Int(0),
                Value::text("ok"),
                Value::Null,
            ]
        );
    }

    #[test]
    fn absent_columns_are_skipped_and_shape_kept() {
        let rules = RuleSet::new(RuleProfile::Audit, &BTreeMap::new());
        let mut c = chunk(&["a", "b"], &[&[Value::text(" x "), Value::Null]]);
        let before = c.clone();
        rules.normalize(&mut c);
        assert_eq!(c, before);
    }

    #[test]
    fn normalizing_twice_changes_nothing() {
        let rules = RuleSet::new(RuleProfile::Audit, &BTreeMap::new());
        let mut c = chunk(
            &["ErrorCode", "PinCount", "QtyFromNas", "SequenceNb"],
            &[
                &[Value::text("  abc def ghi jkl "), Value::text("4.5"), Value::text(" 9 "), Value::Null],
                &[Value::Null, Value::Null, Value::Null, Value::text("x")],
            ],
        );
        rules.normalize(&mut c);
        let once = c.clone();
        rules.normalize(&mut c);
        assert_eq!(c, once);
    }

    #[test]
    fn overrides_replace_profile_entries() {
        let mut overrides = BTreeMap::new();
        overrides.insert("ErrorCode".to_string(), ColumnRule::StripTruncate { max_chars: 50 });
        overrides.insert("Extra".to_string(), ColumnRule::NumericOrZero);
        let rules = RuleSet::new(RuleProfile::Audit, &overrides);

        assert_eq!(
            rules.get("ErrorCode"),
            Some(&ColumnRule::StripTruncate { max_chars: 50 })
        );
        assert_eq!(rules.get("Extra"), Some(&ColumnRule::NumericOrZero));
        assert_eq!(rules.len(), RuleProfile::Audit.rules().len() + 1);
    }

    #[test]
    fn passthrough_profile_is_empty() {
        assert!(RuleSet::new(RuleProfile::Passthrough, &BTreeMap::new()).is_empty());
    }
}
