//! Flattening of merged players into export records.

use std::collections::BTreeMap;

use serde_json::{Number, Value};
use xref_model::MergeOptions;

use crate::merge::MergedPlayer;

/// One output row: column name to value.
pub type FlatRecord = BTreeMap<String, Value>;

/// Columns that always hold text and are never coerced to numbers.
const TEXT_FIELDS: &[&str] = &[
    "player_name",
    "web_name",
    "position",
    "news",
    "status",
    "team_title",
];

/// Availability columns that pruning consumes; they are not exported.
const AVAILABILITY_FIELDS: &[&str] = &[
    "chance_of_playing_next_round",
    "chance_of_playing_this_round",
    "news",
    "news_added",
    "status",
    "corners_and_indirect_freekicks_order",
    "direct_freekicks_order",
    "penalties_order",
];

impl MergedPlayer {
    /// Flatten into one record: roster fields first, then stats fields.
    ///
    /// A stats field whose name is already taken by a roster field gets
    /// `collision_suffix` appended. Numeric strings become numbers.
    pub fn to_flat_record(&self, options: &MergeOptions) -> FlatRecord {
        let roster = &self.roster;
        let mut record = FlatRecord::new();

        for (name, value) in &roster.stats {
            if !AVAILABILITY_FIELDS.contains(&name.as_str()) {
                record.insert(name.clone(), value.clone());
            }
        }
        record.insert("id".to_string(), Value::from(roster.id.get()));
        record.insert("player_name".to_string(), Value::from(roster.full_name()));
        record.insert("web_name".to_string(), Value::from(roster.short_name()));
        record.insert(
            "position".to_string(),
            Value::from(roster.position.label()),
        );
        record.insert(
            "team".to_string(),
            roster.team.map_or(Value::Null, Value::from),
        );
        record.insert("minutes".to_string(), Value::from(roster.minutes));

        for (name, value) in &self.stats.stats {
            let key = if record.contains_key(name) {
                format!("{name}{}", options.collision_suffix)
            } else {
                name.clone()
            };
            record.insert(key, value.clone());
        }

        coerce_numeric(&mut record);
        record
    }
}

/// Convert numeric strings to JSON numbers, leaving text columns alone.
pub fn coerce_numeric(record: &mut FlatRecord) {
    for (name, value) in record.iter_mut() {
        if TEXT_FIELDS.contains(&name.as_str()) {
            continue;
        }
        if let Value::String(text) = value
            && let Some(number) = parse_number(text)
        {
            *value = Value::Number(number);
        }
    }
}

fn parse_number(text: &str) -> Option<Number> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(int) = text.parse::<i64>() {
        return Some(Number::from(int));
    }
    text.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .and_then(Number::from_f64)
}
