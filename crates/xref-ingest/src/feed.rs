//! Parsing of raw roster and stats feed documents.
//!
//! The roster feed is accepted in three shapes:
//!
//! - an array of player records, each carrying an integer `id`
//! - an object keyed by player id (the shape snapshots are written in)
//! - a bootstrap document with an `elements` array
//!
//! Identifiers are checked before anything else is parsed so a malformed id
//! stops the run before matching begins.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use tracing::debug;

use xref_model::{Position, RosterId, RosterPlayer, StatsPlayer};

use crate::error::{IngestError, Result};

const ROSTER_FEED: &str = "roster";
const STATS_FEED: &str = "stats";

/// Fields consumed into typed roster columns; everything else is kept as a stat.
const ROSTER_FIELDS: [&str; 9] = [
    "id",
    "first_name",
    "second_name",
    "web_name",
    "minutes",
    "element_type",
    "team",
    "chance_of_playing_next_round",
    "news",
];

const STATS_NAME_FIELD: &str = "player_name";

/// Parse a roster feed document into players.
pub fn parse_roster_feed(document: &Value) -> Result<Vec<RosterPlayer>> {
    let players = match document {
        Value::Array(records) => parse_roster_array(records)?,
        Value::Object(object) => match object.get("elements") {
            Some(Value::Array(records)) => parse_roster_array(records)?,
            Some(_) => {
                return Err(IngestError::UnexpectedShape {
                    feed: ROSTER_FEED,
                    reason: "'elements' is not an array".to_string(),
                });
            }
            None => parse_roster_keyed(object)?,
        },
        other => {
            return Err(IngestError::UnexpectedShape {
                feed: ROSTER_FEED,
                reason: format!("expected an array or object, found {}", type_name(other)),
            });
        }
    };
    debug!(players = players.len(), "parsed roster feed");
    Ok(players)
}

/// Parse a stats feed document (an array of records) into players.
pub fn parse_stats_feed(document: &Value) -> Result<Vec<StatsPlayer>> {
    let Value::Array(records) = document else {
        return Err(IngestError::UnexpectedShape {
            feed: STATS_FEED,
            reason: format!("expected an array, found {}", type_name(document)),
        });
    };
    let mut players = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        let object = as_record(record, STATS_FEED, index)?;
        let label = format!("#{index}");
        let name = required_str(object, STATS_NAME_FIELD, STATS_FEED, &label)?;
        let stats = object
            .iter()
            .filter(|(key, _)| key.as_str() != STATS_NAME_FIELD)
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        players.push(StatsPlayer {
            free_text_name: name,
            stats,
        });
    }
    debug!(players = players.len(), "parsed stats feed");
    Ok(players)
}

/// Check that a JSON value is a roster identifier.
pub fn roster_id_from_value(value: &Value, context: &str) -> Result<RosterId> {
    value
        .as_u64()
        .and_then(|raw| u32::try_from(raw).ok())
        .map(RosterId::new)
        .ok_or_else(|| IngestError::InvalidIdentifier {
            value: value.to_string(),
            context: context.to_string(),
        })
}

fn roster_id_from_key(key: &str) -> Result<RosterId> {
    key.trim()
        .parse::<u32>()
        .map(RosterId::new)
        .map_err(|_| IngestError::InvalidIdentifier {
            value: format!("\"{key}\""),
            context: "roster object key".to_string(),
        })
}

fn parse_roster_array(records: &[Value]) -> Result<Vec<RosterPlayer>> {
    // Ids first: a bad id fails the whole feed before any other field is read.
    let mut ids = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        let object = as_record(record, ROSTER_FEED, index)?;
        let id = object.get("id").ok_or_else(|| IngestError::MissingField {
            feed: ROSTER_FEED,
            field: "id",
            record: format!("#{index}"),
        })?;
        ids.push(roster_id_from_value(id, &format!("roster record #{index}"))?);
    }
    records
        .iter()
        .zip(ids)
        .enumerate()
        .map(|(index, (record, id))| {
            let object = as_record(record, ROSTER_FEED, index)?;
            parse_roster_record(id, object)
        })
        .collect()
}

fn parse_roster_keyed(object: &Map<String, Value>) -> Result<Vec<RosterPlayer>> {
    let mut keyed = BTreeMap::new();
    for (key, record) in object {
        let id = roster_id_from_key(key)?;
        let Value::Object(fields) = record else {
            return Err(IngestError::UnexpectedShape {
                feed: ROSTER_FEED,
                reason: format!("record {key} is {}, expected an object", type_name(record)),
            });
        };
        if let Some(inner) = fields.get("id") {
            let inner_id = roster_id_from_value(inner, &format!("roster record {key}"))?;
            if inner_id != id {
                return Err(IngestError::InvalidIdentifier {
                    value: inner.to_string(),
                    context: format!("roster record keyed {key}"),
                });
            }
        }
        if keyed.insert(id, fields).is_some() {
            return Err(IngestError::InvalidIdentifier {
                value: format!("\"{key}\""),
                context: format!("roster object key (id {id} appears twice)"),
            });
        }
    }
    keyed
        .into_iter()
        .map(|(id, fields)| parse_roster_record(id, fields))
        .collect()
}

fn parse_roster_record(id: RosterId, object: &Map<String, Value>) -> Result<RosterPlayer> {
    let label = id.to_string();
    let first_name = required_str(object, "first_name", ROSTER_FEED, &label)?;
    let second_name = required_str(object, "second_name", ROSTER_FEED, &label)?;
    let web_name = required_str(object, "web_name", ROSTER_FEED, &label)?;
    let minutes = required_u32(object, "minutes", &label)?;
    let position = optional_i64(object, "element_type", &label)?
        .map_or(Position::Unknown(0), Position::from_element_type);
    let team = optional_i64(object, "team", &label)?;
    let chance_of_playing_next_round =
        match optional_i64(object, "chance_of_playing_next_round", &label)? {
            Some(raw) => Some(u8::try_from(raw).ok().filter(|pct| *pct <= 100).ok_or_else(
                || IngestError::InvalidField {
                    feed: ROSTER_FEED,
                    field: "chance_of_playing_next_round",
                    record: label.clone(),
                    reason: format!("{raw} is not a percentage"),
                },
            )?),
            None => None,
        };
    let news = match object.get("news") {
        Some(Value::String(text)) => text.clone(),
        _ => String::new(),
    };
    let stats = object
        .iter()
        .filter(|(key, _)| !ROSTER_FIELDS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    Ok(RosterPlayer {
        id,
        first_name,
        second_name,
        web_name,
        minutes,
        position,
        team,
        chance_of_playing_next_round,
        news,
        stats,
    })
}

fn as_record<'a>(
    record: &'a Value,
    feed: &'static str,
    index: usize,
) -> Result<&'a Map<String, Value>> {
    match record {
        Value::Object(object) => Ok(object),
        other => Err(IngestError::UnexpectedShape {
            feed,
            reason: format!("record #{index} is {}, expected an object", type_name(other)),
        }),
    }
}

fn required_str(
    object: &Map<String, Value>,
    field: &'static str,
    feed: &'static str,
    record: &str,
) -> Result<String> {
    match object.get(field) {
        Some(Value::String(text)) => Ok(text.clone()),
        Some(other) => Err(IngestError::InvalidField {
            feed,
            field,
            record: record.to_string(),
            reason: format!("expected a string, found {}", type_name(other)),
        }),
        None => Err(IngestError::MissingField {
            feed,
            field,
            record: record.to_string(),
        }),
    }
}

fn required_u32(object: &Map<String, Value>, field: &'static str, record: &str) -> Result<u32> {
    let value = object.get(field).ok_or_else(|| IngestError::MissingField {
        feed: ROSTER_FEED,
        field,
        record: record.to_string(),
    })?;
    value
        .as_u64()
        .and_then(|raw| u32::try_from(raw).ok())
        .ok_or_else(|| IngestError::InvalidField {
            feed: ROSTER_FEED,
            field,
            record: record.to_string(),
            reason: format!("expected a non-negative integer, found {value}"),
        })
}

fn optional_i64(
    object: &Map<String, Value>,
    field: &'static str,
    record: &str,
) -> Result<Option<i64>> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value.as_i64().map(Some).ok_or_else(|| IngestError::InvalidField {
            feed: ROSTER_FEED,
            field,
            record: record.to_string(),
            reason: format!("expected an integer, found {value}"),
        }),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
