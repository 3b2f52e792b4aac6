use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Account as returned by `verify_credentials` and embedded in statuses
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Account {
    #[serde(default, with = "string_id")]
    pub id: u64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub acct: String,
}

/// A status (post) as listed by the account and favourites timelines
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Status {
    #[serde(with = "string_id")]
    pub id: u64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub account: Account,
}

/// Outcome of a deletion call that reached the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Unconfirmed { body: String },
}

impl Confirmation {
    /// Interpret a deletion response body for status `id`.
    ///
    /// Servers answer either with an empty object or with the deleted status;
    /// both count as confirmation as long as an echoed id matches.
    pub fn from_body(body: &[u8], id: u64) -> Result<Self, serde_json::Error> {
        let object: Map<String, Value> = serde_json::from_slice(body)?;

        let confirmed = object.is_empty() || object.get("id").and_then(id_from_value) == Some(id);
        if confirmed {
            Ok(Confirmation::Confirmed)
        } else {
            Ok(Confirmation::Unconfirmed {
                body: String::from_utf8_lossy(body).into_owned(),
            })
        }
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self, Confirmation::Confirmed)
    }
}

fn id_from_value(value: &Value) -> Option<u64> {
    match value {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.as_u64(),
        _ => None,
    }
}

/// Mastodon encodes 64-bit ids as JSON strings; accept bare numbers too.
mod string_id {
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S: Serializer>(id: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(id)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        struct IdVisitor;

        impl<'de> Visitor<'de> for IdVisitor {
            type Value = u64;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an id as a decimal string or unsigned integer")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(v)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                v.parse().map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}
