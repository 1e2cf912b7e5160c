//! Repository layer: entity-scoped database operations.
//!
//! Free functions over a borrowed `Connection`; callers own connection and
//! transaction lifetimes.

mod cohort;
mod medication;
mod patient;
mod records;
mod vital_sign;

use chrono::NaiveDateTime;
use uuid::Uuid;

use super::DatabaseError;

pub use cohort::*;
pub use medication::*;
pub use patient::*;
pub use records::*;
pub use vital_sign::*;

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub(crate) fn format_datetime(dt: &NaiveDateTime) -> String {
    dt.format(DATETIME_FORMAT).to_string()
}

pub(crate) fn parse_datetime(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, DATETIME_FORMAT).unwrap_or_default()
}

pub(crate) fn parse_uuid(s: &str) -> Result<Uuid, DatabaseError> {
    Uuid::parse_str(s).map_err(|e| {
        DatabaseError::Sqlite(rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(e),
        ))
    })
}
