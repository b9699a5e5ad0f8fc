pub mod company;
pub mod job;
pub mod marker;
pub mod member;
pub mod photo;
pub mod print;
pub mod ticket;

pub use company::*;
pub use job::*;
pub use marker::*;
pub use member::*;
pub use photo::*;
pub use print::*;
pub use ticket::*;

use chrono::NaiveDateTime;
use uuid::Uuid;

use super::DatabaseError;

/// Storage format for datetime columns.
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub(crate) fn fmt_datetime(dt: &NaiveDateTime) -> String {
    dt.format(DATETIME_FORMAT).to_string()
}

pub(crate) fn parse_datetime(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f"))
        .unwrap_or_default()
}

pub(crate) fn parse_uuid(s: &str) -> Result<Uuid, DatabaseError> {
    Uuid::parse_str(s).map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))
}
