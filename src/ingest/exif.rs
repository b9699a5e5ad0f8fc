//! Capture-date extraction for site photos.
//!
//! Phone cameras stamp `DateTimeOriginal`; crews rarely upload the same day
//! they shoot, so the photo grid sorts by the EXIF date rather than the
//! upload time. Best effort only: anything unreadable is `None`.

use std::io::Cursor;

use chrono::{NaiveDate, NaiveDateTime};
use exif::{In, Tag, Value};

/// Read the capture timestamp from an image's EXIF block, if present.
pub fn read_taken_at(bytes: &[u8]) -> Option<NaiveDateTime> {
    let exif = exif::Reader::new()
        .read_from_container(&mut Cursor::new(bytes))
        .ok()?;

    let field = exif
        .get_field(Tag::DateTimeOriginal, In::PRIMARY)
        .or_else(|| exif.get_field(Tag::DateTime, In::PRIMARY))?;

    let ascii = match &field.value {
        Value::Ascii(values) => values.first()?,
        _ => return None,
    };

    let dt = exif::DateTime::from_ascii(ascii).ok()?;
    NaiveDate::from_ymd_opt(dt.year.into(), dt.month.into(), dt.day.into())?
        .and_hms_opt(dt.hour.into(), dt.minute.into(), dt.second.into())
}
