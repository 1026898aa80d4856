//! Embedded metadata from the PDF Info dictionary.

use std::ops::Range;
use std::path::Path;

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use lopdf::{Dictionary, Document as LopdfDocument, Object};

use crate::error::Result;

use super::SourceMetadata;

/// Read the Info dictionary of a PDF file.
///
/// A file without an Info dictionary yields an all-absent record.
pub fn read_native(path: &Path) -> Result<SourceMetadata> {
    let doc = LopdfDocument::load(path)?;
    Ok(from_document(&doc))
}

fn from_document(doc: &LopdfDocument) -> SourceMetadata {
    let info = match doc.trailer.get(b"Info") {
        Ok(info) => info,
        Err(_) => return SourceMetadata::default(),
    };

    let dict = match info {
        Object::Reference(id) => doc.get_dictionary(*id).ok(),
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    };

    dict.map(from_info_dict).unwrap_or_default()
}

/// Extract metadata fields from an Info dictionary.
pub fn from_info_dict(dict: &Dictionary) -> SourceMetadata {
    let creation_date = get_string_from_dict(dict, b"CreationDate")
        .map(|raw| parse_pdf_date(&raw).map(|d| d.to_rfc3339()).unwrap_or(raw));

    SourceMetadata {
        title: get_string_from_dict(dict, b"Title"),
        author: get_string_from_dict(dict, b"Author"),
        subject: get_string_from_dict(dict, b"Subject"),
        creator: get_string_from_dict(dict, b"Creator"),
        producer: get_string_from_dict(dict, b"Producer"),
        creation_date,
        modification_date: get_string_from_dict(dict, b"ModDate")
            .and_then(|raw| parse_pdf_date(&raw)),
    }
}

/// Helper to get a string from a PDF dictionary.
fn get_string_from_dict(dict: &Dictionary, key: &[u8]) -> Option<String> {
    dict.get(key).ok().and_then(|obj| match obj {
        Object::String(bytes, _) => Some(decode_pdf_string(bytes)),
        Object::Name(bytes) => String::from_utf8(bytes.clone()).ok(),
        _ => None,
    })
}

/// Decode a PDF text string: UTF-16BE with BOM, else UTF-8, else Latin-1.
fn decode_pdf_string(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// Parse an Info dictionary date, `D:YYYYMMDDHHmmSSOHH'mm'`, into UTC.
///
/// Everything after the year is optional and scanners often drop the `D:`
/// prefix. A `Z`, `+HH'mm'` or `-HH'mm'` suffix is applied; a date without
/// one is taken as UTC.
fn parse_pdf_date(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    let s = s.strip_prefix("D:").unwrap_or(s);
    let split = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let (stamp, zone) = s.split_at(split);
    if stamp.len() < 4 {
        return None;
    }

    let field = |range: Range<usize>, default: u32| match stamp.get(range) {
        Some(v) => v.parse().ok(),
        None => Some(default),
    };
    let year: i32 = stamp[..4].parse().ok()?;
    let naive = NaiveDate::from_ymd_opt(year, field(4..6, 1)?, field(6..8, 1)?)?.and_hms_opt(
        field(8..10, 0)?,
        field(10..12, 0)?,
        field(12..14, 0)?,
    )?;

    parse_utc_offset(zone)?
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Offset suffix of an Info dictionary date; empty means UTC.
fn parse_utc_offset(zone: &str) -> Option<FixedOffset> {
    let sign = match zone.chars().next() {
        None | Some('Z') => return FixedOffset::east_opt(0),
        Some('+') => 1,
        Some('-') => -1,
        Some(_) => return None,
    };
    let rest = zone[1..].trim_end_matches('\'');
    let (hours, minutes) = rest.split_once('\'').unwrap_or((rest, ""));
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = if minutes.is_empty() { 0 } else { minutes.parse().ok()? };
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
