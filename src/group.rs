//! Year-month bucketing of the filtered document list.

use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Ordering;

use crate::models::content::Document;

/// Key of the bucket that collects documents without a usable date.
pub const UNKNOWN_KEY: &str = "unknown";

/// A validated document date: full `YYYY-MM-DD` or month-precision `YYYY-MM`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocDate {
    raw: String,
}

impl DocDate {
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        // chrono accepts single-digit fields, the keys below slice by position
        if !has_date_shape(raw) {
            return None;
        }
        let full = if raw.len() == 7 {
            format!("{}-01", raw)
        } else {
            raw.to_string()
        };
        NaiveDate::parse_from_str(&full, "%Y-%m-%d")
            .ok()
            .map(|_| DocDate { raw: raw.to_string() })
    }

    pub fn year_key(&self) -> String {
        self.raw[..4].to_string()
    }

    pub fn month_key(&self) -> String {
        self.raw[..7].to_string()
    }
}

fn has_date_shape(raw: &str) -> bool {
    let b = raw.as_bytes();
    let digits = |r: std::ops::Range<usize>| b[r].iter().all(|c| c.is_ascii_digit());
    match b.len() {
        7 => digits(0..4) && b[4] == b'-' && digits(5..7),
        10 => digits(0..4) && b[4] == b'-' && digits(5..7) && b[7] == b'-' && digits(8..10),
        _ => false,
    }
}

/// Bucket key for a document: `YYYY-MM`, or [`UNKNOWN_KEY`].
pub fn bucket_key(doc: &Document) -> String {
    DocDate::parse(doc.date_str())
        .map(|d| d.month_key())
        .unwrap_or_else(|| UNKNOWN_KEY.to_string())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bucket<T> {
    pub key: String,
    pub items: Vec<T>,
}

impl<T> Bucket<T> {
    pub fn is_unknown(&self) -> bool {
        self.key == UNKNOWN_KEY
    }
}

/// Compare bucket keys: real keys descending, the unknown bucket after all
/// of them no matter how it compares as a string.
fn cmp_keys(a: &str, b: &str) -> Ordering {
    match (a == UNKNOWN_KEY, b == UNKNOWN_KEY) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.cmp(a),
    }
}

/// Group documents (already filtered, paired with their content index) into
/// year-month buckets. Buckets run newest first with `unknown` last; inside
/// a bucket items run by date string descending, ties in input order.
pub fn group_documents<'a>(docs: Vec<(usize, &'a Document)>) -> Vec<Bucket<(usize, &'a Document)>> {
    let mut buckets: Vec<Bucket<(usize, &'a Document)>> = Vec::new();

    for entry in docs {
        let key = bucket_key(entry.1);
        match buckets.iter_mut().find(|b| b.key == key) {
            Some(bucket) => bucket.items.push(entry),
            None => buckets.push(Bucket {
                key,
                items: vec![entry],
            }),
        }
    }

    buckets.sort_by(|a, b| cmp_keys(&a.key, &b.key));
    for bucket in &mut buckets {
        // sort_by is stable, equal dates keep their authored order
        bucket
            .items
            .sort_by(|a, b| b.1.date_str().cmp(a.1.date_str()));
    }
    buckets
}
