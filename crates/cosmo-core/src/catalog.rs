//! Alphabetical service catalog.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::services::{ServiceSummary, UNTITLED};

/// Bucket for titles that do not start with a Latin or Cyrillic letter.
pub const OTHER_BUCKET: &str = "#";

/// Russian alphabet in collation order (`Ё` between `Е` and `Ж`).
const CYRILLIC_ORDER: &str = "АБВГДЕЁЖЗИЙКЛМНОПРСТУФХЦЧШЩЪЫЬЭЮЯ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogGroup {
    /// A single uppercase letter, or [`OTHER_BUCKET`].
    pub letter: String,
    pub services: Vec<ServiceSummary>,
}

/// Groups services by the uppercased first letter of their title.
///
/// Services keep their input order inside a bucket. Buckets are ordered
/// Latin before Cyrillic, Cyrillic in Russian alphabet order, and
/// [`OTHER_BUCKET`] always last.
#[must_use]
pub fn group_by_first_letter(services: &[ServiceSummary]) -> Vec<CatalogGroup> {
    let mut groups: Vec<CatalogGroup> = Vec::new();

    for service in services {
        let letter = bucket_key(&service.title);
        match groups.iter_mut().find(|g| g.letter == letter) {
            Some(group) => group.services.push(service.clone()),
            None => groups.push(CatalogGroup {
                letter,
                services: vec![service.clone()],
            }),
        }
    }

    groups.sort_by(|a, b| compare_keys(&a.letter, &b.letter));
    groups
}

fn is_catalog_letter(c: char) -> bool {
    c.is_ascii_alphabetic() || ('А'..='я').contains(&c) || c == 'Ё' || c == 'ё'
}

fn bucket_key(title: &str) -> String {
    if title.is_empty() || title == UNTITLED {
        return OTHER_BUCKET.to_owned();
    }
    match title.chars().next() {
        Some(first) if is_catalog_letter(first) => first.to_uppercase().collect(),
        _ => OTHER_BUCKET.to_owned(),
    }
}

/// Sort rank of an uppercase bucket letter: script first, then position
/// within the script's alphabet.
fn collation_rank(letter: &str) -> (u8, usize) {
    let Some(c) = letter.chars().next() else {
        return (u8::MAX, 0);
    };
    if c.is_ascii_uppercase() {
        return (0, c as usize - 'A' as usize);
    }
    match CYRILLIC_ORDER.chars().position(|x| x == c) {
        Some(pos) => (1, pos),
        None => (2, c as usize),
    }
}

fn compare_keys(a: &str, b: &str) -> Ordering {
    match (a == OTHER_BUCKET, b == OTHER_BUCKET) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => collation_rank(a).cmp(&collation_rank(b)),
    }
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
