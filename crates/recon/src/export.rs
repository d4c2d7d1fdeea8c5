//! Shopping-list export: catalog id counts rendered as an import link.

use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

/// `id,null,count` entries joined with `;`, ordered by id.
pub fn import_payload(counts: &BTreeMap<u32, usize>) -> String {
    counts
        .iter()
        .map(|(id, count)| format!("{id},null,{count}"))
        .collect::<Vec<_>>()
        .join(";")
}

/// Base64 of [`import_payload`].
pub fn import_string(counts: &BTreeMap<u32, usize>) -> String {
    STANDARD.encode(import_payload(counts))
}

pub fn import_link(base_url: &str, counts: &BTreeMap<u32, usize>) -> String {
    format!("{base_url}{}", import_string(counts))
}
