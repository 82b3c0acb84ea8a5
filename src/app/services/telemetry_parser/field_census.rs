//! Recognised-label census for upload previews

use std::collections::BTreeMap;
use std::io::BufRead;

use super::catalog::FieldCatalog;
use super::line_parser::split_pair;
use super::prefix::{NonBlankLines, PrefixLine};
use crate::constants::{CENSUS_SCAN_LINES, FIELD_SEPARATOR};

/// Occurrence count of each recognised label, keyed by the label as written
pub type FieldCensus = BTreeMap<String, usize>;

/// Count recognised labels over the first non-blank lines of a reader
///
/// The census is informational only. Unreadable input yields an empty map.
pub fn census_reader<R: BufRead>(catalog: &FieldCatalog, reader: R) -> FieldCensus {
    let mut lines = NonBlankLines::new(reader);
    let mut counts = FieldCensus::new();

    for prefix_line in lines.by_ref().take(CENSUS_SCAN_LINES) {
        let PrefixLine::Text { text, .. } = prefix_line else {
            continue;
        };

        for (label, _) in text.split(FIELD_SEPARATOR).skip(1).filter_map(split_pair) {
            if catalog.contains(label) {
                *counts.entry(label.to_string()).or_default() += 1;
            }
        }
    }

    if lines.take_error().is_some() {
        return FieldCensus::new();
    }
    counts
}
