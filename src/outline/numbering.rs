//! Ordinal numbering prefixes ("1", "1.1", "1.2", "2")
//!
//! Recomputed from the full ordered list on every extraction: one running
//! counter per level, deeper counters reset when a shallower heading appears.
//! Counting starts at the shallowest level present, so a document that only
//! uses `##` and `###` is numbered "1", "1.1" rather than "0.1", "0.1.1".

use super::{Heading, MAX_LEVEL};

/// Fill in `numbering` on every heading
pub fn apply_numbering(headings: &mut [Heading]) {
    let Some(base) = headings.iter().map(|h| h.level).min() else {
        return;
    };

    let mut counters = [0usize; MAX_LEVEL as usize];
    for heading in headings.iter_mut() {
        let depth = usize::from(heading.level.saturating_sub(base));
        counters[depth] += 1;
        for deeper in counters.iter_mut().skip(depth + 1) {
            *deeper = 0;
        }
        let prefix = counters[..=depth]
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(".");
        heading.numbering = Some(prefix);
    }
}
