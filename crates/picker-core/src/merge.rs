use crate::model::{MergedEntry, RepositoryRecord};
use std::collections::HashSet;

/// Combines the caller's known repositories with search results.
///
/// Known records come first, in their original order. Searched records
/// follow in the order the provider returned them, minus any whose id is
/// already present. The output never holds two entries with the same id; on
/// a collision the earlier entry wins, so a known record always beats a
/// searched copy of the same repository.
pub fn merge<'a>(
    known: &'a [RepositoryRecord],
    searched: &'a [RepositoryRecord],
) -> Vec<MergedEntry<'a>> {
    let mut seen = HashSet::with_capacity(known.len() + searched.len());
    let mut merged = Vec::with_capacity(known.len() + searched.len());
    for record in known {
        if seen.insert(record.id) {
            merged.push(MergedEntry::known(record));
        }
    }
    for record in searched {
        if seen.insert(record.id) {
            merged.push(MergedEntry::searched(record));
        }
    }
    merged
}
