use std::collections::BTreeSet;

use super::RosterView;

/// Indices of every row in the current snapshot whose name equals `query`
/// exactly (case-sensitive). An empty query matches nothing. Only the
/// snapshot is consulted, never the store.
pub fn search(view: &RosterView, query: &str) -> BTreeSet<usize> {
    if query.is_empty() {
        return BTreeSet::new();
    }

    view.rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| row.name == query)
        .map(|(index, _)| index)
        .collect()
}
