//! Widget id generation

use std::collections::HashSet;
use super::model::WidgetRecord;

/// Smallest unused `"<type>-<n>"`, counting from 1
pub fn next_widget_id<'a>(widget_type: &str, taken: impl IntoIterator<Item = &'a str>) -> String {
    let taken: HashSet<&str> = taken.into_iter().collect();
    let mut n: u64 = 1;
    loop {
        let candidate = format!("{widget_type}-{n}");
        if !taken.contains(candidate.as_str()) {
            return candidate;
        }
        n += 1;
    }
}

/// Give every widget a unique id.
///
/// The first occurrence of each non-empty id keeps it; empty and duplicate
/// ids get a generated one that collides with nothing in the list.
/// Returns how many ids were assigned.
pub fn assign_missing_ids(widgets: &mut [WidgetRecord]) -> usize {
    let mut claimed: HashSet<String> = HashSet::new();
    let mut keep = Vec::with_capacity(widgets.len());
    for widget in widgets.iter() {
        keep.push(!widget.id.is_empty() && claimed.insert(widget.id.clone()));
    }

    let mut assigned = 0;
    for (widget, keep) in widgets.iter_mut().zip(keep) {
        if keep {
            continue;
        }
        let id = next_widget_id(&widget.widget_type, claimed.iter().map(String::as_str));
        claimed.insert(id.clone());
        widget.id = id;
        assigned += 1;
    }
    assigned
}
