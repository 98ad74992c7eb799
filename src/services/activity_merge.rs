//! Collapses bursts of same-type activity from one actor into single feed entries.
//!
//! A run starts at an anchor entry and extends over the following entries while
//! they share the anchor's type and actor and were created no more than
//! [`MERGE_WINDOW_SECS`] after the anchor. The window is measured from the anchor,
//! not from the previous entry: with entries at 0s, 250s and 400s the third one
//! starts a new run even though it is only 150s after the second.

use chrono::Duration;

use crate::models::activity::{ActivityEntry, MergeStrategy};

pub const MERGE_WINDOW_SECS: i64 = 5 * 60;

/// `entries` must be sorted by `created_at`, oldest first.
pub fn merge_activities(entries: &[ActivityEntry]) -> Vec<ActivityEntry> {
    let window = Duration::seconds(MERGE_WINDOW_SECS);
    let mut merged = Vec::with_capacity(entries.len());
    let mut i = 0;

    while i < entries.len() {
        let anchor = &entries[i];
        let (Some(strategy), Some(actor)) = (anchor.activity_type.merge_strategy(), anchor.actor_id())
        else {
            merged.push(anchor.clone());
            i += 1;
            continue;
        };

        let mut end = i + 1;
        while end < entries.len() && extends_run(anchor, actor, &entries[end], window) {
            end += 1;
        }

        let run = &entries[i..end];
        if run.len() == 1 {
            merged.push(anchor.clone());
        } else {
            merged.push(fold_run(strategy, run));
        }
        i = end;
    }

    merged
}

fn extends_run(anchor: &ActivityEntry, actor: &str, next: &ActivityEntry, window: Duration) -> bool {
    if next.activity_type != anchor.activity_type || next.actor_id() != Some(actor) {
        return false;
    }
    let gap = next.created_at - anchor.created_at;
    gap >= Duration::zero() && gap <= window
}

fn fold_run(strategy: MergeStrategy, run: &[ActivityEntry]) -> ActivityEntry {
    let anchor = &run[0];
    let mut folded = anchor.clone();
    folded.merge_count = Some(run.len());

    match strategy {
        MergeStrategy::ByList => {
            folded.merged_labels = Some(
                run.iter()
                    .filter_map(|entry| entry.label_name().map(str::to_string))
                    .collect(),
            );
        }
        MergeStrategy::ByCount => {
            let newest = &run[run.len() - 1];
            folded.from_description = anchor.from_description.clone();
            folded.to_description = newest.to_description.clone();
        }
    }

    folded
}
