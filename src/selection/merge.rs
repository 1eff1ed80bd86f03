//! Range consolidation.
//!
//! Every consumer that needs "the smallest set of spans covering these
//! residues" goes through here: `multiple`-mode selections, and hover
//! positions before they are sent to the renderer. Output is sorted by chain
//! id, then by start; ranges on one chain never overlap and never touch
//! (consecutive ranges are separated by at least one unselected position).
//! The input is sorted first, so the result does not depend on input order.

use std::collections::BTreeMap;

use super::region::{Region, ResidueRange};
use crate::sequence::ResidueRef;

/// Merge ranges into the minimal sorted set of disjoint, non-adjacent
/// ranges per chain. Reversed ranges are read with their bounds swapped.
pub fn merge_ranges<I>(ranges: I) -> Vec<ResidueRange>
where
    I: IntoIterator<Item = ResidueRange>,
{
    let mut by_chain: BTreeMap<String, Vec<(i32, i32)>> = BTreeMap::new();
    for range in ranges {
        let bounds = (range.start.min(range.end), range.start.max(range.end));
        by_chain.entry(range.chain_id).or_default().push(bounds);
    }

    let mut merged = Vec::new();
    for (chain_id, mut spans) in by_chain {
        spans.sort_unstable();
        let mut iter = spans.into_iter();
        let Some((mut acc_start, mut acc_end)) = iter.next() else {
            continue;
        };
        for (start, end) in iter {
            if start <= acc_end.saturating_add(1) {
                acc_end = acc_end.max(end);
            } else {
                merged.push(ResidueRange::new(
                    chain_id.clone(),
                    acc_start,
                    acc_end,
                ));
                acc_start = start;
                acc_end = end;
            }
        }
        merged.push(ResidueRange::new(chain_id, acc_start, acc_end));
    }
    merged
}

/// Collapse individual positions into ranges (positions are degenerate
/// ranges).
pub fn merge_positions<'a, I>(positions: I) -> Vec<ResidueRange>
where
    I: IntoIterator<Item = &'a ResidueRef>,
{
    merge_ranges(
        positions
            .into_iter()
            .map(|p| ResidueRange::single(p.chain_id.clone(), p.position)),
    )
}

/// Merge regions the way [`merge_ranges`] merges ranges.
///
/// A region that merges with nothing is returned untouched (id, label and
/// sequence preserved). A merged region gets a fresh derived id and label,
/// and its sequence is reassembled from the constituents when they cover
/// every position with a complete sequence.
pub(crate) fn merge_regions(regions: Vec<Region>) -> Vec<Region> {
    let mut by_chain: BTreeMap<String, Vec<Region>> = BTreeMap::new();
    for region in regions {
        by_chain.entry(region.chain_id.clone()).or_default().push(region);
    }

    let mut merged = Vec::new();
    for (_, mut group) in by_chain {
        group.sort_by_key(|r| (r.start, r.end));
        let mut run: Vec<Region> = Vec::new();
        let mut run_end = i32::MIN;
        for region in group {
            if !run.is_empty() && region.start > run_end.saturating_add(1) {
                merged.push(collapse_run(std::mem::take(&mut run)));
            }
            run_end = if run.is_empty() {
                region.end
            } else {
                run_end.max(region.end)
            };
            run.push(region);
        }
        if !run.is_empty() {
            merged.push(collapse_run(run));
        }
    }
    merged
}

/// Turn a run of overlapping/adjacent regions (sorted by start) into one.
fn collapse_run(mut run: Vec<Region>) -> Region {
    if run.len() == 1 {
        if let Some(only) = run.pop() {
            return only;
        }
    }
    let chain_id = run[0].chain_id.clone();
    let start = run[0].start;
    let end = run.iter().map(|r| r.end).max().unwrap_or(start);

    let sources: Vec<(i32, Vec<char>)> = run
        .iter()
        .filter(|r| r.has_complete_sequence())
        .map(|r| (r.start, r.sequence.chars().collect()))
        .collect();
    let sequence: Option<String> = (start..=end)
        .map(|pos| {
            sources.iter().find_map(|(src_start, codes)| {
                let offset = usize::try_from(pos - src_start).ok()?;
                codes.get(offset).copied()
            })
        })
        .collect();

    let region = Region::new(chain_id, start, end);
    match sequence {
        Some(seq) => region.with_sequence(seq),
        None => region,
    }
}
