//! The authoritative residue selection.
//!
//! [`SelectionStore`] owns the [`Selection`] and is the only thing allowed to
//! change it. Every mutating call either applies completely or not at all:
//! a rejected call returns `false` and leaves the selection (and the
//! listeners) untouched.
//!
//! Checks run in a fixed order: structure (non-empty chain, `start >= 1`,
//! `end >= start`, unique ids), then per-region constraints
//! (`allowed_chains`, `max_range_size`), then cardinality (`max_selections`)
//! against the selection the call would produce.

use std::fmt;

use rustc_hash::FxHashSet;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::merge::merge_regions;
use super::observer::{Listener, Listeners, SubscriptionToken};
use super::region::Region;
use crate::sequence::ResidueRef;

/// How new regions combine with the existing selection.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    /// At most one region overall.
    Single,
    /// At most one region per chain.
    #[default]
    Range,
    /// Any number of regions, merged per chain.
    Multiple,
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Single => "single",
            Self::Range => "range",
            Self::Multiple => "multiple",
        })
    }
}

/// Limits every proposed region and selection must respect.
#[derive(
    Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(default)]
pub struct Constraints {
    /// Maximum number of regions in the selection.
    pub max_selections: Option<u32>,
    /// Maximum residues per region.
    pub max_range_size: Option<u32>,
    /// Chains that may be selected (`None` = any chain).
    pub allowed_chains: Option<Vec<String>>,
}

impl Constraints {
    /// No limits.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Check the per-region constraints (`allowed_chains`,
    /// `max_range_size`).
    pub fn check_region(&self, region: &Region) -> Result<(), RejectReason> {
        if let Some(allowed) = &self.allowed_chains {
            if !allowed.iter().any(|c| *c == region.chain_id) {
                return Err(RejectReason::ChainNotAllowed(
                    region.chain_id.clone(),
                ));
            }
        }
        if let Some(max) = self.max_range_size {
            let len = region.len();
            if len > max {
                return Err(RejectReason::RangeTooLarge { len, max });
            }
        }
        Ok(())
    }

    /// Check `max_selections` against a resulting region count.
    pub fn check_count(&self, count: usize) -> Result<(), RejectReason> {
        match self.max_selections {
            Some(max) if count > max as usize => {
                Err(RejectReason::TooManySelections { count, max })
            }
            _ => Ok(()),
        }
    }
}

/// Why a region or selection was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// Region has an empty chain id.
    EmptyChainId,
    /// Region starts before position 1.
    StartBelowOne(i32),
    /// Region ends before it starts.
    EndBeforeStart {
        /// Start position.
        start: i32,
        /// End position.
        end: i32,
    },
    /// Two regions share an id.
    DuplicateId(String),
    /// Region is on a chain outside `allowed_chains`.
    ChainNotAllowed(String),
    /// Region is longer than `max_range_size`.
    RangeTooLarge {
        /// Residues in the region.
        len: u32,
        /// Configured maximum.
        max: u32,
    },
    /// Resulting selection exceeds `max_selections`.
    TooManySelections {
        /// Regions in the resulting selection.
        count: usize,
        /// Configured maximum.
        max: u32,
    },
    /// Proposed selection breaks the current mode's invariant.
    ModeViolation(SelectionMode),
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyChainId => f.write_str("empty chain id"),
            Self::StartBelowOne(start) => {
                write!(f, "start {start} is below 1")
            }
            Self::EndBeforeStart { start, end } => {
                write!(f, "end {end} is before start {start}")
            }
            Self::DuplicateId(id) => write!(f, "duplicate region id '{id}'"),
            Self::ChainNotAllowed(chain) => {
                write!(f, "chain '{chain}' is not selectable")
            }
            Self::RangeTooLarge { len, max } => {
                write!(f, "{len} residues exceeds the limit of {max}")
            }
            Self::TooManySelections { count, max } => {
                write!(f, "{count} regions exceeds the limit of {max}")
            }
            Self::ModeViolation(mode) => {
                write!(f, "selection violates {mode} mode")
            }
        }
    }
}

/// Structural validity of a single region.
pub fn check_structure(region: &Region) -> Result<(), RejectReason> {
    if region.chain_id.is_empty() {
        return Err(RejectReason::EmptyChainId);
    }
    if region.start < 1 {
        return Err(RejectReason::StartBelowOne(region.start));
    }
    if region.end < region.start {
        return Err(RejectReason::EndBeforeStart {
            start: region.start,
            end: region.end,
        });
    }
    Ok(())
}

/// The current selection: regions plus the rules they were accepted under.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Selection {
    /// Selected regions, unique by id.
    pub regions: Vec<Region>,
    /// Active mode.
    pub mode: SelectionMode,
    /// Active constraints.
    pub constraints: Constraints,
}

impl Selection {
    /// Whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Number of selected regions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Region with the given id.
    #[must_use]
    pub fn region(&self, id: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.id == id)
    }

    /// First region containing `residue`.
    #[must_use]
    pub fn region_containing(&self, residue: &ResidueRef) -> Option<&Region> {
        self.regions.iter().find(|r| r.contains(residue))
    }
}

/// Owns the selection, enforces mode semantics and constraints, and
/// notifies subscribers after every effective change.
#[derive(Debug, Default)]
pub struct SelectionStore {
    selection: Selection,
    listeners: Listeners<Selection>,
}

impl SelectionStore {
    /// Empty store with the given mode and constraints.
    #[must_use]
    pub fn new(mode: SelectionMode, constraints: Constraints) -> Self {
        Self {
            selection: Selection {
                regions: Vec::new(),
                mode,
                constraints,
            },
            listeners: Listeners::new(),
        }
    }

    /// Current selection.
    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Current regions.
    #[must_use]
    pub fn regions(&self) -> &[Region] {
        &self.selection.regions
    }

    /// Active mode.
    #[must_use]
    pub fn mode(&self) -> SelectionMode {
        self.selection.mode
    }

    /// Active constraints.
    #[must_use]
    pub fn constraints(&self) -> &Constraints {
        &self.selection.constraints
    }

    /// Register a change listener.
    pub fn subscribe(
        &mut self,
        listener: Listener<Selection>,
    ) -> SubscriptionToken {
        self.listeners.subscribe(listener)
    }

    /// Remove a change listener.
    pub fn unsubscribe(&mut self, token: SubscriptionToken) -> bool {
        self.listeners.unsubscribe(token)
    }

    /// Add a region according to the active mode.
    ///
    /// - `single`: the selection becomes exactly `[region]`.
    /// - `range`: a region on the same chain is replaced, others are kept.
    /// - `multiple`: the region is unioned in and merged per chain.
    ///
    /// Returns `false` (and changes nothing) if the region or the resulting
    /// selection is invalid.
    pub fn add_region(&mut self, region: Region) -> bool {
        let result = check_structure(&region)
            .and_then(|()| self.selection.constraints.check_region(&region))
            .map(|()| self.with_added(region.clone()))
            .and_then(|regions| self.validate(regions));
        self.apply(result, "add", &region.id)
    }

    /// Remove the region with `id`. Returns `false` if no such region.
    pub fn remove_region(&mut self, id: &str) -> bool {
        let Some(idx) = self.selection.regions.iter().position(|r| r.id == id)
        else {
            return false;
        };
        let mut regions = self.selection.regions.clone();
        let _ = regions.remove(idx);
        let result = self.validate(regions);
        self.apply(result, "remove", id)
    }

    /// Replace the whole selection.
    ///
    /// The regions must satisfy the active mode: at most one in `single`,
    /// at most one per chain in `range`; `multiple` merges them.
    pub fn replace_selection(&mut self, regions: Vec<Region>) -> bool {
        let count = regions.len();
        let result = self.propose_replacement(regions);
        self.apply(result, "replace", &format!("{count} regions"))
    }

    /// Remove every region. A no-op (no notification) when already empty.
    pub fn clear_selection(&mut self) {
        if !self.selection.regions.is_empty() {
            let _ = self.commit(Vec::new());
        }
    }

    /// Switch mode, truncating the selection so it stays valid.
    ///
    /// `single` keeps the first region, `range` keeps the first region of
    /// each chain, `multiple` merges. Listeners hear about it only when
    /// regions were dropped or merged.
    pub fn set_mode(&mut self, mode: SelectionMode) {
        if mode == self.selection.mode {
            return;
        }
        log::debug!("selection mode {} -> {mode}", self.selection.mode);
        self.selection.mode = mode;
        let truncated = truncate_for_mode(self.selection.regions.clone(), mode);
        let _ = self.commit(truncated);
    }

    /// Replace the constraints, dropping regions that no longer satisfy
    /// them (and trailing regions beyond `max_selections`).
    pub fn set_constraints(&mut self, constraints: Constraints) {
        let mut kept: Vec<Region> = self
            .selection
            .regions
            .iter()
            .filter(|r| constraints.check_region(r).is_ok())
            .cloned()
            .collect();
        if let Some(max) = constraints.max_selections {
            kept.truncate(max as usize);
        }
        self.selection.constraints = constraints;
        let _ = self.commit(kept);
    }

    /// Replace mode, constraints and regions together (e.g. restoring a
    /// persisted selection). All or nothing.
    pub fn restore(&mut self, selection: Selection) -> bool {
        let mut candidate =
            Self::new(selection.mode, selection.constraints.clone());
        if !candidate.replace_selection(selection.regions) {
            log::debug!("rejected restored selection");
            return false;
        }
        self.selection.mode = candidate.selection.mode;
        self.selection.constraints = candidate.selection.constraints;
        let _ = self.commit(candidate.selection.regions);
        true
    }

    /// Keep only regions matching `keep`. Returns `true` if any region was
    /// dropped.
    pub fn retain_regions(&mut self, keep: impl Fn(&Region) -> bool) -> bool {
        let kept: Vec<Region> = self
            .selection
            .regions
            .iter()
            .filter(|r| keep(r))
            .cloned()
            .collect();
        self.commit(kept)
    }

    /// Whether any region contains `residue`.
    #[must_use]
    pub fn is_residue_selected(&self, residue: &ResidueRef) -> bool {
        self.region_containing(residue).is_some()
    }

    /// First region containing `residue`.
    #[must_use]
    pub fn region_containing(&self, residue: &ResidueRef) -> Option<&Region> {
        self.selection.region_containing(residue)
    }

    /// Validate a region against structure and the active constraints
    /// without changing anything.
    pub fn validate_region(&self, region: &Region) -> Result<(), RejectReason> {
        check_structure(region)?;
        self.selection.constraints.check_region(region)
    }

    // ── internals ──

    /// Regions after adding `region` under the active mode (unvalidated).
    fn with_added(&self, region: Region) -> Vec<Region> {
        let current = &self.selection.regions;
        match self.selection.mode {
            SelectionMode::Single => vec![region],
            SelectionMode::Range => {
                let mut regions = current.clone();
                match regions.iter().position(|r| r.chain_id == region.chain_id)
                {
                    Some(idx) => regions[idx] = region,
                    None => regions.push(region),
                }
                regions
            }
            SelectionMode::Multiple => {
                let mut regions = current.clone();
                regions.push(region);
                merge_regions(regions)
            }
        }
    }

    fn propose_replacement(
        &self,
        regions: Vec<Region>,
    ) -> Result<Vec<Region>, RejectReason> {
        for region in &regions {
            check_structure(region)?;
            self.selection.constraints.check_region(region)?;
        }
        let mode = self.selection.mode;
        let regions = match mode {
            SelectionMode::Single if regions.len() > 1 => {
                return Err(RejectReason::ModeViolation(mode));
            }
            SelectionMode::Range => {
                let mut chains = FxHashSet::default();
                if !regions.iter().all(|r| chains.insert(r.chain_id.as_str())) {
                    return Err(RejectReason::ModeViolation(mode));
                }
                regions
            }
            SelectionMode::Multiple => {
                check_unique_ids(&regions)?;
                merge_regions(regions)
            }
            SelectionMode::Single => regions,
        };
        self.validate(regions)
    }

    /// Full check of a resulting selection.
    fn validate(
        &self,
        regions: Vec<Region>,
    ) -> Result<Vec<Region>, RejectReason> {
        let constraints = &self.selection.constraints;
        for region in &regions {
            check_structure(region)?;
            constraints.check_region(region)?;
        }
        check_unique_ids(&regions)?;
        constraints.check_count(regions.len())?;
        Ok(regions)
    }

    fn apply(
        &mut self,
        result: Result<Vec<Region>, RejectReason>,
        op: &str,
        subject: &str,
    ) -> bool {
        match result {
            Ok(regions) => {
                let _ = self.commit(regions);
                true
            }
            Err(reason) => {
                log::debug!("rejected {op} ({subject}): {reason}");
                false
            }
        }
    }

    /// Install `regions` and notify if they differ from the current ones.
    fn commit(&mut self, regions: Vec<Region>) -> bool {
        if regions == self.selection.regions {
            return false;
        }
        self.selection.regions = regions;
        log::debug!(
            "selection changed: {} regions ({} mode)",
            self.selection.regions.len(),
            self.selection.mode
        );
        self.listeners.notify(&self.selection);
        true
    }
}

fn check_unique_ids(regions: &[Region]) -> Result<(), RejectReason> {
    let mut seen = FxHashSet::default();
    for region in regions {
        if !seen.insert(region.id.as_str()) {
            return Err(RejectReason::DuplicateId(region.id.clone()));
        }
    }
    Ok(())
}

/// Drop or merge regions so they satisfy `mode`'s invariant.
fn truncate_for_mode(regions: Vec<Region>, mode: SelectionMode) -> Vec<Region> {
    match mode {
        SelectionMode::Single => regions.into_iter().take(1).collect(),
        SelectionMode::Range => {
            let mut chains = FxHashSet::default();
            regions
                .into_iter()
                .filter(|r| chains.insert(r.chain_id.clone()))
                .collect()
        }
        SelectionMode::Multiple => merge_regions(regions),
    }
}
