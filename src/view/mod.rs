//! The sequence view: one selection, one drag controller, one renderer.
//!
//! [`SequenceView`] wires the pieces together the way a host would: pointer
//! events go through the [`DragSelectionController`] into the
//! [`SelectionStore`], the store's observer list drives the
//! [`HighlightBridge`]'s persistent channel, and hover goes straight to the
//! bridge's debounced transient channel. The host pumps [`SequenceView::tick`]
//! from its event loop to let debounced hover updates fire.
//!
//! Independent views (two structures side by side) are independent
//! `SequenceView` values with independent renderers.

/// Commands, region actions and key mapping.
pub mod command;

use std::cell::{Ref, RefCell, RefMut};
use std::path::Path;
use std::rc::Rc;

pub use command::{RegionAction, RegionActionEvent, ViewCommand};
use web_time::Instant;

use crate::bridge::{
    Clock, CoordinateMapper, HighlightBridge, StructureRenderer, SystemClock,
};
use crate::error::SequenceViewError;
use crate::input::drag::filled_region;
use crate::input::{
    CellRef, DragSelectionController, DragUpdate, PointerEvent,
};
use crate::options::Options;
use crate::selection::{
    Listener, Listeners, Region, ResidueRange, Selection, SelectionMode,
    SelectionStore, SubscriptionToken,
};
use crate::sequence::provider::SequenceProvider;
use crate::sequence::{Residue, ResidueRef, SequenceData};

/// Where the view's sequence data stands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    /// Nothing requested yet.
    #[default]
    Empty,
    /// A fetch is in flight.
    Loading {
        /// Structure being fetched.
        structure_id: String,
    },
    /// Sequence data is available.
    Ready {
        /// Structure the data belongs to.
        structure_id: String,
        /// The data.
        data: SequenceData,
    },
    /// The last fetch failed.
    Failed {
        /// Structure that was requested.
        structure_id: String,
        /// Provider message.
        message: String,
    },
}

impl LoadState {
    /// The loaded data, if any.
    #[must_use]
    pub fn data(&self) -> Option<&SequenceData> {
        match self {
            Self::Ready { data, .. } => Some(data),
            _ => None,
        }
    }
}

/// Sequence selection view synchronized with a 3D renderer.
pub struct SequenceView<R: StructureRenderer> {
    store: SelectionStore,
    drag: DragSelectionController,
    bridge: Rc<RefCell<HighlightBridge<R>>>,
    load_state: LoadState,
    options: Options,
    /// Residues under the pointer (or the live drag preview).
    hovered: Vec<ResidueRef>,
    highlight_listeners: Listeners<[Residue]>,
    action_listeners: Listeners<RegionActionEvent>,
}

impl<R: StructureRenderer + 'static> SequenceView<R> {
    /// View driving `renderer`, timed by the wall clock.
    pub fn new(renderer: R, options: Options) -> Self {
        Self::with_clock(renderer, options, Rc::new(SystemClock))
    }

    /// View driving `renderer` with an explicit clock.
    pub fn with_clock(
        renderer: R,
        options: Options,
        clock: Rc<dyn Clock>,
    ) -> Self {
        let mut store = SelectionStore::new(
            options.selection.mode,
            options.selection.constraints(),
        );
        let bridge = Rc::new(RefCell::new(HighlightBridge::new(
            renderer,
            CoordinateMapper::new(options.highlight.numbering),
            clock,
            options.highlight.hover_delay(),
        )));
        let _ = HighlightBridge::attach(&bridge, &mut store);
        Self {
            store,
            drag: DragSelectionController::new(),
            bridge,
            load_state: LoadState::Empty,
            options,
            hovered: Vec::new(),
            highlight_listeners: Listeners::new(),
            action_listeners: Listeners::new(),
        }
    }

    // ── accessors ──

    /// The selection store.
    #[must_use]
    pub fn store(&self) -> &SelectionStore {
        &self.store
    }

    /// Mutable selection store, for direct programmatic edits.
    pub fn store_mut(&mut self) -> &mut SelectionStore {
        &mut self.store
    }

    /// The current selection.
    #[must_use]
    pub fn selection(&self) -> &Selection {
        self.store.selection()
    }

    /// The drag controller.
    #[must_use]
    pub fn drag(&self) -> &DragSelectionController {
        &self.drag
    }

    /// The highlight bridge.
    #[must_use]
    pub fn bridge(&self) -> Ref<'_, HighlightBridge<R>> {
        self.bridge.borrow()
    }

    /// The renderer handle.
    #[must_use]
    pub fn renderer(&self) -> Ref<'_, R> {
        Ref::map(self.bridge.borrow(), HighlightBridge::renderer)
    }

    /// Mutable renderer handle. Call [`refresh_renderer`](Self::refresh_renderer)
    /// after loading a new structure into it.
    pub fn renderer_mut(&self) -> RefMut<'_, R> {
        RefMut::map(self.bridge.borrow_mut(), HighlightBridge::renderer_mut)
    }

    /// Re-apply selection and hover to the renderer.
    pub fn refresh_renderer(&self) {
        self.bridge.borrow_mut().refresh();
    }

    /// Sequence data load state.
    #[must_use]
    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    /// Loaded sequence data.
    #[must_use]
    pub fn sequence(&self) -> Option<&SequenceData> {
        self.load_state.data()
    }

    /// Residues currently hovered (or previewed by a drag).
    #[must_use]
    pub fn hovered(&self) -> &[ResidueRef] {
        &self.hovered
    }

    /// Current options.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Apply new options: mode, constraints, numbering and hover delay.
    pub fn set_options(&mut self, options: Options) {
        let _ = self.drag.cancel();
        self.store.set_mode(options.selection.mode);
        self.store.set_constraints(options.selection.constraints());
        {
            let mut bridge = self.bridge.borrow_mut();
            bridge.set_hover_delay(options.highlight.hover_delay());
            bridge.set_mapper(CoordinateMapper::new(options.highlight.numbering));
        }
        self.options = options;
    }

    /// Load options from a TOML preset and apply them.
    pub fn load_preset(&mut self, path: &Path) -> Result<(), SequenceViewError> {
        let options = Options::load(path).inspect_err(|e| {
            log::error!("loading preset {}: {e}", path.display());
        })?;
        log::info!("loaded view preset {}", path.display());
        self.set_options(options);
        Ok(())
    }

    /// Save the current options as a TOML preset.
    pub fn save_preset(&self, path: &Path) -> Result<(), SequenceViewError> {
        self.options.save(path).inspect_err(|e| {
            log::error!("saving preset {}: {e}", path.display());
        })?;
        log::info!("saved view preset {}", path.display());
        Ok(())
    }

    // ── sequence data ──

    /// Fetch sequence data for `structure_id` from `provider`.
    ///
    /// On success, regions on chains the new data no longer has are dropped
    /// and the renderer is refreshed. On failure the previous selection is
    /// kept and the error is returned; nothing is retried.
    pub async fn load_sequence<P: SequenceProvider>(
        &mut self,
        provider: &P,
        structure_id: &str,
    ) -> Result<(), SequenceViewError> {
        let _ = self.drag.cancel();
        self.load_state = LoadState::Loading {
            structure_id: structure_id.to_owned(),
        };
        match provider.fetch_sequence(structure_id).await {
            Ok(data) => {
                log::info!(
                    "loaded sequence for '{structure_id}' ({} chains)",
                    data.chains.len()
                );
                if self.store.retain_regions(|r| data.contains_chain(&r.chain_id)) {
                    log::debug!("dropped regions on chains missing from '{structure_id}'");
                }
                self.load_state = LoadState::Ready {
                    structure_id: structure_id.to_owned(),
                    data,
                };
                self.bridge.borrow_mut().refresh();
                Ok(())
            }
            Err(e) => {
                log::warn!("sequence fetch for '{structure_id}' failed: {e}");
                self.load_state = LoadState::Failed {
                    structure_id: structure_id.to_owned(),
                    message: e.to_string(),
                };
                Err(e.into())
            }
        }
    }

    // ── listeners ──

    /// Listen for selection changes.
    pub fn on_selection_change(
        &mut self,
        listener: Listener<Selection>,
    ) -> SubscriptionToken {
        self.store.subscribe(listener)
    }

    /// Remove a selection listener.
    pub fn remove_selection_listener(&mut self, token: SubscriptionToken) -> bool {
        self.store.unsubscribe(token)
    }

    /// Listen for hover changes. Listeners get the residues under the
    /// pointer (or in the drag preview) right away; an empty slice means
    /// the hover ended.
    pub fn on_highlight_change(
        &mut self,
        listener: Listener<[Residue]>,
    ) -> SubscriptionToken {
        self.highlight_listeners.subscribe(listener)
    }

    /// Remove a hover listener.
    pub fn remove_highlight_listener(&mut self, token: SubscriptionToken) -> bool {
        self.highlight_listeners.unsubscribe(token)
    }

    /// Listen for region actions.
    pub fn on_region_action(
        &mut self,
        listener: Listener<RegionActionEvent>,
    ) -> SubscriptionToken {
        self.action_listeners.subscribe(listener)
    }

    /// Remove a region-action listener.
    pub fn remove_region_action_listener(
        &mut self,
        token: SubscriptionToken,
    ) -> bool {
        self.action_listeners.unsubscribe(token)
    }

    // ── input ──

    /// Feed one pointer event.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> DragUpdate {
        let hover = match &event {
            PointerEvent::Enter { cell } if !self.drag.is_dragging() => {
                Some(vec![cell.residue()])
            }
            PointerEvent::Up { cell } => {
                Some(cell.iter().map(CellRef::residue).collect())
            }
            PointerEvent::Leave { outside_surface }
                if *outside_surface || !self.drag.is_dragging() =>
            {
                Some(Vec::new())
            }
            _ => None,
        };
        let update =
            self.drag
                .handle_event(event, &mut self.store, self.load_state.data());
        match &update {
            DragUpdate::Preview(range) => self.set_hover(range_positions(range)),
            DragUpdate::Cancelled => self.set_hover(Vec::new()),
            DragUpdate::None | DragUpdate::Committed { .. } => {}
        }
        if let Some(hover) = hover {
            self.set_hover(hover);
        }
        update
    }

    /// Look up a key press and run the bound command. Returns `false` if the
    /// key is unbound.
    pub fn handle_key_press(&mut self, key: &str) -> bool {
        let Some(action) = self.options.keybindings.lookup(key) else {
            return false;
        };
        log::debug!("key {key} -> {action:?}");
        let _ = self.execute(action.to_command());
        true
    }

    /// Fire the pending hover highlight if its debounce has elapsed.
    /// Returns `true` if the renderer was updated.
    pub fn tick(&mut self) -> bool {
        self.bridge.borrow_mut().poll()
    }

    /// When [`tick`](Self::tick) next has work to do.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.bridge.borrow().next_deadline()
    }

    /// Run a command. Returns `false` if it was rejected or had nothing to
    /// act on.
    pub fn execute(&mut self, command: ViewCommand) -> bool {
        match command {
            ViewCommand::Cancel => {
                if self.drag.is_dragging() {
                    let _ = self.drag.cancel();
                    self.set_hover(Vec::new());
                    true
                } else {
                    self.clear_selection()
                }
            }
            ViewCommand::ClearSelection => self.clear_selection(),
            ViewCommand::SelectRange {
                chain_id,
                start,
                end,
                extend,
            } => self.select(&ResidueRange::new(chain_id, start, end), extend),
            ViewCommand::SelectChain { chain_id, extend } => {
                let Some(range) = self.chain_range(&chain_id) else {
                    return false;
                };
                self.select(&range, extend)
            }
            ViewCommand::RemoveRegion { id } => self.store.remove_region(&id),
            ViewCommand::RemoveLastRegion => {
                let Some(id) = self.store.regions().last().map(|r| r.id.clone())
                else {
                    return false;
                };
                self.store.remove_region(&id)
            }
            ViewCommand::SetMode { mode } => {
                let _ = self.drag.cancel();
                self.store.set_mode(mode);
                self.options.selection.mode = mode;
                true
            }
            ViewCommand::SetConstraints { constraints } => {
                self.options.selection.max_selections = constraints.max_selections;
                self.options.selection.max_range_size = constraints.max_range_size;
                self.options
                    .selection
                    .allowed_chains
                    .clone_from(&constraints.allowed_chains);
                self.store.set_constraints(constraints);
                true
            }
            ViewCommand::Hover { residues } => {
                self.set_hover(residues);
                true
            }
            ViewCommand::ClearHover => {
                self.set_hover(Vec::new());
                true
            }
            ViewCommand::FocusSelection => {
                let ranges: Vec<ResidueRange> =
                    self.store.regions().iter().map(Region::range).collect();
                !ranges.is_empty() && self.bridge.borrow_mut().focus(&ranges)
            }
            ViewCommand::RegionAction { action, region_id } => {
                self.region_action(action, region_id.as_deref())
            }
        }
    }

    // ── region actions ──

    /// Emit `action` for the region with `region_id` (or the whole
    /// selection). Returns `false` if the id is unknown or the selection is
    /// empty.
    pub fn region_action(
        &mut self,
        action: RegionAction,
        region_id: Option<&str>,
    ) -> bool {
        let region = match region_id {
            Some(id) => match self.store.selection().region(id) {
                Some(region) => Some(region.clone()),
                None => return false,
            },
            None if self.store.selection().is_empty() => return false,
            None => None,
        };
        if action == RegionAction::Highlight
            && self.options.highlight.focus_on_highlight_action
        {
            let ranges: Vec<ResidueRange> = match &region {
                Some(region) => vec![region.range()],
                None => self.store.regions().iter().map(Region::range).collect(),
            };
            let _ = self.bridge.borrow_mut().focus(&ranges);
        }
        log::debug!(
            "region action {action:?} on {}",
            region.as_ref().map_or("selection", |r| r.id.as_str())
        );
        self.action_listeners
            .notify(&RegionActionEvent { action, region });
        true
    }

    /// FASTA-style text for `region` (or the whole selection): one record
    /// per region, headed by its label, 60 residues per line. Unknown
    /// residues are written as `X`.
    #[must_use]
    pub fn copy_text(&self, region: Option<&Region>) -> String {
        let regions: Vec<&Region> = match region {
            Some(region) => vec![region],
            None => self.store.regions().iter().collect(),
        };
        let mut out = String::new();
        for region in regions {
            let codes = self.region_codes(region);
            out.push('>');
            out.push_str(&region.label);
            out.push('\n');
            let mut chars = codes.chars().peekable();
            while chars.peek().is_some() {
                out.extend(chars.by_ref().take(60));
                out.push('\n');
            }
        }
        out
    }

    // ── internals ──

    fn clear_selection(&mut self) -> bool {
        if self.store.selection().is_empty() {
            return false;
        }
        self.store.clear_selection();
        true
    }

    fn select(&mut self, range: &ResidueRange, extend: bool) -> bool {
        let region = filled_region(range, self.load_state.data());
        if extend || self.store.mode() == SelectionMode::Single {
            self.store.add_region(region)
        } else {
            self.store.replace_selection(vec![region])
        }
    }

    fn chain_range(&self, chain_id: &str) -> Option<ResidueRange> {
        let chain = self.load_state.data()?.chain(chain_id)?;
        let first = chain.residues().first()?;
        let last = chain.residues().last()?;
        Some(ResidueRange::new(chain_id, first.position, last.position))
    }

    fn region_codes(&self, region: &Region) -> String {
        if region.has_complete_sequence() {
            return region.sequence.clone();
        }
        (region.start..=region.end)
            .map(|position| {
                self.load_state
                    .data()
                    .and_then(|d| d.chain(&region.chain_id))
                    .and_then(|c| c.code_at(position))
                    .unwrap_or('X')
            })
            .collect()
    }

    /// Track the hover set: tell listeners immediately, the renderer
    /// through the debounced bridge.
    fn set_hover(&mut self, positions: Vec<ResidueRef>) {
        if positions == self.hovered {
            return;
        }
        self.hovered.clone_from(&positions);
        let residues: Vec<Residue> = match self.load_state.data() {
            Some(data) => positions.iter().filter_map(|p| data.residue(p)).collect(),
            None => Vec::new(),
        };
        self.highlight_listeners.notify(&residues);
        self.bridge.borrow_mut().set_hover(positions);
    }
}

fn range_positions(range: &ResidueRange) -> Vec<ResidueRef> {
    (range.start..=range.end)
        .map(|p| ResidueRef::new(range.chain_id.clone(), p))
        .collect()
}
