//! Keeps the external 3D renderer in step with the sequence view.
//!
//! [`HighlightBridge`] owns no selection state of its own. It drives two
//! independent renderer channels:
//!
//! - **persistent**: mirrors the [`SelectionStore`] through its observer
//!   interface. Every change swaps the whole renderer selection via
//!   `select_only`; an empty selection clears it.
//! - **transient**: hover. Setting a hover is debounced (a new hover always
//!   replaces the pending one), clearing is immediate.
//!
//! Renderer trouble (nothing loaded, a chain that vanished on reload, an
//! engine error) is logged and swallowed; the bridge and the store stay
//! consistent and the next change simply tries again.

/// Cancellable scheduled tasks and clocks.
pub mod debounce;
/// Sequence position <-> renderer numbering.
pub mod mapper;
/// The external renderer contract.
pub mod renderer;

#[cfg(test)]
pub(crate) mod mock;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

pub use debounce::{Clock, Debouncer, ManualClock, SystemClock, TaskId};
pub use mapper::{CoordinateMapper, NumberingScheme};
pub use renderer::{
    ChainNumbering, RendererError, ResidueNumbering, StructureNumbering,
    StructureRenderer,
};
use web_time::{Duration, Instant};

use crate::selection::{
    merge_positions, ResidueRange, Selection, SelectionStore,
    SubscriptionToken,
};
use crate::sequence::ResidueRef;

/// Default hover debounce.
pub const DEFAULT_HOVER_DELAY: Duration = Duration::from_millis(150);

/// Drives the renderer's highlight and selection channels.
pub struct HighlightBridge<R: StructureRenderer> {
    renderer: R,
    mapper: CoordinateMapper,
    clock: Rc<dyn Clock>,
    hover: Debouncer<Vec<ResidueRef>>,
    /// Hover set most recently requested (applied or pending).
    hovered: Vec<ResidueRef>,
    /// Sequence-space ranges of the current selection.
    persistent: Vec<ResidueRange>,
    /// Sequence-space ranges of the hover currently shown.
    transient: Vec<ResidueRange>,
}

impl<R: StructureRenderer> HighlightBridge<R> {
    /// Bridge driving `renderer`.
    pub fn new(
        renderer: R,
        mapper: CoordinateMapper,
        clock: Rc<dyn Clock>,
        hover_delay: Duration,
    ) -> Self {
        Self {
            renderer,
            mapper,
            clock,
            hover: Debouncer::new(hover_delay),
            hovered: Vec::new(),
            persistent: Vec::new(),
            transient: Vec::new(),
        }
    }

    /// Subscribe `bridge` to `store` so every selection change reaches the
    /// persistent channel. The current selection is applied right away.
    ///
    /// The subscription holds only a weak reference; dropping the bridge
    /// turns it into a no-op.
    pub fn attach(
        bridge: &Rc<RefCell<Self>>,
        store: &mut SelectionStore,
    ) -> SubscriptionToken
    where
        R: 'static,
    {
        if !store.selection().is_empty() {
            bridge.borrow_mut().on_selection_change(store.selection());
        }
        let weak: Weak<RefCell<Self>> = Rc::downgrade(bridge);
        store.subscribe(Box::new(move |selection: &Selection| {
            if let Some(bridge) = weak.upgrade() {
                bridge.borrow_mut().on_selection_change(selection);
            }
        }))
    }

    /// The renderer handle.
    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Mutable renderer handle (e.g. to load a new structure).
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Current coordinate mapper.
    #[must_use]
    pub fn mapper(&self) -> CoordinateMapper {
        self.mapper
    }

    /// Switch numbering and re-apply both channels.
    pub fn set_mapper(&mut self, mapper: CoordinateMapper) {
        if mapper != self.mapper {
            self.mapper = mapper;
            self.refresh();
        }
    }

    /// Change the hover debounce delay.
    pub fn set_hover_delay(&mut self, delay: Duration) {
        self.hover.set_delay(delay);
    }

    /// Ranges mirrored on the persistent channel (sequence space).
    #[must_use]
    pub fn persistent_selection(&self) -> &[ResidueRange] {
        &self.persistent
    }

    /// Ranges currently shown on the transient channel (sequence space).
    #[must_use]
    pub fn transient_hover(&self) -> &[ResidueRange] {
        &self.transient
    }

    /// Hover positions most recently requested.
    #[must_use]
    pub fn hovered(&self) -> &[ResidueRef] {
        &self.hovered
    }

    /// Whether a hover update is waiting for its debounce to expire.
    #[must_use]
    pub fn hover_pending(&self) -> bool {
        self.hover.is_pending()
    }

    /// When the pending hover update is due.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.hover.deadline()
    }

    // ── persistent channel ──

    /// Mirror `selection` onto the renderer's selection channel.
    pub fn on_selection_change(&mut self, selection: &Selection) {
        self.persistent = selection.regions.iter().map(|r| r.range()).collect();
        self.apply_persistent();
    }

    /// Re-apply both channels, e.g. after the renderer loaded a new
    /// structure. A hover still waiting on its debounce is left to
    /// [`poll`](Self::poll).
    pub fn refresh(&mut self) {
        self.apply_persistent();
        if !self.hover.is_pending() && !self.transient.is_empty() {
            let _ = self.apply_transient(self.transient.clone());
        }
    }

    fn apply_persistent(&mut self) {
        if self.persistent.is_empty() {
            if let Err(e) = self.renderer.clear_selections() {
                log::warn!("clearing renderer selection failed: {e}");
            }
            return;
        }
        let Some(locus) = self.locus_for(&self.persistent) else {
            return;
        };
        if let Err(e) = self.renderer.select_only(locus) {
            log::warn!("renderer selection update failed: {e}");
        }
    }

    // ── transient channel ──

    /// Request a hover highlight over `positions`.
    ///
    /// A non-empty set is applied after the debounce delay unless another
    /// hover supersedes it first. An empty set clears the highlight
    /// immediately. Repeating the current set is a no-op.
    pub fn set_hover(&mut self, positions: Vec<ResidueRef>) {
        if positions == self.hovered {
            return;
        }
        if let Some(task) = self.hover.cancel() {
            log::trace!("hover task {task:?} cancelled");
        }
        if positions.is_empty() {
            self.hovered.clear();
            self.clear_transient();
            return;
        }
        self.hovered.clone_from(&positions);
        let _ = self.hover.schedule(positions, self.clock.now());
    }

    /// Clear the hover highlight immediately.
    pub fn clear_hover(&mut self) {
        self.set_hover(Vec::new());
    }

    /// Fire the pending hover update if its delay has elapsed. Returns
    /// `true` if a highlight was sent to the renderer.
    pub fn poll(&mut self) -> bool {
        let Some((_, positions)) = self.hover.poll(self.clock.now()) else {
            return false;
        };
        self.apply_transient(merge_positions(&positions))
    }

    fn apply_transient(&mut self, ranges: Vec<ResidueRange>) -> bool {
        let Some(locus) = self.locus_for(&ranges) else {
            // Don't leave the previous hover lit once the pointer moved on.
            if !self.transient.is_empty() {
                self.clear_transient();
            }
            return false;
        };
        self.transient = ranges;
        if let Err(e) = self.renderer.highlight_only(locus) {
            log::warn!("renderer highlight failed: {e}");
        }
        true
    }

    fn clear_transient(&mut self) {
        self.transient.clear();
        if let Err(e) = self.renderer.clear_highlights() {
            log::warn!("clearing renderer highlight failed: {e}");
        }
    }

    // ── focus ──

    /// Point the renderer's camera at `ranges` (sequence space). Returns
    /// `false` if nothing of it is in the 3D view.
    pub fn focus(&mut self, ranges: &[ResidueRange]) -> bool {
        let Some(locus) = self.locus_for(ranges) else {
            return false;
        };
        if let Err(e) = self.renderer.focus(locus) {
            log::warn!("renderer focus failed: {e}");
        }
        true
    }

    /// Sequence-space ranges -> renderer locus, `None` when the renderer
    /// has no structure or nothing maps.
    fn locus_for(&self, ranges: &[ResidueRange]) -> Option<R::Locus> {
        let Some(structure) = self.renderer.try_get_structure() else {
            log::warn!("no structure loaded; skipping renderer update");
            return None;
        };
        let mapped = self.mapper.to_renderer_ranges(structure, ranges);
        if mapped.is_empty() {
            log::warn!("selection does not map onto the loaded structure");
            return None;
        }
        let locus = self.renderer.build_locus(&mapped);
        if locus.is_none() {
            log::warn!("renderer could not build a locus for {} ranges", mapped.len());
        }
        locus
    }
}

#[cfg(test)]
mod tests {
    use super::mock::{MockRenderer, RendererCall};
    use super::*;
    use crate::selection::{Constraints, Region, SelectionMode};

    fn bridge(
        renderer: MockRenderer,
    ) -> (HighlightBridge<MockRenderer>, Rc<ManualClock>) {
        let clock = Rc::new(ManualClock::new());
        let bridge = HighlightBridge::new(
            renderer,
            CoordinateMapper::default(),
            clock.clone(),
            DEFAULT_HOVER_DELAY,
        );
        (bridge, clock)
    }

    fn loaded() -> MockRenderer {
        MockRenderer::with_structure(StructureNumbering::new(vec![
            ChainNumbering::sequential("A", 100),
            ChainNumbering::sequential("B", 50),
        ]))
    }

    fn hover(positions: &[i32]) -> Vec<ResidueRef> {
        positions.iter().map(|&p| ResidueRef::new("A", p)).collect()
    }

    fn selection(regions: Vec<Region>) -> Selection {
        Selection {
            regions,
            mode: SelectionMode::Multiple,
            constraints: Constraints::none(),
        }
    }

    #[test]
    fn rapid_hovers_produce_one_highlight_with_last_data() {
        let (mut bridge, clock) = bridge(loaded());
        for p in 1..=10 {
            bridge.set_hover(hover(&[p]));
            clock.advance(Duration::from_millis(20));
            assert!(!bridge.poll());
        }
        clock.advance(DEFAULT_HOVER_DELAY);
        assert!(bridge.poll());
        assert!(!bridge.poll());

        assert_eq!(
            bridge.renderer_mut().take_calls(),
            vec![RendererCall::HighlightOnly(vec![ResidueRange::new(
                "A", 10, 10
            )])]
        );
    }

    #[test]
    fn hovered_positions_are_merged() {
        let (mut bridge, clock) = bridge(loaded());
        bridge.set_hover(hover(&[10, 11, 13]));
        clock.advance(DEFAULT_HOVER_DELAY);
        assert!(bridge.poll());
        assert_eq!(
            bridge.transient_hover(),
            &[ResidueRange::new("A", 10, 11), ResidueRange::new("A", 13, 13)]
        );
    }

    #[test]
    fn clearing_hover_is_immediate_and_cancels_pending() {
        let (mut bridge, clock) = bridge(loaded());
        bridge.set_hover(hover(&[5]));
        bridge.clear_hover();
        assert!(!bridge.hover_pending());
        assert_eq!(
            bridge.renderer_mut().take_calls(),
            vec![RendererCall::ClearHighlights]
        );

        clock.advance(DEFAULT_HOVER_DELAY * 2);
        assert!(!bridge.poll());
        assert!(bridge.renderer_mut().take_calls().is_empty());
    }

    #[test]
    fn repeating_the_same_hover_does_not_reschedule() {
        let (mut bridge, clock) = bridge(loaded());
        bridge.set_hover(hover(&[5]));
        let deadline = bridge.next_deadline();
        clock.advance(Duration::from_millis(100));
        bridge.set_hover(hover(&[5]));
        assert_eq!(bridge.next_deadline(), deadline);
    }

    #[test]
    fn selection_swaps_whole_renderer_selection() {
        let (mut bridge, _) = bridge(loaded());
        bridge.on_selection_change(&selection(vec![Region::new("A", 1, 5)]));
        bridge.on_selection_change(&selection(vec![Region::new("B", 2, 3)]));
        bridge.on_selection_change(&selection(Vec::new()));
        assert_eq!(
            bridge.renderer_mut().take_calls(),
            vec![
                RendererCall::SelectOnly(vec![ResidueRange::new("A", 1, 5)]),
                RendererCall::SelectOnly(vec![ResidueRange::new("B", 2, 3)]),
                RendererCall::ClearSelections,
            ]
        );
    }

    #[test]
    fn no_structure_is_a_silent_no_op() {
        let (mut bridge, clock) = bridge(MockRenderer::default());
        bridge.on_selection_change(&selection(vec![Region::new("A", 1, 5)]));
        bridge.set_hover(hover(&[1]));
        clock.advance(DEFAULT_HOVER_DELAY);
        assert!(!bridge.poll());
        assert!(!bridge.focus(&[ResidueRange::new("A", 1, 1)]));

        assert!(bridge.renderer().calls.is_empty());
        // Logical state is still tracked.
        assert_eq!(bridge.persistent_selection(), &[ResidueRange::new("A", 1, 5)]);
    }

    #[test]
    fn vanished_chain_is_skipped() {
        let (mut bridge, _) = bridge(loaded());
        bridge.on_selection_change(&selection(vec![
            Region::new("Z", 1, 5),
        ]));
        assert!(bridge.renderer().calls.is_empty());

        bridge.on_selection_change(&selection(vec![
            Region::new("A", 1, 2),
            Region::new("Z", 1, 5),
        ]));
        assert_eq!(
            bridge.renderer_mut().take_calls(),
            vec![RendererCall::SelectOnly(vec![ResidueRange::new("A", 1, 2)])]
        );
    }

    #[test]
    fn renderer_errors_do_not_corrupt_state() {
        let mut renderer = loaded();
        renderer.failing = true;
        let (mut bridge, clock) = bridge(renderer);
        bridge.on_selection_change(&selection(vec![Region::new("A", 1, 5)]));
        bridge.set_hover(hover(&[3]));
        clock.advance(DEFAULT_HOVER_DELAY);
        assert!(bridge.poll());
        assert_eq!(bridge.persistent_selection().len(), 1);
        assert_eq!(bridge.transient_hover().len(), 1);
    }

    #[test]
    fn attach_follows_store_changes() {
        let (bridge, _) = bridge(loaded());
        let bridge = Rc::new(RefCell::new(bridge));
        let mut store = SelectionStore::new(SelectionMode::Range, Constraints::none());
        assert!(store.add_region(Region::new("A", 1, 1)));

        let token = HighlightBridge::attach(&bridge, &mut store);
        assert!(store.add_region(Region::new("A", 4, 6)));
        store.clear_selection();
        assert!(store.unsubscribe(token));
        assert!(store.add_region(Region::new("B", 1, 1)));

        assert_eq!(
            bridge.borrow_mut().renderer_mut().take_calls(),
            vec![
                RendererCall::SelectOnly(vec![ResidueRange::new("A", 1, 1)]),
                RendererCall::SelectOnly(vec![ResidueRange::new("A", 4, 6)]),
                RendererCall::ClearSelections,
            ]
        );
    }

    #[test]
    fn refresh_reapplies_after_structure_reload() {
        let (mut bridge, _) = bridge(MockRenderer::default());
        bridge.on_selection_change(&selection(vec![Region::new("B", 1, 2)]));
        assert!(bridge.renderer().calls.is_empty());

        bridge.renderer_mut().structure =
            Some(StructureNumbering::new(vec![ChainNumbering::sequential("B", 9)]));
        bridge.refresh();
        assert_eq!(
            bridge.renderer_mut().take_calls(),
            vec![RendererCall::SelectOnly(vec![ResidueRange::new("B", 1, 2)])]
        );
    }

    #[test]
    fn refresh_leaves_pending_hover_to_poll() {
        let (mut bridge, clock) = bridge(loaded());
        bridge.set_hover(hover(&[5]));
        clock.advance(DEFAULT_HOVER_DELAY);
        assert!(bridge.poll());
        let _ = bridge.renderer_mut().take_calls();

        bridge.set_hover(hover(&[6]));
        bridge.refresh();
        clock.advance(DEFAULT_HOVER_DELAY);
        assert!(bridge.poll());

        let highlights: Vec<_> = bridge
            .renderer_mut()
            .take_calls()
            .into_iter()
            .filter(|c| matches!(c, RendererCall::HighlightOnly(_)))
            .collect();
        assert_eq!(
            highlights,
            vec![RendererCall::HighlightOnly(vec![ResidueRange::new("A", 6, 6)])]
        );
    }

    #[test]
    fn refresh_reapplies_shown_hover() {
        let (mut bridge, clock) = bridge(loaded());
        bridge.set_hover(hover(&[5]));
        clock.advance(DEFAULT_HOVER_DELAY);
        assert!(bridge.poll());
        let _ = bridge.renderer_mut().take_calls();

        bridge.refresh();
        assert_eq!(
            bridge.renderer_mut().take_calls(),
            vec![
                RendererCall::ClearSelections,
                RendererCall::HighlightOnly(vec![ResidueRange::new("A", 5, 5)]),
            ]
        );
    }

    #[test]
    fn unmapped_hover_clears_stale_highlight() {
        let renderer = MockRenderer::with_structure(StructureNumbering::new(
            vec![ChainNumbering::sequential("A", 10)],
        ));
        let (mut bridge, clock) = bridge(renderer);
        bridge.set_hover(hover(&[5]));
        clock.advance(DEFAULT_HOVER_DELAY);
        assert!(bridge.poll());
        let _ = bridge.renderer_mut().take_calls();

        bridge.set_hover(hover(&[20]));
        clock.advance(DEFAULT_HOVER_DELAY);
        assert!(!bridge.poll());
        assert!(bridge.transient_hover().is_empty());
        assert_eq!(
            bridge.renderer_mut().take_calls(),
            vec![RendererCall::ClearHighlights]
        );
    }

    #[test]
    fn author_numbering_reaches_renderer() {
        let renderer = MockRenderer::with_structure(StructureNumbering::new(
            vec![ChainNumbering::with_offset("A", "H", 30, 100)],
        ));
        let (mut bridge, _) = bridge(renderer);
        bridge.set_mapper(CoordinateMapper::new(NumberingScheme::Author));
        bridge.on_selection_change(&selection(vec![Region::new("A", 2, 4)]));
        assert_eq!(
            bridge.renderer_mut().take_calls().last(),
            Some(&RendererCall::SelectOnly(vec![ResidueRange::new(
                "H", 102, 104
            )]))
        );
    }
}
