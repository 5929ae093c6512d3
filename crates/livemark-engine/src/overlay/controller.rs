use crate::{
    editing::{Document, Transaction},
    geometry::{LayoutQuery, Rect, ScrollOffset, ViewportPoint},
    parsing::blocks::Block,
    preview::BlockHighlights,
    view::{ViewPlugin, ViewUpdate},
};

use super::{
    drag_select::{AutoScrollHandle, DragSelectionSession, auto_scroll_delta},
    edits::{delete_blocks, insert_line_after},
    handles::{Handle, HandlePart, HandleReconcile, HandleSet},
    options::OverlayOptions,
    selection::SelectedBlockSet,
};

/// What the overlay needs to know about the surface for one event.
#[derive(Clone, Copy)]
pub struct OverlayContext<'a> {
    pub doc: &'a Document,
    pub blocks: &'a [Block],
    pub layout: &'a dyn LayoutQuery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayKey {
    Backspace,
    Delete,
    Escape,
}

/// Input events, all in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OverlayEvent {
    PointerMove(ViewportPoint),
    PointerDown(ViewportPoint),
    PointerUp(ViewportPoint),
    PointerLeave,
    AutoScrollTick(AutoScrollHandle),
    Key(OverlayKey),
}

/// Payload announced when a block drag starts from a grip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragStartNotice {
    /// The block whose grip was dragged.
    pub block_index: usize,
    /// Every dragged block: the whole selection when the grip's block is part
    /// of a multi-selection, otherwise just that block.
    pub block_indices: Vec<usize>,
    pub blocks: Vec<Block>,
    /// Document version the indices refer to.
    pub version: u64,
}

/// Side effects for the host to carry out.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayEffect {
    Dispatch(Transaction),
    StartAutoScroll {
        handle: AutoScrollHandle,
        interval_ms: u64,
    },
    StopAutoScroll(AutoScrollHandle),
    ScrollTo(ScrollOffset),
    DragStart(DragStartNotice),
    /// The drag ended over `target`: drop in front of that block, or at the
    /// end of the document for `None`.
    DragEnd {
        notice: DragStartNotice,
        target: Option<usize>,
    },
    /// Selected or pending blocks changed; decorations need a refresh.
    HighlightsChanged,
}

#[derive(Debug, Default, PartialEq)]
pub struct OverlayOutcome {
    /// Whether the event should not reach the text surface.
    pub consumed: bool,
    pub effects: Vec<OverlayEffect>,
}

impl OverlayOutcome {
    fn consumed(effects: Vec<OverlayEffect>) -> Self {
        Self {
            consumed: true,
            effects,
        }
    }

    fn passed(effects: Vec<OverlayEffect>) -> Self {
        Self {
            consumed: false,
            effects,
        }
    }
}

/// Where a pointer-down landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    Handle(usize, HandlePart),
    /// Left of, right of, or below the content box.
    Margin,
    /// A host region (title, description) the overlay ignores.
    Excluded,
    Content,
}

#[derive(Debug, Clone, PartialEq)]
enum GripState {
    Idle,
    Pressed { block: usize, at: ViewportPoint },
    Dragging(DragStartNotice),
}

/// Block handles, hover, selection and drag state for one editor.
#[derive(Debug)]
pub struct BlockOverlay {
    options: OverlayOptions,
    handles: HandleSet,
    last_reconcile: HandleReconcile,
    selection: SelectedBlockSet,
    hovered: Option<usize>,
    session: Option<DragSelectionSession>,
    grip: GripState,
    excluded: Vec<Rect>,
    next_timer: u64,
}

impl BlockOverlay {
    pub fn new(options: OverlayOptions) -> Self {
        Self {
            options,
            handles: HandleSet::default(),
            last_reconcile: HandleReconcile::default(),
            selection: SelectedBlockSet::new(),
            hovered: None,
            session: None,
            grip: GripState::Idle,
            excluded: Vec::new(),
            next_timer: 0,
        }
    }

    pub fn options(&self) -> &OverlayOptions {
        &self.options
    }

    /// Viewport regions (title, description) where pointer-downs never start
    /// a drag selection.
    pub fn set_excluded_regions(&mut self, regions: Vec<Rect>) {
        self.excluded = regions;
    }

    pub fn selection(&self) -> &SelectedBlockSet {
        &self.selection
    }

    pub fn pending(&self) -> &[usize] {
        self.session
            .as_ref()
            .map(|s| s.pending.as_slice())
            .unwrap_or(&[])
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn is_drag_selecting(&self) -> bool {
        self.session.is_some()
    }

    pub fn last_reconcile(&self) -> &HandleReconcile {
        &self.last_reconcile
    }

    pub fn highlights<'a>(&'a self, blocks: &'a [Block]) -> BlockHighlights<'a> {
        BlockHighlights {
            blocks,
            selected: self.selection.as_slice(),
            pending: self.pending(),
        }
    }

    /// A handle is shown for the hovered block and every selected or pending one.
    pub fn is_shown(&self, block: usize) -> bool {
        self.hovered == Some(block)
            || self.selection.contains(block)
            || self.pending().contains(&block)
    }

    pub fn shown_handles(&self) -> impl Iterator<Item = &Handle> {
        self.handles.iter().filter(|h| self.is_shown(h.block_index))
    }

    /// The block holding the caret.
    pub fn cursor_block(doc: &Document, blocks: &[Block]) -> Option<usize> {
        let caret = doc.caret();
        blocks.iter().position(|b| b.contains_offset(caret))
    }

    pub fn classify(&self, point: ViewportPoint, ctx: &OverlayContext<'_>) -> PointerTarget {
        let layout = ctx.layout;
        if let Some((block, part)) =
            self.handles
                .hit(point, |i| self.is_shown(i), layout, &self.options)
        {
            return PointerTarget::Handle(block, part);
        }
        if self.excluded.iter().any(|r| r.contains(point.x, point.y)) {
            return PointerTarget::Excluded;
        }
        let content = layout.content_box();
        let tol = self.options.margin_tolerance;
        let doc_y = point.to_document(layout.scroll()).y;
        if point.x < content.left - tol || point.x > content.right + tol || doc_y > content.bottom + tol {
            PointerTarget::Margin
        } else {
            PointerTarget::Content
        }
    }

    pub fn handle(&mut self, event: OverlayEvent, ctx: &OverlayContext<'_>) -> OverlayOutcome {
        match event {
            OverlayEvent::PointerMove(point) => self.pointer_move(point, ctx),
            OverlayEvent::PointerDown(point) => self.pointer_down(point, ctx),
            OverlayEvent::PointerUp(point) => self.pointer_up(point, ctx),
            OverlayEvent::PointerLeave => {
                self.hovered = None;
                OverlayOutcome::default()
            }
            OverlayEvent::AutoScrollTick(handle) => self.auto_scroll_tick(handle, ctx),
            OverlayEvent::Key(key) => self.key(key, ctx),
        }
    }

    /// Selects exactly `block`.
    pub fn click_handle(&mut self, block: usize) -> Vec<OverlayEffect> {
        if self.selection.as_slice() == [block] {
            return vec![];
        }
        self.selection.select_single(block);
        log::debug!("selected block {block}");
        vec![OverlayEffect::HighlightsChanged]
    }

    /// The add button: an empty line after `block`, caret on it.
    pub fn add_block(&mut self, block: usize, ctx: &OverlayContext<'_>) -> Vec<OverlayEffect> {
        match ctx.blocks.get(block) {
            Some(b) => vec![OverlayEffect::Dispatch(insert_line_after(b))],
            None => vec![],
        }
    }

    pub fn start_block_drag(&mut self, block: usize, ctx: &OverlayContext<'_>) -> Vec<OverlayEffect> {
        if block >= ctx.blocks.len() {
            return vec![];
        }
        let block_indices = if self.selection.len() > 1 && self.selection.contains(block) {
            self.selection.as_slice().to_vec()
        } else {
            vec![block]
        };
        let notice = DragStartNotice {
            block_index: block,
            blocks: block_indices
                .iter()
                .filter_map(|&i| ctx.blocks.get(i).copied())
                .collect(),
            block_indices,
            version: ctx.doc.version(),
        };
        log::debug!("block drag started: {:?}", notice.block_indices);
        self.grip = GripState::Dragging(notice.clone());
        vec![OverlayEffect::DragStart(notice)]
    }

    pub fn end_block_drag(&mut self, target: Option<usize>) -> Vec<OverlayEffect> {
        match std::mem::replace(&mut self.grip, GripState::Idle) {
            GripState::Dragging(notice) => vec![OverlayEffect::DragEnd { notice, target }],
            _ => vec![],
        }
    }

    /// Clears the committed selection. Idempotent.
    pub fn clear_selection(&mut self) -> Vec<OverlayEffect> {
        if self.selection.clear() {
            vec![OverlayEffect::HighlightsChanged]
        } else {
            vec![]
        }
    }

    /// Ends a drag-selection session without committing it. Idempotent.
    pub fn end_session(&mut self) -> Vec<OverlayEffect> {
        match self.session.take() {
            Some(s) => {
                let mut effects = vec![OverlayEffect::StopAutoScroll(s.auto_scroll)];
                if !s.pending.is_empty() {
                    effects.push(OverlayEffect::HighlightsChanged);
                }
                effects
            }
            None => vec![],
        }
    }

    fn pointer_move(&mut self, point: ViewportPoint, ctx: &OverlayContext<'_>) -> OverlayOutcome {
        let layout = ctx.layout;
        let doc_y = point.to_document(layout.scroll()).y;
        self.hovered = ctx.blocks.iter().position(|b| layout.band(b).contains(doc_y));

        if let Some(session) = self.session.as_mut() {
            let changed = session.update(point, layout.scroll(), ctx.blocks, layout);
            let effects = if changed {
                vec![OverlayEffect::HighlightsChanged]
            } else {
                vec![]
            };
            return OverlayOutcome::consumed(effects);
        }

        if let GripState::Pressed { block, at } = self.grip {
            let dist = (point.x - at.x).hypot(point.y - at.y);
            if dist >= self.options.drag_threshold {
                return OverlayOutcome::consumed(self.start_block_drag(block, ctx));
            }
            return OverlayOutcome::consumed(vec![]);
        }

        OverlayOutcome::default()
    }

    fn pointer_down(&mut self, point: ViewportPoint, ctx: &OverlayContext<'_>) -> OverlayOutcome {
        // A new press supersedes any running session and its timer.
        let mut effects = self.end_session();
        self.grip = GripState::Idle;

        match self.classify(point, ctx) {
            PointerTarget::Handle(block, HandlePart::Body) => {
                effects.extend(self.click_handle(block));
                OverlayOutcome::consumed(effects)
            }
            PointerTarget::Handle(block, HandlePart::AddButton) => {
                effects.extend(self.add_block(block, ctx));
                OverlayOutcome::consumed(effects)
            }
            PointerTarget::Handle(block, HandlePart::Grip) => {
                self.grip = GripState::Pressed { block, at: point };
                OverlayOutcome::consumed(effects)
            }
            PointerTarget::Margin => {
                effects.extend(self.clear_selection());
                self.next_timer += 1;
                let handle = AutoScrollHandle(self.next_timer);
                self.session = Some(DragSelectionSession::new(point, ctx.layout.scroll(), handle));
                log::debug!("drag selection started at {point:?}");
                effects.push(OverlayEffect::StartAutoScroll {
                    handle,
                    interval_ms: self.options.tick_interval_ms,
                });
                OverlayOutcome::consumed(effects)
            }
            PointerTarget::Content => {
                effects.extend(self.clear_selection());
                OverlayOutcome::passed(effects)
            }
            PointerTarget::Excluded => OverlayOutcome::passed(effects),
        }
    }

    fn pointer_up(&mut self, point: ViewportPoint, ctx: &OverlayContext<'_>) -> OverlayOutcome {
        if let Some(session) = self.session.take() {
            let mut effects = vec![OverlayEffect::StopAutoScroll(session.auto_scroll)];
            if !session.pending.is_empty() {
                log::debug!("drag selection committed: {:?}", session.pending);
                self.selection.replace(session.pending);
                effects.push(OverlayEffect::HighlightsChanged);
            }
            return OverlayOutcome::consumed(effects);
        }

        match std::mem::replace(&mut self.grip, GripState::Idle) {
            GripState::Pressed { .. } => OverlayOutcome::consumed(vec![]),
            GripState::Dragging(notice) => {
                let target = self.drop_target(point, ctx);
                log::debug!("block drag ended over {target:?}");
                OverlayOutcome::consumed(vec![OverlayEffect::DragEnd { notice, target }])
            }
            GripState::Idle => OverlayOutcome::default(),
        }
    }

    fn auto_scroll_tick(&mut self, handle: AutoScrollHandle, ctx: &OverlayContext<'_>) -> OverlayOutcome {
        let Some(session) = self.session.as_mut() else {
            return OverlayOutcome::default();
        };
        if session.auto_scroll != handle {
            return OverlayOutcome::default();
        }
        let layout = ctx.layout;
        let dy = auto_scroll_delta(session.last.y, layout.viewport_height(), &self.options);
        let current = layout.scroll();
        let next = current.scrolled_by(dy, layout.max_scroll());
        if next == current {
            return OverlayOutcome::consumed(vec![]);
        }
        log::trace!("auto-scroll {dy:+.1} to {}", next.top);
        let mut effects = vec![OverlayEffect::ScrollTo(next)];
        let last = session.last;
        if session.update(last, next, ctx.blocks, layout) {
            effects.push(OverlayEffect::HighlightsChanged);
        }
        OverlayOutcome::consumed(effects)
    }

    fn key(&mut self, key: OverlayKey, ctx: &OverlayContext<'_>) -> OverlayOutcome {
        if self.selection.is_empty() {
            return OverlayOutcome::default();
        }
        match key {
            OverlayKey::Backspace | OverlayKey::Delete => {
                let mut effects = Vec::new();
                if let Some(tx) = delete_blocks(ctx.doc, ctx.blocks, self.selection.as_slice()) {
                    log::debug!("deleting blocks {:?}", self.selection.as_slice());
                    effects.push(OverlayEffect::Dispatch(tx));
                }
                effects.extend(self.clear_selection());
                OverlayOutcome::consumed(effects)
            }
            OverlayKey::Escape => OverlayOutcome::consumed(self.clear_selection()),
        }
    }

    /// The block a drop at `point` lands in front of.
    fn drop_target(&self, point: ViewportPoint, ctx: &OverlayContext<'_>) -> Option<usize> {
        let layout = ctx.layout;
        let y = point.to_document(layout.scroll()).y;
        let first_band = ctx.blocks.first().map(|b| layout.band(b))?;
        if y < first_band.top {
            return Some(0);
        }
        let Some(index) = ctx.blocks.iter().position(|b| layout.band(b).contains(y)) else {
            // Between bands: in front of the next block down.
            return ctx.blocks.iter().position(|b| layout.band(b).top > y);
        };
        let band = layout.band(&ctx.blocks[index]);
        if y <= band.center() {
            Some(index)
        } else {
            Some(index + 1).filter(|&i| i < ctx.blocks.len())
        }
    }
}

impl ViewPlugin for BlockOverlay {
    type Effect = OverlayEffect;

    /// Render pass: text changes invalidate block indices, so selection,
    /// hover and any in-flight session are dropped before handles are
    /// reconciled.
    fn update(&mut self, update: &ViewUpdate<'_>) -> Vec<OverlayEffect> {
        let mut effects = Vec::new();
        if update.doc_changed() {
            effects.extend(self.end_session());
            effects.extend(self.clear_selection());
            self.hovered = None;
            self.grip = GripState::Idle;
        }
        if update.doc_changed() || update.viewport_changed || update.is_initial() {
            self.last_reconcile = self.handles.reconcile(update.blocks, update.layout);
            log::trace!(
                "handles: +{} ={} -{}",
                self.last_reconcile.added.len(),
                self.last_reconcile.kept.len(),
                self.last_reconcile.removed.len()
            );
        }
        effects
    }

    fn destroy(&mut self) -> Vec<OverlayEffect> {
        let mut effects = self.end_session();
        self.selection.clear();
        self.handles.clear();
        self.grip = GripState::Idle;
        effects.retain(|e| matches!(e, OverlayEffect::StopAutoScroll(_)));
        effects
    }
}
