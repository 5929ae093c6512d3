//! # View host
//!
//! [`ViewPlugin`] is the lifecycle every editor layer implements: constructed
//! once per editor, updated after every document, selection or viewport
//! change, destroyed with the editor. [`LiveEditor`] owns the document and
//! one instance of each plugin and fans updates out in a fixed order:
//! overlay first, then the preview (so it sees the overlay's current
//! highlights), then the slash menu.

use crate::{
    editing::{Cmd, Document, EditError, Patch, Transaction, compile_command},
    geometry::LayoutQuery,
    overlay::{
        BlockMover, BlockOverlay, DragStartNotice, OverlayContext, OverlayEffect, OverlayEvent,
        OverlayOptions,
    },
    parsing::{
        blocks::{Block, ParseOptions},
        parse_lines,
    },
    preview::{BlockHighlights, DecorationSet, LivePreview, WidgetKind, toggle_checkbox},
    slash::{SlashEffect, SlashKey, SlashMenu, SlashMenuOptions},
};

/// Everything a plugin sees on one update. Block indices are only valid for
/// this snapshot.
#[derive(Clone, Copy)]
pub struct ViewUpdate<'a> {
    pub doc: &'a Document,
    pub blocks: &'a [Block],
    pub layout: &'a dyn LayoutQuery,
    /// The dispatch that triggered this update, if any.
    pub patch: Option<&'a Patch>,
    pub viewport_changed: bool,
    pub highlights: BlockHighlights<'a>,
    initial: bool,
}

impl<'a> ViewUpdate<'a> {
    /// The first update after a plugin is created.
    pub fn initial(doc: &'a Document, blocks: &'a [Block], layout: &'a dyn LayoutQuery) -> Self {
        Self {
            doc,
            blocks,
            layout,
            patch: None,
            viewport_changed: false,
            highlights: BlockHighlights::default(),
            initial: true,
        }
    }

    pub fn after_patch(
        doc: &'a Document,
        blocks: &'a [Block],
        layout: &'a dyn LayoutQuery,
        patch: &'a Patch,
    ) -> Self {
        Self {
            patch: Some(patch),
            initial: false,
            ..Self::initial(doc, blocks, layout)
        }
    }

    /// Scroll or resize without a document change.
    pub fn viewport(doc: &'a Document, blocks: &'a [Block], layout: &'a dyn LayoutQuery) -> Self {
        Self {
            viewport_changed: true,
            initial: false,
            ..Self::initial(doc, blocks, layout)
        }
    }

    pub fn with_highlights(self, highlights: BlockHighlights<'a>) -> Self {
        Self { highlights, ..self }
    }

    pub fn doc_changed(&self) -> bool {
        self.patch.is_some_and(|p| p.doc_changed)
    }

    pub fn is_initial(&self) -> bool {
        self.initial
    }
}

/// An editor layer. Construction is the create hook.
pub trait ViewPlugin {
    /// What the plugin asks its host to do.
    type Effect;

    fn update(&mut self, update: &ViewUpdate<'_>) -> Vec<Self::Effect>;

    /// Called once when the editor goes away; returns cleanup effects such as
    /// stopping timers.
    fn destroy(&mut self) -> Vec<Self::Effect> {
        Vec::new()
    }
}

/// Plugin options for one editor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditorOptions {
    pub parser: ParseOptions,
    pub overlay: OverlayOptions,
    pub slash_menu: SlashMenuOptions,
    /// Decorate only the visible lines.
    pub viewport_only: bool,
}

/// Effects the host carries out. Transactions are never returned: the editor
/// dispatches them itself.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEffect {
    Overlay(OverlayEffect),
    Slash(SlashEffect),
}

#[derive(Debug, Default, PartialEq)]
pub struct EditorOutcome {
    /// Whether the input should not reach the text surface.
    pub consumed: bool,
    pub effects: Vec<EditorEffect>,
}

#[derive(Clone, Copy)]
enum Cause<'p> {
    Initial,
    Patch(&'p Patch),
    Viewport,
}

/// A document with live preview, block overlay and slash menu attached.
pub struct LiveEditor {
    doc: Document,
    blocks: Vec<Block>,
    parser: ParseOptions,
    preview: LivePreview,
    overlay: BlockOverlay,
    slash: SlashMenu,
    mover: BlockMover,
}

impl LiveEditor {
    /// Creates the editor and runs the initial render.
    pub fn new(text: &str, options: EditorOptions, layout: &dyn LayoutQuery) -> Self {
        let doc = Document::new(text);
        let blocks = parse_lines(doc.lines(), options.parser);
        let mut editor = Self {
            doc,
            blocks,
            parser: options.parser,
            preview: LivePreview::new(options.viewport_only),
            overlay: BlockOverlay::new(options.overlay),
            slash: SlashMenu::new(options.slash_menu),
            mover: BlockMover,
        };
        // Nothing is in flight yet, so the initial pass has no effects.
        let _ = editor.fan_out(Cause::Initial, layout);
        editor
    }

    pub fn doc(&self) -> &Document {
        &self.doc
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn decorations(&self) -> &DecorationSet {
        self.preview.decorations()
    }

    pub fn overlay(&self) -> &BlockOverlay {
        &self.overlay
    }

    pub fn slash(&self) -> &SlashMenu {
        &self.slash
    }

    /// Applies `tx` and updates every plugin. Follow-up transactions the
    /// plugins emit are dispatched in turn.
    pub fn dispatch(
        &mut self,
        tx: Transaction,
        layout: &dyn LayoutQuery,
    ) -> Result<Vec<EditorEffect>, EditError> {
        let patch = self.doc.dispatch(tx)?;
        if patch.doc_changed {
            self.blocks = parse_lines(self.doc.lines(), self.parser);
            log::trace!("reparsed: {} blocks", self.blocks.len());
        }
        let effects = self.fan_out(Cause::Patch(&patch), layout);
        self.carry_out(effects, layout)
    }

    pub fn apply(&mut self, cmd: Cmd, layout: &dyn LayoutQuery) -> Result<Vec<EditorEffect>, EditError> {
        let tx = compile_command(&self.doc, &cmd);
        self.dispatch(tx, layout)
    }

    /// Scroll or resize.
    pub fn viewport_changed(&mut self, layout: &dyn LayoutQuery) -> Result<Vec<EditorEffect>, EditError> {
        let effects = self.fan_out(Cause::Viewport, layout);
        self.carry_out(effects, layout)
    }

    pub fn overlay_event(
        &mut self,
        event: OverlayEvent,
        layout: &dyn LayoutQuery,
    ) -> Result<EditorOutcome, EditError> {
        let ctx = OverlayContext {
            doc: &self.doc,
            blocks: &self.blocks,
            layout,
        };
        let outcome = self.overlay.handle(event, &ctx);
        let effects = outcome.effects.into_iter().map(EditorEffect::Overlay).collect();
        Ok(EditorOutcome {
            consumed: outcome.consumed,
            effects: self.carry_out(effects, layout)?,
        })
    }

    /// A key press while the slash menu may be open.
    pub fn slash_key(&mut self, key: SlashKey, layout: &dyn LayoutQuery) -> Result<EditorOutcome, EditError> {
        let outcome = self.slash.handle_key(key, &self.doc);
        let effects = outcome.effects.into_iter().map(EditorEffect::Slash).collect();
        Ok(EditorOutcome {
            consumed: outcome.consumed,
            effects: self.carry_out(effects, layout)?,
        })
    }

    /// A click on the slash menu entry at `index` of the filtered list.
    pub fn slash_click(&mut self, index: usize, layout: &dyn LayoutQuery) -> Result<Vec<EditorEffect>, EditError> {
        let effects = self.slash.commit(index, &self.doc);
        self.carry_out(effects.into_iter().map(EditorEffect::Slash).collect(), layout)
    }

    pub fn slash_pointer_over(&mut self, over: bool) {
        self.slash.set_pointer_over(over);
    }

    pub fn blur(&mut self) -> Vec<EditorEffect> {
        self.slash.blur().into_iter().map(EditorEffect::Slash).collect()
    }

    pub fn focus(&mut self) {
        self.slash.focus();
    }

    pub fn blur_elapsed(&mut self, token: u64) -> Vec<EditorEffect> {
        self.slash
            .blur_elapsed(token)
            .into_iter()
            .map(EditorEffect::Slash)
            .collect()
    }

    /// A click at document offset `pos`: toggles the checkbox widget there.
    /// Returns `None` when there is no checkbox at `pos`.
    pub fn click_widget(
        &mut self,
        pos: usize,
        layout: &dyn LayoutQuery,
    ) -> Result<Option<Vec<EditorEffect>>, EditError> {
        let tx = match self.preview.decorations().widget_at(pos) {
            Some((_, WidgetKind::Checkbox { marker, .. })) => toggle_checkbox(&self.doc, marker),
            _ => None,
        };
        match tx {
            Some(tx) => self.dispatch(tx, layout).map(Some),
            None => Ok(None),
        }
    }

    /// Moves the block holding the caret one block up or down.
    pub fn move_cursor_block(&mut self, up: bool, layout: &dyn LayoutQuery) -> Result<Vec<EditorEffect>, EditError> {
        let Some(index) = BlockOverlay::cursor_block(&self.doc, &self.blocks) else {
            return Ok(vec![]);
        };
        let target = if up {
            match index.checked_sub(1) {
                Some(t) => Some(t),
                None => return Ok(vec![]),
            }
        } else {
            if index + 1 >= self.blocks.len() {
                return Ok(vec![]);
            }
            Some(index + 2).filter(|&t| t < self.blocks.len())
        };
        let notice = DragStartNotice {
            block_index: index,
            block_indices: vec![index],
            blocks: vec![self.blocks[index]],
            version: self.doc.version(),
        };
        match self.mover.drop_at(&self.doc, &self.blocks, &notice, target) {
            Some(tx) => self.dispatch(tx, layout),
            None => Ok(vec![]),
        }
    }

    /// Tears the plugins down; the host should carry out the returned effects.
    pub fn destroy(&mut self) -> Vec<EditorEffect> {
        let mut effects: Vec<EditorEffect> = self
            .overlay
            .destroy()
            .into_iter()
            .map(EditorEffect::Overlay)
            .collect();
        for never in self.preview.destroy() {
            match never {}
        }
        effects.extend(self.slash.destroy().into_iter().map(EditorEffect::Slash));
        effects
    }

    fn fan_out(&mut self, cause: Cause<'_>, layout: &dyn LayoutQuery) -> Vec<EditorEffect> {
        let Self {
            doc,
            blocks,
            preview,
            overlay,
            slash,
            ..
        } = self;
        let update = match cause {
            Cause::Initial => ViewUpdate::initial(doc, blocks, layout),
            Cause::Patch(patch) => ViewUpdate::after_patch(doc, blocks, layout, patch),
            Cause::Viewport => ViewUpdate::viewport(doc, blocks, layout),
        };
        let mut effects: Vec<EditorEffect> = overlay
            .update(&update)
            .into_iter()
            .map(EditorEffect::Overlay)
            .collect();
        let highlighted = update.with_highlights(overlay.highlights(update.blocks));
        for never in preview.update(&highlighted) {
            match never {}
        }
        effects.extend(slash.update(&update).into_iter().map(EditorEffect::Slash));
        effects
    }

    /// Re-renders decorations after the overlay's highlights changed.
    fn refresh_preview(&mut self, layout: &dyn LayoutQuery) {
        let update = ViewUpdate {
            initial: false,
            ..ViewUpdate::initial(&self.doc, &self.blocks, layout)
        }
        .with_highlights(self.overlay.highlights(&self.blocks));
        for never in self.preview.update(&update) {
            match never {}
        }
    }

    /// Dispatches the transactions among `effects` and completes block drops;
    /// returns what is left for the host.
    fn carry_out(
        &mut self,
        effects: Vec<EditorEffect>,
        layout: &dyn LayoutQuery,
    ) -> Result<Vec<EditorEffect>, EditError> {
        let mut rest = Vec::with_capacity(effects.len());
        for effect in effects {
            match effect {
                EditorEffect::Overlay(OverlayEffect::Dispatch(tx))
                | EditorEffect::Slash(SlashEffect::Dispatch(tx)) => {
                    rest.extend(self.dispatch(tx, layout)?);
                }
                EditorEffect::Overlay(OverlayEffect::DragEnd { notice, target }) => {
                    if let Some(tx) = self.mover.drop_at(&self.doc, &self.blocks, &notice, target) {
                        rest.extend(self.dispatch(tx, layout)?);
                    }
                    rest.push(EditorEffect::Overlay(OverlayEffect::DragEnd { notice, target }));
                }
                EditorEffect::Overlay(OverlayEffect::HighlightsChanged) => {
                    self.refresh_preview(layout);
                    rest.push(effect);
                }
                other => rest.push(other),
            }
        }
        Ok(rest)
    }
}
