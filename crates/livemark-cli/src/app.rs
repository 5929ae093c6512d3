use anyhow::{Context, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use livemark_engine::{
    editing::{Cmd, Document, Transaction},
    geometry::ViewportPoint,
    overlay::{AutoScrollHandle, OverlayEffect, OverlayEvent, OverlayKey},
    slash::{SlashEffect, SlashKey},
    view::{EditorEffect, EditorOptions, LiveEditor},
};
use ratatui::{
    layout::{Position, Rect},
    widgets::ListState,
};
use std::{
    collections::VecDeque,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use crate::{
    layout::{GUTTER_WIDTH, TerminalLayout},
    ui,
};

const WHEEL_ROWS: f64 = 3.0;

#[derive(Debug, Clone, Copy)]
struct Timer<T> {
    id: T,
    due: Instant,
    every: Option<Duration>,
}

pub struct App {
    pub editor: LiveEditor,
    pub layout: TerminalLayout,
    pub status: String,
    pub menu_state: ListState,
    pub popup_area: Option<Rect>,
    pub quit: bool,
    path: PathBuf,
    saved_version: u64,
    editor_area: Rect,
    auto_scroll: Option<Timer<AutoScrollHandle>>,
    blur_close: Option<Timer<u64>>,
}

impl App {
    pub fn new(path: PathBuf, text: &str, options: EditorOptions) -> Self {
        let layout = TerminalLayout::new(text.split('\n').count());
        let editor = LiveEditor::new(text, options, &layout);
        Self {
            saved_version: editor.doc().version(),
            editor,
            layout,
            status: String::new(),
            menu_state: ListState::default(),
            popup_area: None,
            quit: false,
            path,
            editor_area: Rect::default(),
            auto_scroll: None,
            blur_close: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_dirty(&self) -> bool {
        self.editor.doc().version() != self.saved_version
    }

    pub fn save(&mut self) -> Result<()> {
        std::fs::write(&self.path, self.editor.doc().to_bytes())
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        self.saved_version = self.editor.doc().version();
        self.status = format!("Saved {}", self.path.display());
        log::info!("saved {}", self.path.display());
        Ok(())
    }

    /// Called before every draw with the area the text and gutter get.
    pub fn resize(&mut self, area: Rect) -> Result<()> {
        self.editor_area = area;
        if self.layout.resize(area.width, area.height) {
            let effects = self.editor.viewport_changed(&self.layout)?;
            self.finish(effects, false)?;
        }
        Ok(())
    }

    /// The earliest pending timer.
    pub fn next_deadline(&self) -> Option<Instant> {
        let scroll = self.auto_scroll.map(|t| t.due);
        let blur = self.blur_close.map(|t| t.due);
        scroll.into_iter().chain(blur).min()
    }

    pub fn on_tick(&mut self, now: Instant) -> Result<()> {
        if let Some(timer) = self.auto_scroll.as_mut()
            && timer.due <= now
        {
            timer.due = now + timer.every.unwrap_or_default();
            let handle = timer.id;
            let out = self
                .editor
                .overlay_event(OverlayEvent::AutoScrollTick(handle), &self.layout)?;
            self.finish(out.effects, false)?;
        }
        if let Some(timer) = self.blur_close.take_if(|t| t.due <= now) {
            let effects = self.editor.blur_elapsed(timer.id);
            self.finish(effects, false)?;
        }
        Ok(())
    }

    pub fn on_blur(&mut self) -> Result<()> {
        let effects = self.editor.blur();
        self.finish(effects, false)
    }

    pub fn on_focus(&mut self) {
        self.blur_close = None;
        self.editor.focus();
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);
        match key.code {
            KeyCode::Char('q') if ctrl => {
                self.quit = true;
                return Ok(());
            }
            KeyCode::Char('s') if ctrl => return self.save(),
            KeyCode::Up | KeyCode::Down if alt => {
                let effects = self
                    .editor
                    .move_cursor_block(key.code == KeyCode::Up, &self.layout)?;
                return self.finish(effects, true);
            }
            _ => {}
        }

        if self.editor.slash().is_open() {
            let slash_key = match key.code {
                KeyCode::Up => SlashKey::ArrowUp,
                KeyCode::Down => SlashKey::ArrowDown,
                KeyCode::Enter => SlashKey::Enter,
                KeyCode::Tab => SlashKey::Tab,
                KeyCode::Esc => SlashKey::Escape,
                KeyCode::Backspace => SlashKey::Backspace,
                _ => SlashKey::Other,
            };
            let out = self.editor.slash_key(slash_key, &self.layout)?;
            self.finish(out.effects, true)?;
            if out.consumed {
                return Ok(());
            }
        }

        let overlay_key = match key.code {
            KeyCode::Backspace => Some(OverlayKey::Backspace),
            KeyCode::Delete => Some(OverlayKey::Delete),
            KeyCode::Esc => Some(OverlayKey::Escape),
            _ => None,
        };
        if let Some(overlay_key) = overlay_key {
            let out = self
                .editor
                .overlay_event(OverlayEvent::Key(overlay_key), &self.layout)?;
            self.finish(out.effects, true)?;
            if out.consumed {
                return Ok(());
            }
        }

        self.edit_key(key.code, ctrl)
    }

    fn edit_key(&mut self, code: KeyCode, ctrl: bool) -> Result<()> {
        let doc = self.editor.doc();
        let caret = doc.caret();
        let selection = doc.selection();
        let selected = selection.start.min(selection.end)..selection.start.max(selection.end);
        let insert = |text: String| {
            if selected.is_empty() {
                Cmd::InsertText { at: caret, text }
            } else {
                Cmd::ReplaceRange {
                    range: selected.clone(),
                    text,
                }
            }
        };
        let cmd = match code {
            KeyCode::Char(c) if !ctrl => Some(insert(c.to_string())),
            KeyCode::Tab => Some(insert("  ".to_string())),
            KeyCode::Enter => Some(Cmd::SplitLine { at: caret }),
            KeyCode::Backspace if !selected.is_empty() => Some(Cmd::DeleteRange {
                range: selected.clone(),
            }),
            KeyCode::Backspace => Some(Cmd::DeleteBackward { at: caret }),
            KeyCode::Delete if !selected.is_empty() => Some(Cmd::DeleteRange {
                range: selected.clone(),
            }),
            KeyCode::Delete => Some(Cmd::DeleteForward { at: caret }),
            _ => None,
        };
        if let Some(cmd) = cmd {
            let effects = self.editor.apply(cmd, &self.layout)?;
            return self.finish(effects, true);
        }

        let height = f64::from(self.layout.height());
        let target = match code {
            KeyCode::Left => caret_left(doc, caret),
            KeyCode::Right => caret_right(doc, caret),
            KeyCode::Up => caret_vertical(doc, caret, -1),
            KeyCode::Down => caret_vertical(doc, caret, 1),
            KeyCode::Home => doc.line_at(caret).span.start,
            KeyCode::End => doc.line_at(caret).span.end,
            KeyCode::PageUp | KeyCode::PageDown => {
                let rows = if code == KeyCode::PageUp { -height } else { height };
                return self.scroll(rows);
            }
            _ => return Ok(()),
        };
        let effects = self
            .editor
            .dispatch(Transaction::select(target..target), &self.layout)?;
        self.finish(effects, true)
    }

    pub fn on_mouse(&mut self, mouse: MouseEvent) -> Result<()> {
        let position = Position::new(mouse.column, mouse.row);
        if let Some(popup) = self.popup_area
            && popup.contains(position)
        {
            self.editor.slash_pointer_over(true);
            if mouse.kind == MouseEventKind::Down(MouseButton::Left) {
                let row = mouse.row.saturating_sub(popup.y + 1);
                if row + 2 < popup.height {
                    let index = self.menu_state.offset() + usize::from(row);
                    let effects = self.editor.slash_click(index, &self.layout)?;
                    self.finish(effects, true)?;
                }
            }
            return Ok(());
        }
        self.editor.slash_pointer_over(false);

        let area = self.editor_area;
        let inside = area.contains(position);
        // Off-area points stay meaningful: a drag above the editor auto-scrolls up.
        let point = ViewportPoint::new(
            f64::from(mouse.column) - f64::from(area.x) + 0.5,
            f64::from(mouse.row) - f64::from(area.y) + 0.5,
        );

        match mouse.kind {
            MouseEventKind::Moved => {
                let event = if inside {
                    OverlayEvent::PointerMove(point)
                } else {
                    OverlayEvent::PointerLeave
                };
                let out = self.editor.overlay_event(event, &self.layout)?;
                self.finish(out.effects, false)
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let out = self
                    .editor
                    .overlay_event(OverlayEvent::PointerMove(point), &self.layout)?;
                self.finish(out.effects, false)
            }
            MouseEventKind::Down(MouseButton::Left) if inside => {
                let out = self
                    .editor
                    .overlay_event(OverlayEvent::PointerDown(point), &self.layout)?;
                let consumed = out.consumed;
                self.finish(out.effects, false)?;
                if consumed {
                    return Ok(());
                }
                self.click_text(mouse.column - area.x, mouse.row - area.y)
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let out = self
                    .editor
                    .overlay_event(OverlayEvent::PointerUp(point), &self.layout)?;
                self.finish(out.effects, false)
            }
            MouseEventKind::ScrollDown => self.scroll(WHEEL_ROWS),
            MouseEventKind::ScrollUp => self.scroll(-WHEEL_ROWS),
            _ => Ok(()),
        }
    }

    /// A click on the text: toggles a checkbox under it or moves the caret.
    fn click_text(&mut self, column: u16, row: u16) -> Result<()> {
        let Some(column) = column.checked_sub(GUTTER_WIDTH) else {
            return Ok(());
        };
        let doc = self.editor.doc();
        let number = (self.layout.first_row_line() + usize::from(row)).min(doc.line_count());
        let Some(line) = doc.line(number) else {
            return Ok(());
        };
        let rendered = ui::render_line(
            line,
            self.editor.decorations(),
            usize::from(self.layout.text_width()),
        );
        let offset = rendered.offset_at(usize::from(column));
        if let Some(effects) = self.editor.click_widget(offset, &self.layout)? {
            return self.finish(effects, false);
        }
        let effects = self
            .editor
            .dispatch(Transaction::select(offset..offset), &self.layout)?;
        self.finish(effects, false)
    }

    fn scroll(&mut self, rows: f64) -> Result<()> {
        if self.layout.scroll_by(rows) {
            let effects = self.editor.viewport_changed(&self.layout)?;
            self.finish(effects, false)?;
        }
        Ok(())
    }

    /// Carries out what the editor asked for, then keeps the layout in step
    /// with the document (line count, and the caret when `follow_caret`).
    fn finish(&mut self, effects: Vec<EditorEffect>, follow_caret: bool) -> Result<()> {
        let mut queue = VecDeque::from(effects);
        let mut synced = false;
        loop {
            while let Some(effect) = queue.pop_front() {
                queue.extend(self.carry_out(effect)?);
            }
            if synced {
                return Ok(());
            }
            synced = true;
            let doc = self.editor.doc();
            let mut moved = self.layout.set_line_count(doc.line_count());
            if follow_caret {
                moved |= self.layout.ensure_visible(doc.line_at(doc.caret()).number);
            }
            if moved {
                queue.extend(self.editor.viewport_changed(&self.layout)?);
            }
        }
    }

    fn carry_out(&mut self, effect: EditorEffect) -> Result<Vec<EditorEffect>> {
        match effect {
            EditorEffect::Overlay(OverlayEffect::StartAutoScroll {
                handle,
                interval_ms,
            }) => {
                let every = Duration::from_millis(interval_ms);
                self.auto_scroll = Some(Timer {
                    id: handle,
                    due: Instant::now() + every,
                    every: Some(every),
                });
            }
            EditorEffect::Overlay(OverlayEffect::StopAutoScroll(handle)) => {
                if self.auto_scroll.is_some_and(|t| t.id == handle) {
                    self.auto_scroll = None;
                }
            }
            EditorEffect::Overlay(OverlayEffect::ScrollTo(offset)) => {
                if self.layout.scroll_to(offset) {
                    return Ok(self.editor.viewport_changed(&self.layout)?);
                }
            }
            EditorEffect::Overlay(OverlayEffect::DragStart(notice)) => {
                self.status = format!("Moving {} block(s)", notice.block_indices.len());
            }
            EditorEffect::Overlay(OverlayEffect::DragEnd { .. }) => self.status.clear(),
            EditorEffect::Slash(SlashEffect::ScheduleClose { token, delay_ms }) => {
                self.blur_close = Some(Timer {
                    id: token,
                    due: Instant::now() + Duration::from_millis(delay_ms),
                    every: None,
                });
            }
            EditorEffect::Slash(SlashEffect::Opened { .. }) => {
                self.menu_state = ListState::default();
            }
            EditorEffect::Overlay(OverlayEffect::HighlightsChanged | OverlayEffect::Dispatch(_))
            | EditorEffect::Slash(SlashEffect::Closed | SlashEffect::Dispatch(_)) => {}
        }
        Ok(vec![])
    }
}

fn caret_left(doc: &Document, caret: usize) -> usize {
    let line = doc.line_at(caret);
    if caret <= line.span.start {
        return match line.number.checked_sub(1).and_then(|n| doc.line(n)) {
            Some(prev) => prev.span.end,
            None => caret,
        };
    }
    let column = caret - line.span.start;
    line.text[..column]
        .char_indices()
        .next_back()
        .map_or(line.span.start, |(i, _)| line.span.start + i)
}

fn caret_right(doc: &Document, caret: usize) -> usize {
    let line = doc.line_at(caret);
    if caret >= line.span.end {
        return doc.line(line.number + 1).map_or(caret, |next| next.span.start);
    }
    let column = caret - line.span.start;
    line.text[column..]
        .chars()
        .next()
        .map_or(line.span.end, |c| caret + c.len_utf8())
}

/// Same character column on the line `delta` lines away, clamped to its end.
fn caret_vertical(doc: &Document, caret: usize, delta: isize) -> usize {
    let line = doc.line_at(caret);
    let column = line.text[..caret - line.span.start].chars().count();
    let Some(target) = line
        .number
        .checked_add_signed(delta)
        .and_then(|n| doc.line(n))
    else {
        return caret;
    };
    target
        .text
        .char_indices()
        .nth(column)
        .map_or(target.span.end, |(i, _)| target.span.start + i)
}
