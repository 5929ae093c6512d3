use serde::{Deserialize, Serialize};

use crate::{
    editing::{Change, Document, Patch, Transaction},
    geometry::{LayoutQuery, ViewportPoint},
    view::{ViewPlugin, ViewUpdate},
};

use super::catalog::{SlashCommand, filter};

/// The character that opens the menu.
pub const TRIGGER: char = '/';

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlashMenuOptions {
    /// The menu closes once the query grows past this many characters.
    pub max_query_len: usize,
    /// Delay between losing focus and closing, so a click on the menu lands.
    pub blur_grace_ms: u64,
}

impl Default for SlashMenuOptions {
    fn default() -> Self {
        Self {
            max_query_len: 20,
            blur_grace_ms: 150,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlashMenuState {
    pub is_open: bool,
    pub query: String,
    pub selected_index: usize,
    /// Offset of the `/` that opened the menu.
    pub trigger_pos: usize,
    /// Where the popup is drawn: the caret position when the menu opened.
    pub anchor: ViewportPoint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlashKey {
    ArrowDown,
    ArrowUp,
    Enter,
    Tab,
    Escape,
    Backspace,
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SlashEffect {
    Opened { anchor: ViewportPoint },
    Closed,
    Dispatch(Transaction),
    /// Ask the host to call [`SlashMenu::blur_elapsed`] with `token` after
    /// `delay_ms`.
    ScheduleClose { token: u64, delay_ms: u64 },
}

#[derive(Debug, Default, PartialEq)]
pub struct KeyOutcome {
    pub consumed: bool,
    pub effects: Vec<SlashEffect>,
}

/// The per-editor slash command menu.
#[derive(Debug, Default)]
pub struct SlashMenu {
    options: SlashMenuOptions,
    state: SlashMenuState,
    pointer_over: bool,
    blur_token: Option<u64>,
    next_token: u64,
}

impl SlashMenu {
    pub fn new(options: SlashMenuOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn state(&self) -> &SlashMenuState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open
    }

    /// Entries matching the current query.
    pub fn items(&self) -> Vec<&'static SlashCommand> {
        filter(&self.state.query)
    }

    /// Re-checks the menu against the document after an edit or caret move.
    pub fn sync(
        &mut self,
        doc: &Document,
        patch: Option<&Patch>,
        layout: &dyn LayoutQuery,
    ) -> Vec<SlashEffect> {
        let doc_changed = patch.is_some_and(|p| p.doc_changed);
        if self.state.is_open {
            if let Some(p) = patch.filter(|p| p.doc_changed) {
                self.state.trigger_pos = p.map_pos(self.state.trigger_pos, true);
            }
            return self.revalidate(doc);
        }
        if doc_changed {
            return self.try_open(doc, layout);
        }
        vec![]
    }

    fn try_open(&mut self, doc: &Document, layout: &dyn LayoutQuery) -> Vec<SlashEffect> {
        if !doc.has_collapsed_selection() {
            return vec![];
        }
        let caret = doc.caret();
        let line = doc.line_at(caret);
        let Some(before) = caret
            .checked_sub(line.span.start)
            .and_then(|col| line.text.get(..col))
        else {
            return vec![];
        };
        if before != "/" && !before.ends_with(" /") {
            return vec![];
        }
        let anchor = layout.coords_at(line.number, before.chars().count());
        self.state = SlashMenuState {
            is_open: true,
            query: String::new(),
            selected_index: 0,
            trigger_pos: caret - TRIGGER.len_utf8(),
            anchor,
        };
        self.blur_token = None;
        log::debug!("slash menu opened at {}", self.state.trigger_pos);
        vec![SlashEffect::Opened { anchor }]
    }

    fn revalidate(&mut self, doc: &Document) -> Vec<SlashEffect> {
        let trigger = self.state.trigger_pos;
        let caret = doc.caret();
        if doc.char_at(trigger) != Some(TRIGGER)
            || caret <= trigger
            || doc.line_at(caret).number != doc.line_at(trigger).number
        {
            return self.close();
        }
        let query = doc
            .slice(trigger + TRIGGER.len_utf8()..caret)
            .into_owned();
        let too_long = query.chars().count() > self.options.max_query_len;
        let no_matches = query.chars().count() > 2 && filter(&query).is_empty();
        if query.chars().any(char::is_whitespace) || too_long || no_matches {
            return self.close();
        }
        if query != self.state.query {
            self.state.query = query;
            self.state.selected_index = 0;
        }
        vec![]
    }

    /// Closes the menu. Idempotent.
    pub fn close(&mut self) -> Vec<SlashEffect> {
        self.blur_token = None;
        if !self.state.is_open {
            return vec![];
        }
        self.state = SlashMenuState::default();
        log::debug!("slash menu closed");
        vec![SlashEffect::Closed]
    }

    pub fn handle_key(&mut self, key: SlashKey, doc: &Document) -> KeyOutcome {
        if !self.state.is_open {
            return KeyOutcome::default();
        }
        let count = self.items().len();
        match key {
            SlashKey::ArrowDown | SlashKey::ArrowUp => {
                if count > 0 {
                    let i = self.state.selected_index.min(count - 1);
                    self.state.selected_index = if key == SlashKey::ArrowDown {
                        (i + 1) % count
                    } else {
                        (i + count - 1) % count
                    };
                }
                KeyOutcome {
                    consumed: true,
                    effects: vec![],
                }
            }
            SlashKey::Enter | SlashKey::Tab => KeyOutcome {
                consumed: true,
                effects: self.commit(self.state.selected_index, doc),
            },
            SlashKey::Escape => KeyOutcome {
                consumed: true,
                effects: self.close(),
            },
            // Let the keystroke delete the `/` itself.
            SlashKey::Backspace if self.state.query.is_empty() => KeyOutcome {
                consumed: false,
                effects: self.close(),
            },
            SlashKey::Backspace | SlashKey::Other => KeyOutcome::default(),
        }
    }

    /// Commits the entry at `index` of the filtered list (a click on it, or
    /// Enter on the highlighted one).
    pub fn commit(&mut self, index: usize, doc: &Document) -> Vec<SlashEffect> {
        let Some(entry) = self.items().get(index).copied() else {
            return self.close();
        };
        let trigger = self.state.trigger_pos;
        let caret = doc.caret().max(trigger);
        let line_end = doc.line_at(caret).span.end.max(caret);
        let content = doc.slice(caret..line_end);
        let (markdown, offset) = entry.apply(&content);
        log::debug!("slash command {} committed", entry.id);

        let tx = Transaction::single(Change::replace(trigger, line_end, markdown))
            .with_caret(trigger + offset);
        let mut effects = vec![SlashEffect::Dispatch(tx)];
        effects.extend(self.close());
        effects
    }

    pub fn set_pointer_over(&mut self, over: bool) {
        self.pointer_over = over;
    }

    /// The editor lost focus: close after the grace delay unless the pointer
    /// is over the menu.
    pub fn blur(&mut self) -> Vec<SlashEffect> {
        if !self.state.is_open || self.pointer_over {
            return vec![];
        }
        self.next_token += 1;
        self.blur_token = Some(self.next_token);
        vec![SlashEffect::ScheduleClose {
            token: self.next_token,
            delay_ms: self.options.blur_grace_ms,
        }]
    }

    pub fn focus(&mut self) {
        self.blur_token = None;
    }

    pub fn blur_elapsed(&mut self, token: u64) -> Vec<SlashEffect> {
        if self.blur_token != Some(token) || self.pointer_over {
            return vec![];
        }
        self.close()
    }
}

impl ViewPlugin for SlashMenu {
    type Effect = SlashEffect;

    fn update(&mut self, update: &ViewUpdate<'_>) -> Vec<SlashEffect> {
        match update.patch {
            Some(patch) => self.sync(update.doc, Some(patch), update.layout),
            None => vec![],
        }
    }

    fn destroy(&mut self) -> Vec<SlashEffect> {
        self.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::Cmd;
    use crate::geometry::StaticLayout;
    use pretty_assertions::assert_eq;

    struct Harness {
        doc: Document,
        menu: SlashMenu,
        layout: StaticLayout,
    }

    impl Harness {
        fn new(text: &str) -> Self {
            let mut doc = Document::new(text);
            doc.set_selection(text.len()..text.len());
            Self {
                doc,
                menu: SlashMenu::new(SlashMenuOptions::default()),
                layout: StaticLayout::uniform(50, 1.0)
                    .with_viewport(20.0)
                    .with_content_columns(4.0, 80.0, 1.0),
            }
        }

        fn run(&mut self, cmd: Cmd) -> Vec<SlashEffect> {
            let patch = self.doc.apply(cmd).unwrap();
            self.menu.sync(&self.doc, Some(&patch), &self.layout)
        }

        fn type_text(&mut self, text: &str) -> Vec<SlashEffect> {
            let mut effects = vec![];
            for ch in text.chars() {
                let at = self.doc.caret();
                effects = self.run(Cmd::InsertText {
                    at,
                    text: ch.to_string(),
                });
            }
            effects
        }

        fn backspace(&mut self) -> Vec<SlashEffect> {
            let at = self.doc.caret();
            self.run(Cmd::DeleteBackward { at })
        }

        fn key(&mut self, key: SlashKey) -> KeyOutcome {
            self.menu.handle_key(key, &self.doc)
        }

        fn apply_effects(&mut self, effects: Vec<SlashEffect>) {
            for e in effects {
                if let SlashEffect::Dispatch(tx) = e {
                    self.doc.dispatch(tx).unwrap();
                }
            }
        }
    }

    #[test]
    fn opens_on_slash_at_line_start() {
        let mut h = Harness::new("");
        let effects = h.type_text("/");
        assert_eq!(
            effects,
            vec![SlashEffect::Opened {
                anchor: ViewportPoint::new(5.0, 0.0)
            }]
        );
        assert_eq!(h.menu.state().trigger_pos, 0);
        assert_eq!(h.menu.items().len(), 11);
    }

    #[test]
    fn opens_after_space_but_not_mid_word() {
        let mut h = Harness::new("see ");
        h.type_text("/");
        assert!(h.menu.is_open());

        let mut h = Harness::new("and");
        h.type_text("/");
        assert!(!h.menu.is_open());
    }

    #[test]
    fn head_query_filters_and_commit_inserts_heading() {
        let mut h = Harness::new("");
        h.type_text("/head");
        let ids: Vec<_> = h.menu.items().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["h1", "h2", "h3"]);

        assert!(h.key(SlashKey::ArrowDown).consumed);
        let out = h.key(SlashKey::Enter);
        assert!(out.consumed);
        assert_eq!(out.effects.last(), Some(&SlashEffect::Closed));
        h.apply_effects(out.effects);
        assert_eq!(h.doc.text(), "## ");
        assert_eq!(h.doc.caret(), 3);
        assert!(!h.menu.is_open());
    }

    #[test]
    fn commit_transforms_rest_of_line() {
        let mut h = Harness::new("milk");
        h.doc.set_selection(0..0);
        h.type_text("/todo");
        let out = h.key(SlashKey::Tab);
        h.apply_effects(out.effects);
        assert_eq!(h.doc.text(), "- [ ] milk");
        assert_eq!(h.doc.caret(), 6);
    }

    #[test]
    fn arrows_wrap() {
        let mut h = Harness::new("");
        h.type_text("/head");
        h.key(SlashKey::ArrowUp);
        assert_eq!(h.menu.state().selected_index, 2);
        h.key(SlashKey::ArrowDown);
        assert_eq!(h.menu.state().selected_index, 0);
    }

    #[test]
    fn whitespace_in_query_closes() {
        let mut h = Harness::new("");
        h.type_text("/he");
        assert_eq!(h.type_text(" "), vec![SlashEffect::Closed]);
    }

    #[test]
    fn unmatched_query_closes_after_two_chars() {
        let mut h = Harness::new("");
        h.type_text("/zz");
        assert!(h.menu.is_open());
        h.type_text("z");
        assert!(!h.menu.is_open());
    }

    #[test]
    fn overlong_query_closes() {
        let mut h = Harness::new("");
        h.menu = SlashMenu::new(SlashMenuOptions {
            max_query_len: 3,
            ..SlashMenuOptions::default()
        });
        h.type_text("/hea");
        assert!(h.menu.is_open());
        h.type_text("d");
        assert!(!h.menu.is_open());
    }

    #[test]
    fn backspace_on_empty_query_closes_without_consuming() {
        let mut h = Harness::new("");
        h.type_text("/");
        let out = h.key(SlashKey::Backspace);
        assert_eq!(
            out,
            KeyOutcome {
                consumed: false,
                effects: vec![SlashEffect::Closed]
            }
        );
    }

    #[test]
    fn deleting_the_trigger_closes() {
        let mut h = Harness::new("");
        h.type_text("/h");
        h.backspace();
        assert!(h.menu.is_open());
        assert_eq!(h.backspace(), vec![SlashEffect::Closed]);
    }

    #[test]
    fn caret_moving_to_another_line_closes() {
        let mut h = Harness::new("a\n");
        h.type_text("/");
        let patch = h.doc.dispatch(Transaction::select(0..0)).unwrap();
        let effects = h.menu.sync(&h.doc, Some(&patch), &h.layout);
        assert_eq!(effects, vec![SlashEffect::Closed]);
    }

    #[test]
    fn trigger_follows_edits_before_it() {
        let mut h = Harness::new("x /");
        h.doc.set_selection(2..2);
        h.type_text("/");
        assert!(h.menu.is_open());
        assert_eq!(h.menu.state().trigger_pos, 2);
        // Typing "h" right after the trigger, then an edit at line start.
        h.type_text("h");
        let patch = h
            .doc
            .dispatch(Transaction::single(Change::insert(0, "yy")))
            .unwrap();
        h.menu.sync(&h.doc, Some(&patch), &h.layout);
        assert_eq!(h.menu.state().trigger_pos, 4);
        assert_eq!(h.menu.state().query, "h");
    }

    #[test]
    fn blur_closes_after_grace_unless_hovered() {
        let mut h = Harness::new("");
        h.type_text("/");
        let effects = h.menu.blur();
        assert_eq!(
            effects,
            vec![SlashEffect::ScheduleClose {
                token: 1,
                delay_ms: 150
            }]
        );
        h.menu.set_pointer_over(true);
        assert_eq!(h.menu.blur_elapsed(1), vec![]);
        h.menu.set_pointer_over(false);
        assert_eq!(h.menu.blur_elapsed(1), vec![SlashEffect::Closed]);

        h.type_text("/");
        h.menu.set_pointer_over(true);
        assert_eq!(h.menu.blur(), vec![]);
    }

    #[test]
    fn focus_cancels_pending_close() {
        let mut h = Harness::new("");
        h.type_text("/");
        h.menu.blur();
        h.menu.focus();
        assert_eq!(h.menu.blur_elapsed(1), vec![]);
        assert!(h.menu.is_open());
    }

    #[test]
    fn click_commits_entry() {
        let mut h = Harness::new("");
        h.type_text("/");
        let effects = h.menu.commit(8, &h.doc);
        h.apply_effects(effects);
        assert_eq!(h.doc.text(), "```\n\n```");
        assert_eq!(h.doc.caret(), 4);
    }

    #[test]
    fn close_is_idempotent() {
        let mut h = Harness::new("");
        h.type_text("/");
        assert_eq!(h.menu.close(), vec![SlashEffect::Closed]);
        assert_eq!(h.menu.close(), vec![]);
    }
}
