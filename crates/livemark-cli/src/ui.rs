use livemark_engine::{
    geometry::{LayoutQuery, ViewportPoint},
    parsing::rope::LineRef,
    preview::{Decoration, DecorationKind, DecorationSet, LineKind, MarkKind, WidgetKind},
};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};

use crate::{
    app::App,
    layout::{GUTTER_WIDTH, RIGHT_MARGIN},
};

const MENU_WIDTH: u16 = 44;
const MENU_ROWS: usize = 8;

/// One terminal cell of a rendered line and the document offset it shows.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    ch: char,
    style: Style,
    offset: usize,
}

/// A document line as drawn: hidden syntax removed, widgets substituted.
#[derive(Debug, Clone)]
pub struct RenderedLine {
    cells: Vec<Cell>,
    style: Style,
    end: usize,
}

impl RenderedLine {
    /// Document offset under visual `column`; past the text it is the line end.
    pub fn offset_at(&self, column: usize) -> usize {
        self.cells.get(column).map_or(self.end, |c| c.offset)
    }

    /// Visual column of the caret at `offset`.
    pub fn column_of(&self, offset: usize) -> usize {
        self.cells
            .iter()
            .position(|c| c.offset >= offset)
            .unwrap_or(self.cells.len())
    }

    pub fn text(&self) -> String {
        self.cells.iter().map(|c| c.ch).collect()
    }

    pub fn to_line(&self) -> Line<'static> {
        let mut spans = Vec::new();
        let mut run = String::new();
        let mut run_style = None;
        for cell in &self.cells {
            if run_style != Some(cell.style) {
                if let Some(style) = run_style {
                    spans.push(Span::styled(std::mem::take(&mut run), style));
                }
                run_style = Some(cell.style);
            }
            run.push(cell.ch);
        }
        if let Some(style) = run_style {
            spans.push(Span::styled(run, style));
        }
        Line::from(spans).style(self.style)
    }
}

fn line_style(kind: LineKind) -> Style {
    match kind {
        LineKind::Heading(1) => Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        LineKind::Heading(_) => Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD),
        LineKind::Quote => Style::default()
            .fg(Color::Gray)
            .add_modifier(Modifier::ITALIC),
        LineKind::CodeBlock => Style::default().fg(Color::Yellow),
        LineKind::CodeFenceDelimiter => Style::default().fg(Color::DarkGray),
        LineKind::Toggle => Style::default().fg(Color::Green),
        LineKind::SelectedBlock => Style::default().bg(Color::Blue),
        LineKind::PendingBlock => Style::default().bg(Color::Indexed(24)),
        LineKind::BulletItem | LineKind::OrderedItem | LineKind::TaskItem => Style::default(),
    }
}

fn mark_style(kind: MarkKind) -> Style {
    match kind {
        MarkKind::Bold => Style::default().add_modifier(Modifier::BOLD),
        MarkKind::Italic => Style::default().add_modifier(Modifier::ITALIC),
        MarkKind::Strike => Style::default().add_modifier(Modifier::CROSSED_OUT),
        MarkKind::InlineCode => Style::default().fg(Color::Yellow),
        MarkKind::LinkText => Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::UNDERLINED),
        MarkKind::LinkUrl => Style::default().fg(Color::DarkGray),
        MarkKind::Hide => Style::default(),
    }
}

fn covers(d: &Decoration, at: usize) -> bool {
    d.from <= at && at < d.to
}

/// Applies the decorations touching `line` and clips to `width` cells.
pub fn render_line(line: &LineRef, decorations: &DecorationSet, width: usize) -> RenderedLine {
    let start = line.span.start;
    let decos: Vec<&Decoration> = decorations.in_range(start, line.span.end).collect();
    let style = decos
        .iter()
        .filter_map(|d| match d.kind {
            DecorationKind::Line(kind) if d.from == start => Some(line_style(kind)),
            _ => None,
        })
        .fold(Style::default(), |acc, s| acc.patch(s));

    let mut cells = Vec::new();
    let mut resume = start;
    for (i, ch) in line.text.char_indices() {
        let at = start + i;
        if at < resume || cells.len() >= width {
            continue;
        }
        let widget = decos.iter().find_map(|d| match d.kind {
            DecorationKind::Widget(w) if covers(d, at) => Some((*d, w)),
            _ => None,
        });
        if let Some((d, widget)) = widget {
            let (glyph, count) = match widget {
                WidgetKind::Checkbox { checked: true, .. } => ('☑', 1),
                WidgetKind::Checkbox { checked: false, .. } => ('☐', 1),
                WidgetKind::HorizontalRule => ('─', width),
            };
            let glyph_style = style.fg(Color::Cyan);
            cells.extend((0..count).map(|_| Cell {
                ch: glyph,
                style: glyph_style,
                offset: d.from,
            }));
            resume = d.to;
            continue;
        }
        if decos
            .iter()
            .any(|d| d.kind == DecorationKind::Mark(MarkKind::Hide) && covers(d, at))
        {
            continue;
        }
        let cell_style = decos
            .iter()
            .filter_map(|d| match d.kind {
                DecorationKind::Mark(kind) if covers(d, at) => Some(mark_style(kind)),
                _ => None,
            })
            .fold(style, |acc, s| acc.patch(s));
        cells.push(Cell {
            ch: if ch == '\t' { ' ' } else { ch },
            style: cell_style,
            offset: at,
        });
    }
    cells.truncate(width);

    RenderedLine {
        cells,
        style,
        end: line.span.end,
    }
}

/// The editor area within the terminal; the last row is the status bar.
pub fn editor_area(area: Rect) -> Rect {
    split(area)[0]
}

fn split(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)].as_ref())
        .split(area)
}

/// Where the slash menu popup goes: below the trigger, or above it when
/// there is no room.
pub fn popup_rect(editor: Rect, anchor: ViewportPoint, items: usize) -> Rect {
    let height = (items.clamp(1, MENU_ROWS) as u16 + 2).min(editor.height);
    let width = MENU_WIDTH.min(editor.width);
    let anchor_x = (anchor.x.max(0.0) as u16).min(editor.width.saturating_sub(width));
    let anchor_y = anchor.y.max(0.0) as u16;
    let below = editor.y.saturating_add(anchor_y).saturating_add(1);
    let y = if below.saturating_add(height) <= editor.bottom() {
        below
    } else {
        editor
            .y
            .saturating_add(anchor_y)
            .saturating_sub(height)
            .max(editor.y)
    };
    Rect::new(editor.x + anchor_x, y, width, height)
}

pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = split(f.area());
    let editor = chunks[0];
    let doc = app.editor.doc();
    let decorations = app.editor.decorations();
    let width = usize::from(app.layout.text_width());

    let handle_lines: Vec<usize> = app
        .editor
        .overlay()
        .shown_handles()
        .map(|h| h.line)
        .collect();
    let handle_style = Style::default().fg(Color::DarkGray);

    let caret = doc.caret();
    let caret_line = doc.line_at(caret).number;
    let mut gutter = Vec::new();
    let mut text = Vec::new();
    let mut cursor = None;
    for (row, number) in app.layout.visible_lines().enumerate() {
        let Some(line) = doc.line(number) else {
            break;
        };
        gutter.push(if handle_lines.contains(&number) {
            Line::from(vec![
                Span::raw(" "),
                Span::styled("+ ", handle_style),
                Span::styled("⋮ ", handle_style),
            ])
        } else {
            Line::from("")
        });
        let rendered = render_line(line, decorations, width);
        if number == caret_line {
            let column = rendered.column_of(caret) as u16;
            cursor = Some((editor.x + GUTTER_WIDTH + column, editor.y + row as u16));
        }
        text.push(rendered.to_line());
    }

    f.render_widget(
        Paragraph::new(gutter),
        Rect {
            width: GUTTER_WIDTH.min(editor.width),
            ..editor
        },
    );
    f.render_widget(
        Paragraph::new(text),
        Rect {
            x: editor.x + GUTTER_WIDTH.min(editor.width),
            width: editor.width.saturating_sub(GUTTER_WIDTH + RIGHT_MARGIN),
            ..editor
        },
    );

    let slash = app.editor.slash();
    app.popup_area = None;
    if slash.is_open() {
        let items = slash.items();
        let area = popup_rect(editor, slash.state().anchor, items.len());
        let list_items: Vec<ListItem> = items
            .iter()
            .map(|c| {
                ListItem::new(Line::from(vec![
                    Span::raw(format!("{} ", c.icon)),
                    Span::styled(c.label, Style::default().add_modifier(Modifier::BOLD)),
                    Span::styled(
                        format!("  {}", c.description),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]))
            })
            .collect();
        app.menu_state.select(Some(slash.state().selected_index));
        let list = List::new(list_items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("/{}", slash.state().query)),
            )
            .highlight_style(Style::default().bg(Color::Yellow).fg(Color::Black));
        f.render_widget(Clear, area);
        f.render_stateful_widget(list, area, &mut app.menu_state);
        app.popup_area = Some(area);
    } else if let Some(position) = cursor {
        f.set_cursor_position(position);
    }

    let dirty = if app.is_dirty() { " [+]" } else { "" };
    let status = Line::from(vec![
        Span::styled(
            format!(" {}{dirty} ", app.path().display()),
            Style::default().add_modifier(Modifier::REVERSED),
        ),
        Span::raw(format!(" {} ", app.status)),
        Span::styled(
            "Ctrl-S: Save | Ctrl-Q: Quit | Alt-↑/↓: Move block",
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    f.render_widget(Paragraph::new(vec![status]), chunks[1]);
}
