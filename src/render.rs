// ABOUTME: Terminal rendering module for the stepdeck application
// ABOUTME: Composes a styled frame from the viewer state and paints it with crossterm

use crate::deck::{Deck, Slide, SlideItem, Theme};
use crate::highlight::{Highlighter, TokenKind};
use crate::navigation::{Direction, Navigator};
use crate::outline::{self, OutlineCursor, Thumbnail};
use crate::steps;
use crate::utils::{display_width, pad_to_width, truncate_to_width, wrap_text};
use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::terminal::{BeginSynchronizedUpdate, Clear, ClearType, EndSynchronizedUpdate};
use std::io::{self, Write};

const MARGIN: usize = 2;
const STEP_BAR_WIDTH: usize = 8;
const HINT_TEXT: &str = "← → or click to navigate  |  F fullscreen  |  o outline  |  ? help";

const SHORTCUTS: [(&str, &str); 11] = [
    ("→  Space  Enter", "next step / next slide"),
    ("←  Backspace", "previous step / previous slide"),
    ("F", "toggle fullscreen"),
    ("Esc", "leave fullscreen / close panel"),
    ("Home / End", "first / last slide"),
    ("1-9", "jump to chapter"),
    ("o  Tab", "slide outline"),
    ("↑ ↓", "scroll slide"),
    ("c", "collapse control bar"),
    ("?  h", "this help"),
    ("q", "quit"),
];

/// Visual role of a piece of text; the painter maps it to terminal colors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Title,
    AccentTitle,
    Subtitle,
    Heading,
    Subheading,
    Muted,
    Bullet,
    Code,
    CodeKeyword,
    CodeString,
    CodeComment,
    CodeNumber,
    CodeDirective,
    CodeGutter,
    Badge,
    TableHeader,
    Tip,
    Example,
    Answer,
    Analysis,
    Success,
    Failure,
    Bar,
    BarFill,
    Highlight,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub tone: Tone,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    pub spans: Vec<Span>,
}

impl Line {
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self::default().push(text, tone)
    }

    pub fn push(mut self, text: impl Into<String>, tone: Tone) -> Self {
        self.spans.push(Span {
            text: text.into(),
            tone,
        });
        self
    }

    pub fn text(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }
}

/// Cut a line to at most `width` columns, marking the cut with `…`
pub fn clip_line(line: Line, width: usize) -> Line {
    let mut clipped = Line::blank();
    let mut used = 0;
    for span in line.spans {
        let w = display_width(&span.text);
        if used + w <= width {
            used += w;
            clipped.spans.push(span);
            continue;
        }
        let room = width - used;
        if room > 0 {
            clipped = clipped.push(truncate_to_width(&span.text, room), span.tone);
        }
        break;
    }
    clipped
}

/// A fully laid out screen
#[derive(Debug, Clone)]
pub struct Frame {
    pub lines: Vec<Line>,
    /// Rows available to the slide body
    pub content_height: u16,
    /// Largest useful scroll offset for the current slide body
    pub max_scroll: usize,
}

impl Frame {
    pub fn to_plain_text(&self) -> String {
        self.lines
            .iter()
            .map(|line| line.text().trim_end().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Everything the renderer reads
pub struct View<'a> {
    pub deck: &'a Deck,
    pub nav: &'a Navigator,
    pub scroll: usize,
    pub show_hints: bool,
    pub controls_collapsed: bool,
    pub outline: Option<&'a OutlineCursor>,
    pub help_open: bool,
    pub notice: Option<&'a str>,
}

/// Rows taken by the control bar at the bottom of the screen
pub fn control_rows(fullscreen: bool, collapsed: bool) -> u16 {
    match (fullscreen, collapsed) {
        (true, _) => 0,
        (false, true) => 1,
        (false, false) => 2,
    }
}

/// Lay out one screen
pub fn compose(view: &View, width: u16, height: u16) -> Frame {
    let fullscreen = view.nav.is_fullscreen();
    let bar_rows = control_rows(fullscreen, view.controls_collapsed).min(height);
    let content_height = height - bar_rows;
    let inner_width = (width as usize).saturating_sub(MARGIN * 2).max(10);

    let mut body = if let Some(cursor) = view.outline {
        outline_lines(view.deck, view.nav, cursor, inner_width, content_height as usize)
    } else if view.help_open {
        help_lines(inner_width)
    } else {
        match view.deck.get(view.nav.slide_index()) {
            Some(slide) => slide_lines(slide, view.nav.step_index(), inner_width),
            None => vec![Line::new("(no slide)", Tone::Muted)],
        }
    };

    // the hint banner takes the last content row for itself
    let show_hint =
        view.show_hints && !fullscreen && view.outline.is_none() && content_height > 0;
    let body_rows = content_height as usize - usize::from(show_hint);

    let max_scroll = if view.outline.is_some() {
        0
    } else {
        body.len().saturating_sub(body_rows)
    };
    let scroll = view.scroll.min(max_scroll);
    body.drain(..scroll);
    body.truncate(body_rows);

    let mut lines: Vec<Line> = body
        .into_iter()
        .map(|line| {
            let mut indented = Line::new(" ".repeat(MARGIN), Tone::Plain);
            indented.spans.extend(line.spans);
            indented
        })
        .collect();
    lines.resize(body_rows, Line::blank());

    if show_hint {
        lines.push(Line::new(" ", Tone::Plain).push(HINT_TEXT, Tone::Muted));
    }

    if bar_rows > 0 {
        lines.extend(control_bar(view, width as usize, view.controls_collapsed));
    }
    lines.truncate(height as usize);
    let lines = lines
        .into_iter()
        .map(|line| clip_line(line, width as usize))
        .collect();

    Frame {
        lines,
        content_height,
        max_scroll,
    }
}

/// Title block plus every item visible at `step`
pub fn slide_lines(slide: &Slide, step: usize, width: usize) -> Vec<Line> {
    let mut lines = Vec::new();

    let title_tone = if slide.theme == Theme::Accent {
        Tone::AccentTitle
    } else {
        Tone::Title
    };
    for (i, part) in wrap_text(&slide.title, width).into_iter().enumerate() {
        let mut line = Line::new(part, title_tone);
        if i == 0 && slide.theme == Theme::Code {
            line = line.push("  [code]", Tone::Badge);
        }
        lines.push(line);
    }
    if let Some(subtitle) = &slide.subtitle {
        for part in wrap_text(subtitle, width) {
            lines.push(Line::new(part, Tone::Subtitle));
        }
    }

    for index in steps::visible_items(slide, step) {
        lines.push(Line::blank());
        lines.extend(item_lines(&slide.items[index], width));
    }

    lines
}

/// Render a single content item
pub fn item_lines(item: &SlideItem, width: usize) -> Vec<Line> {
    match item {
        SlideItem::Text { content } => wrap_text(content, width)
            .into_iter()
            .map(|part| Line::new(part, Tone::Plain))
            .collect(),
        SlideItem::Bullet { content, items } => {
            let mut lines = prefixed("• ", "  ", content, width, Tone::Bullet, Tone::Plain);
            for sub in items {
                lines.extend(prefixed("    ◦ ", "      ", sub, width, Tone::Muted, Tone::Plain));
            }
            lines
        }
        SlideItem::Heading { content } => {
            prefixed("▍ ", "  ", content, width, Tone::Heading, Tone::Heading)
        }
        SlideItem::Subheading { content } => wrap_text(content, width)
            .into_iter()
            .map(|part| Line::new(part, Tone::Subheading))
            .collect(),
        SlideItem::Code { content, language } => code_lines(content, language.as_deref(), width),
        SlideItem::Table {
            content,
            headers,
            rows,
        } => table_lines(content, headers, rows, width),
        SlideItem::Tip { content } => callout_lines("Tip", content, width, Tone::Tip),
        SlideItem::Example { content } => callout_lines("Example", content, width, Tone::Example),
        SlideItem::Answer { content } => callout_lines("Answer", content, width, Tone::Answer),
        SlideItem::Analysis { content } => {
            callout_lines("Analysis", content, width, Tone::Analysis)
        }
    }
}

/// Wrap `text` with a marker on the first line and a hanging indent after it
fn prefixed(
    first: &str,
    rest: &str,
    text: &str,
    width: usize,
    marker_tone: Tone,
    tone: Tone,
) -> Vec<Line> {
    let available = width.saturating_sub(display_width(first)).max(1);
    wrap_text(text, available)
        .into_iter()
        .enumerate()
        .map(|(i, part)| {
            let marker = if i == 0 { first } else { rest };
            Line::new(marker, marker_tone).push(part, tone)
        })
        .collect()
}

fn code_lines(code: &str, language: Option<&str>, width: usize) -> Vec<Line> {
    let mut highlighter = Highlighter::for_language(language);
    let language = language.unwrap_or("c");
    let header = format!("┌─ {} ", language);
    let fill = width.saturating_sub(display_width(&header));
    let mut lines = vec![Line::new(format!("{}{}", header, "─".repeat(fill)), Tone::CodeGutter)];

    let source: Vec<&str> = code.lines().collect();
    let gutter = source.len().to_string().len().max(2);
    for (i, text) in source.iter().enumerate() {
        let mut line = Line::new(format!("│ {:>gutter$} │ ", i + 1, gutter = gutter), Tone::CodeGutter);
        for token in highlighter.line(text) {
            line = line.push(token.text, token_tone(token.kind));
        }
        lines.push(clip_line(line, width));
    }

    lines.push(Line::new(format!("└{}", "─".repeat(width.saturating_sub(1))), Tone::CodeGutter));
    lines
}

fn token_tone(kind: TokenKind) -> Tone {
    match kind {
        TokenKind::Plain => Tone::Code,
        TokenKind::Keyword => Tone::CodeKeyword,
        TokenKind::Str => Tone::CodeString,
        TokenKind::Comment => Tone::CodeComment,
        TokenKind::Number => Tone::CodeNumber,
        TokenKind::Directive => Tone::CodeDirective,
    }
}

fn table_lines(label: &str, headers: &[String], rows: &[Vec<String>], width: usize) -> Vec<Line> {
    if headers.is_empty() && rows.is_empty() {
        return Vec::new();
    }

    let columns = rows
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(headers.len()))
        .max()
        .unwrap_or(0);
    if columns == 0 {
        return Vec::new();
    }

    let mut widths = vec![0usize; columns];
    for row in std::iter::once(headers).chain(rows.iter().map(Vec::as_slice)) {
        for (col, cell) in row.iter().enumerate() {
            widths[col] = widths[col].max(display_width(cell));
        }
    }
    let separators = (columns - 1) * 3;
    let budget = width.saturating_sub(separators).max(columns);
    if widths.iter().sum::<usize>() > budget {
        let cap = (budget / columns).max(1);
        for w in widths.iter_mut() {
            *w = (*w).min(cap);
        }
    }

    let mut lines = Vec::new();
    if !label.is_empty() {
        lines.push(Line::new(format!("[{}]", label), Tone::Badge));
    }

    let row_line = |cells: &[String], header: bool| {
        let mut line = Line::blank();
        for (col, w) in widths.iter().enumerate() {
            if col > 0 {
                line = line.push(" │ ", Tone::Muted);
            }
            let cell = cells.get(col).map(String::as_str).unwrap_or("");
            let tone = if header {
                Tone::TableHeader
            } else if cell.contains('✅') {
                Tone::Success
            } else if cell.contains('❌') {
                Tone::Failure
            } else {
                Tone::Plain
            };
            line = line.push(pad_to_width(&truncate_to_width(cell, *w), *w), tone);
        }
        line
    };

    if !headers.is_empty() {
        lines.push(row_line(headers, true));
        let rule = widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("─┼─");
        lines.push(Line::new(rule, Tone::Muted));
    }
    for row in rows {
        lines.push(row_line(row, false));
    }
    lines
}

fn callout_lines(badge: &str, content: &str, width: usize, tone: Tone) -> Vec<Line> {
    let mut lines = vec![Line::new(format!("▌ {}", badge), tone)];
    for part in wrap_text(content, width.saturating_sub(2).max(1)) {
        lines.push(Line::new("▌ ", tone).push(part, tone));
    }
    lines
}

fn outline_lines(
    deck: &Deck,
    nav: &Navigator,
    cursor: &OutlineCursor,
    width: usize,
    height: usize,
) -> Vec<Line> {
    let mut lines = vec![
        Line::new("Slide outline", Tone::Title).push(
            format!("  {} slides  (Enter to open, Esc to close)", deck.len()),
            Tone::Muted,
        ),
        Line::blank(),
    ];
    let header_rows = lines.len();
    let mut selected_row = header_rows;

    for chapter in outline::chapters(deck) {
        lines.push(Line::new(
            format!("{}  [{}]", chapter.name, chapter.slides.len()),
            Tone::Heading,
        ));
        for index in chapter.slides {
            let slide = &deck.slides[index];
            let thumb = Thumbnail::of(slide);
            let marker = if index == nav.slide_index() { "▶" } else { " " };
            let label = format!("{} {:>3}  {}", marker, index + 1, slide.title);
            let badges = thumb.badges();
            let room = width.saturating_sub(display_width(&badges) + 2);
            let text = pad_to_width(&truncate_to_width(&label, room), room);

            if index == cursor.selected() {
                selected_row = lines.len();
                lines.push(Line::new(text, Tone::Highlight).push(format!("  {}", badges), Tone::Highlight));
            } else {
                lines.push(Line::new(text, Tone::Plain).push(format!("  {}", badges), Tone::Muted));
            }
        }
    }

    // keep the selection on screen
    if lines.len() > height && height > header_rows {
        let visible = height - header_rows;
        let first = selected_row
            .saturating_sub(visible / 2)
            .max(header_rows)
            .min(lines.len() - visible);
        let mut windowed: Vec<Line> = lines[..header_rows].to_vec();
        windowed.extend_from_slice(&lines[first..first + visible]);
        return windowed;
    }
    lines
}

fn help_lines(width: usize) -> Vec<Line> {
    let mut lines = vec![Line::new("Keyboard shortcuts", Tone::Title), Line::blank()];
    let key_width = SHORTCUTS
        .iter()
        .map(|(keys, _)| display_width(keys))
        .max()
        .unwrap_or(0);
    for (keys, description) in SHORTCUTS {
        let room = width.saturating_sub(key_width + 2);
        lines.push(
            Line::new(pad_to_width(keys, key_width), Tone::Badge)
                .push("  ", Tone::Plain)
                .push(truncate_to_width(description, room), Tone::Plain),
        );
    }
    lines
}

fn control_bar(view: &View, width: usize, collapsed: bool) -> Vec<Line> {
    let nav = view.nav;
    let position = format!("{}/{}", nav.slide_index() + 1, nav.slide_count());

    if collapsed {
        let text = format!(" ‹ {} ›   c expand", position);
        return vec![Line::new(truncate_to_width(&text, width), Tone::Muted)];
    }

    let filled = width * (nav.slide_index() + 1) / nav.slide_count().max(1);
    let progress = Line::new("━".repeat(filled), Tone::BarFill)
        .push("─".repeat(width - filled), Tone::Bar);

    let cue = match nav.direction() {
        Direction::Forward => "→",
        Direction::Backward => "←",
        Direction::None => "·",
    };
    let mut status = Line::new(format!(" {} ", cue), Tone::Muted).push(position, Tone::Badge);
    if nav.total_steps() > 1 {
        let step_fill = STEP_BAR_WIDTH * nav.step_index() / nav.total_steps();
        status = status
            .push(format!("  step {}/{} ", nav.step_index(), nav.total_steps()), Tone::Muted)
            .push("▰".repeat(step_fill), Tone::BarFill)
            .push("▱".repeat(STEP_BAR_WIDTH - step_fill), Tone::Bar);
    }
    if nav.at_end() {
        status = status.push("  end", Tone::Muted);
    }
    if let Some(notice) = view.notice {
        status = status.push(format!("  {}", notice), Tone::Highlight);
    }

    let used = display_width(&status.text());
    let right = "F full  o outline  ? help  c hide ";
    if used + display_width(right) + 1 < width {
        status = status
            .push(" ".repeat(width - used - display_width(right)), Tone::Plain)
            .push(right, Tone::Muted);
    }

    vec![progress, status]
}

fn tone_style(tone: Tone) -> (Color, bool) {
    match tone {
        Tone::Plain => (Color::Reset, false),
        Tone::Title => (Color::White, true),
        Tone::AccentTitle => (Color::Magenta, true),
        Tone::Subtitle => (Color::Grey, false),
        Tone::Heading => (Color::Cyan, true),
        Tone::Subheading => (Color::White, true),
        Tone::Muted => (Color::DarkGrey, false),
        Tone::Bullet => (Color::Cyan, true),
        Tone::Code => (Color::Reset, false),
        Tone::CodeKeyword => (Color::Magenta, true),
        Tone::CodeString => (Color::Green, false),
        Tone::CodeComment => (Color::DarkGrey, false),
        Tone::CodeNumber => (Color::DarkYellow, false),
        Tone::CodeDirective => (Color::Cyan, false),
        Tone::CodeGutter => (Color::DarkGrey, false),
        Tone::Badge => (Color::Yellow, true),
        Tone::TableHeader => (Color::White, true),
        Tone::Tip => (Color::Yellow, false),
        Tone::Example => (Color::Blue, false),
        Tone::Answer => (Color::Green, true),
        Tone::Analysis => (Color::Magenta, false),
        Tone::Success => (Color::Green, false),
        Tone::Failure => (Color::Red, false),
        Tone::Bar => (Color::DarkGrey, false),
        Tone::BarFill => (Color::Cyan, false),
        Tone::Highlight => (Color::Black, true),
    }
}

/// Paint a frame onto the terminal
pub fn paint<W: Write>(out: &mut W, frame: &Frame) -> io::Result<()> {
    queue!(out, BeginSynchronizedUpdate)?;
    for (row, line) in frame.lines.iter().enumerate() {
        queue!(out, MoveTo(0, row as u16))?;
        for span in &line.spans {
            let (color, bold) = tone_style(span.tone);
            if span.tone == Tone::Highlight {
                queue!(out, SetAttribute(Attribute::Reverse))?;
            }
            if bold {
                queue!(out, SetAttribute(Attribute::Bold))?;
            }
            queue!(
                out,
                SetForegroundColor(color),
                Print(&span.text),
                SetAttribute(Attribute::Reset),
                ResetColor
            )?;
        }
        queue!(out, Clear(ClearType::UntilNewLine))?;
    }
    queue!(out, EndSynchronizedUpdate)?;
    out.flush()
}
