// ABOUTME: Markdown deck loader for the stepdeck application
// ABOUTME: Walks the comrak AST and turns headings, lists, tables and quotes into slides

use crate::deck::{Deck, Slide, SlideItem, Theme};
use crate::errors::{DeckError, Result};
use comrak::nodes::{AstNode, ListType, NodeValue};
use comrak::{parse_document, Arena, ComrakOptions};
use log::{debug, warn};
use std::collections::HashSet;

const TABLE_LABEL_PREFIX: &str = "Table:";

/// Parse a Markdown deck.
///
/// `# Title` opens a slide, an HTML comment right under it carries
/// `id`, `theme` and `subtitle`, and the remaining blocks become items.
pub fn parse_deck(source: &str) -> Result<Deck> {
    let (title, body) = parse_frontmatter(source);

    let arena = Arena::new();
    let mut options = ComrakOptions::default();
    options.extension.table = true;
    let root = parse_document(&arena, &body, &options);

    let mut builder = DeckBuilder::default();
    for node in root.children() {
        builder.block(node)?;
    }
    builder.finish(title)
}

/// Split off a `% Title` frontmatter block (further `%` lines are author/date and dropped)
fn parse_frontmatter(source: &str) -> (String, String) {
    let mut lines = source.lines().peekable();
    let mut title = "Presentation".to_string();

    if let Some(first) = lines.peek() {
        if let Some(rest) = first.strip_prefix("% ") {
            title = rest.trim().to_string();
            lines.next();
            while lines.peek().map(|l| l.starts_with("% ")).unwrap_or(false) {
                lines.next();
            }
        }
    }

    (title, lines.collect::<Vec<_>>().join("\n"))
}

#[derive(Default)]
struct DeckBuilder {
    slides: Vec<Slide>,
    current: Option<Slide>,
    pending_table_label: Option<String>,
    expect_metadata: bool,
}

impl DeckBuilder {
    fn block<'a>(&mut self, node: &'a AstNode<'a>) -> Result<()> {
        let value = node.data.borrow().value.clone();
        let expect_metadata = std::mem::take(&mut self.expect_metadata);

        match value {
            NodeValue::Heading(heading) if heading.level == 1 => {
                self.start_slide(inline_text(node, " "));
            }
            NodeValue::ThematicBreak => {}
            NodeValue::HtmlBlock(html) => {
                if expect_metadata && html.literal.trim_start().starts_with("<!--") {
                    self.apply_metadata(&html.literal)?;
                } else {
                    debug!("Skipping raw HTML block");
                }
            }
            NodeValue::Heading(heading) => {
                let content = inline_text(node, " ");
                let item = if heading.level == 2 {
                    SlideItem::Heading { content }
                } else {
                    SlideItem::Subheading { content }
                };
                self.push_item(item)?;
            }
            NodeValue::Paragraph => {
                let content = inline_text(node, " ");
                if let Some(label) = content.strip_prefix(TABLE_LABEL_PREFIX) {
                    self.flush_table_label()?;
                    self.pending_table_label = Some(label.trim().to_string());
                } else {
                    self.push_item(SlideItem::Text { content })?;
                }
            }
            NodeValue::List(list) => match list.list_type {
                ListType::Bullet => {
                    for item in node.children() {
                        let (content, items) = list_item(item);
                        self.push_item(SlideItem::Bullet { content, items })?;
                    }
                }
                ListType::Ordered => {
                    for (offset, item) in node.children().enumerate() {
                        let (text, _) = list_item(item);
                        let content = format!("{}. {}", list.start + offset, text);
                        self.push_item(SlideItem::Text { content })?;
                    }
                }
            },
            NodeValue::CodeBlock(code) => {
                let language = code.info.split_whitespace().next().map(str::to_string);
                self.push_item(SlideItem::Code {
                    content: code.literal.trim_end_matches('\n').to_string(),
                    language,
                })?;
            }
            NodeValue::Table(..) => {
                let (headers, rows) = table_cells(node);
                let content = self.pending_table_label.take().unwrap_or_default();
                self.push_item(SlideItem::Table {
                    content,
                    headers,
                    rows,
                })?;
            }
            NodeValue::BlockQuote => {
                let item = callout(&block_text(node));
                self.push_item(item)?;
            }
            other => debug!("Skipping unsupported block {:?}", other),
        }
        Ok(())
    }

    fn start_slide(&mut self, title: String) {
        if let Some(label) = self.pending_table_label.take() {
            if let Some(slide) = self.current.as_mut() {
                slide.items.push(SlideItem::Text {
                    content: format!("{} {}", TABLE_LABEL_PREFIX, label),
                });
            }
        }
        if let Some(slide) = self.current.take() {
            self.slides.push(slide);
        }

        // ids without metadata are filled in by `finish`
        self.current = Some(Slide::new(String::new(), title));
        self.expect_metadata = true;
    }

    fn current_slide(&mut self) -> Result<&mut Slide> {
        self.current.as_mut().ok_or_else(|| {
            DeckError::MarkdownError(
                "Content found before the first '# ' slide heading".to_string(),
            )
        })
    }

    fn push_item(&mut self, item: SlideItem) -> Result<()> {
        self.flush_table_label()?;
        self.current_slide()?.items.push(item);
        Ok(())
    }

    /// A `Table:` line with no table after it is plain text after all
    fn flush_table_label(&mut self) -> Result<()> {
        if let Some(label) = self.pending_table_label.take() {
            let content = format!("{} {}", TABLE_LABEL_PREFIX, label);
            self.current_slide()?.items.push(SlideItem::Text { content });
        }
        Ok(())
    }

    fn apply_metadata(&mut self, comment: &str) -> Result<()> {
        let body = comment
            .trim()
            .trim_start_matches("<!--")
            .trim_end_matches("-->");
        let slide = self.current_slide()?;

        for entry in body.split(';') {
            let Some((key, value)) = entry.split_once(':') else {
                continue;
            };
            let value = value.trim();
            match key.trim().to_lowercase().as_str() {
                "id" => slide.id = value.to_string(),
                "subtitle" => slide.subtitle = Some(value.to_string()),
                "theme" => match Theme::from_name(value) {
                    Some(theme) => slide.theme = theme,
                    None => warn!("Unknown theme {:?} on slide {:?}", value, slide.title),
                },
                other => warn!("Unknown slide metadata key {:?}", other),
            }
        }
        Ok(())
    }

    fn finish(mut self, title: String) -> Result<Deck> {
        if self.pending_table_label.is_some() {
            self.flush_table_label()?;
        }
        if let Some(slide) = self.current.take() {
            self.slides.push(slide);
        }
        assign_fallback_ids(&mut self.slides);
        Deck::new(title, self.slides)
    }
}

/// Give every slide without an id `slide-N`, skipping ids an author already chose
fn assign_fallback_ids(slides: &mut [Slide]) {
    let mut taken: HashSet<String> = slides
        .iter()
        .filter(|slide| !slide.id.is_empty())
        .map(|slide| slide.id.clone())
        .collect();

    for (index, slide) in slides.iter_mut().enumerate() {
        if !slide.id.is_empty() {
            continue;
        }
        let base = format!("slide-{}", index + 1);
        let mut id = base.clone();
        let mut suffix = 2;
        while taken.contains(&id) {
            id = format!("{}-{}", base, suffix);
            suffix += 1;
        }
        taken.insert(id.clone());
        slide.id = id;
    }
}

/// Concatenate the inline text under a node
fn inline_text<'a>(node: &'a AstNode<'a>, soft_break: &str) -> String {
    let mut out = String::new();
    collect_inline(node, soft_break, &mut out);
    out.trim().to_string()
}

fn collect_inline<'a>(node: &'a AstNode<'a>, soft_break: &str, out: &mut String) {
    for child in node.children() {
        match &child.data.borrow().value {
            NodeValue::Text(text) => out.push_str(text),
            NodeValue::Code(code) => out.push_str(&code.literal),
            NodeValue::SoftBreak => out.push_str(soft_break),
            NodeValue::LineBreak => out.push('\n'),
            NodeValue::HtmlInline(_) => {}
            _ => collect_inline(child, soft_break, out),
        }
    }
}

/// Paragraph text of a list item plus the first-paragraph text of each nested item
fn list_item<'a>(item: &'a AstNode<'a>) -> (String, Vec<String>) {
    let mut content = Vec::new();
    let mut nested = Vec::new();

    for child in item.children() {
        let is_list = matches!(child.data.borrow().value, NodeValue::List(_));
        if is_list {
            for sub in child.children() {
                nested.push(list_item(sub).0);
            }
        } else {
            content.push(inline_text(child, " "));
        }
    }

    (content.join(" "), nested)
}

fn table_cells<'a>(table: &'a AstNode<'a>) -> (Vec<String>, Vec<Vec<String>>) {
    let mut headers = Vec::new();
    let mut rows = Vec::new();

    for row in table.children() {
        let is_header = matches!(row.data.borrow().value, NodeValue::TableRow(true));
        let cells: Vec<String> = row.children().map(|cell| inline_text(cell, " ")).collect();
        if is_header {
            headers = cells;
        } else {
            rows.push(cells);
        }
    }

    (headers, rows)
}

/// Text of a block quote with its line breaks kept
fn block_text<'a>(node: &'a AstNode<'a>) -> String {
    node.children()
        .map(|child| inline_text(child, "\n"))
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Turn quoted text into a callout when it starts with a known marker
fn callout(text: &str) -> SlideItem {
    const MARKERS: [&str; 4] = ["tip:", "example:", "answer:", "analysis:"];

    for marker in MARKERS {
        let matches = text
            .get(..marker.len())
            .map(|head| head.eq_ignore_ascii_case(marker))
            .unwrap_or(false);
        if !matches {
            continue;
        }

        let content = text[marker.len()..].trim().to_string();
        return match marker {
            "tip:" => SlideItem::Tip { content },
            "example:" => SlideItem::Example { content },
            "answer:" => SlideItem::Answer { content },
            _ => SlideItem::Analysis { content },
        };
    }

    SlideItem::Text {
        content: text.to_string(),
    }
}
