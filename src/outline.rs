// ABOUTME: Outline module for the stepdeck application
// ABOUTME: Groups slides into chapters and summarises each slide for the overview panel

use crate::deck::{Deck, ItemKind, Slide, SlideItem, Theme};
use crate::steps;

/// Name of the group holding the slides before the first chapter
pub const START_GROUP: &str = "Start";

const PREVIEW_CHARS: usize = 30;

/// A run of consecutive slides under one chapter heading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    pub name: String,
    /// Indices into the deck, in order
    pub slides: Vec<usize>,
    /// False for the leading "Start" group
    pub is_chapter: bool,
}

/// Split the deck into chapters. Every accent slide after the first opens one.
pub fn chapters(deck: &Deck) -> Vec<Chapter> {
    let mut groups: Vec<Chapter> = Vec::new();

    for (index, slide) in deck.slides.iter().enumerate() {
        let opens_chapter = index > 0 && slide.theme == Theme::Accent;
        match groups.last_mut() {
            Some(group) if !opens_chapter => group.slides.push(index),
            _ => groups.push(Chapter {
                name: if opens_chapter {
                    slide.title.clone()
                } else {
                    START_GROUP.to_string()
                },
                slides: vec![index],
                is_chapter: opens_chapter,
            }),
        }
    }

    groups
}

/// First slide of the `number`-th real chapter (1-based), skipping the Start group
pub fn chapter_start(deck: &Deck, number: usize) -> Option<usize> {
    if number == 0 {
        return None;
    }
    chapters(deck)
        .into_iter()
        .filter(|chapter| chapter.is_chapter)
        .nth(number - 1)
        .and_then(|chapter| chapter.slides.first().copied())
}

/// What the thumbnail body should look like
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbnailKind {
    Chapter,
    Code,
    Table,
    List,
    Text,
    Empty,
}

/// Compact description of a slide for the overview panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub kind: ThumbnailKind,
    pub code_count: usize,
    pub bullet_count: usize,
    pub has_example: bool,
    pub has_answer: bool,
    pub has_tip: bool,
    pub has_table: bool,
    pub preview: String,
    pub steps: usize,
}

impl Thumbnail {
    pub fn of(slide: &Slide) -> Self {
        let code_count = slide.count_kind(ItemKind::Code);
        let bullet_count = slide.count_kind(ItemKind::Bullet);
        let has_table = slide.has_kind(ItemKind::Table);

        let preview = slide
            .items
            .iter()
            .find(|item| {
                matches!(
                    item,
                    SlideItem::Text { .. } | SlideItem::Bullet { .. } | SlideItem::Example { .. }
                )
            })
            .map(|item| item.content().chars().take(PREVIEW_CHARS).collect::<String>())
            .unwrap_or_default();

        let kind = if slide.theme == Theme::Accent {
            ThumbnailKind::Chapter
        } else if code_count > 0 {
            ThumbnailKind::Code
        } else if has_table {
            ThumbnailKind::Table
        } else if bullet_count > 0 {
            ThumbnailKind::List
        } else if !preview.is_empty() {
            ThumbnailKind::Text
        } else {
            ThumbnailKind::Empty
        };

        Self {
            kind,
            code_count,
            bullet_count,
            has_example: slide.has_kind(ItemKind::Example),
            has_answer: slide.has_kind(ItemKind::Answer),
            has_tip: slide.has_kind(ItemKind::Tip),
            has_table,
            preview,
            steps: steps::steps_required(slide),
        }
    }

    /// Short tag string such as `code×2 ex ans tip tbl`
    pub fn badges(&self) -> String {
        let mut tags = Vec::new();
        if self.code_count > 0 {
            tags.push(format!("code×{}", self.code_count));
        }
        if self.has_example {
            tags.push("ex".to_string());
        }
        if self.has_answer {
            tags.push("ans".to_string());
        }
        if self.has_tip {
            tags.push("tip".to_string());
        }
        if self.has_table {
            tags.push("tbl".to_string());
        }
        tags.join(" ")
    }
}

/// Selection cursor of the open outline panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutlineCursor {
    selected: usize,
    slide_count: usize,
}

impl OutlineCursor {
    /// Open on the current slide
    pub fn open(current: usize, slide_count: usize) -> Self {
        let slide_count = slide_count.max(1);
        Self {
            selected: current.min(slide_count - 1),
            slide_count,
        }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn down(&mut self) {
        if self.selected + 1 < self.slide_count {
            self.selected += 1;
        }
    }

    pub fn first(&mut self) {
        self.selected = 0;
    }

    pub fn last(&mut self) {
        self.selected = self.slide_count - 1;
    }
}

/// Plain-text outline listing, used by the `outline` subcommand
pub fn format_outline(deck: &Deck) -> String {
    let mut out = format!("{} ({} slides)\n", deck.title, deck.len());

    for chapter in chapters(deck) {
        out.push_str(&format!("\n{} [{}]\n", chapter.name, chapter.slides.len()));
        for index in chapter.slides {
            let slide = &deck.slides[index];
            let thumb = Thumbnail::of(slide);
            out.push_str(&format!(
                "  {:>3}  {}  ({} step{}) {}\n",
                index + 1,
                slide.title,
                thumb.steps,
                if thumb.steps == 1 { "" } else { "s" },
                thumb.badges()
            ));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deck() -> Deck {
        let text = |s: &str| SlideItem::Text { content: s.into() };
        Deck::new(
            "Course",
            vec![
                Slide::new("title", "Crash Course").with_theme(Theme::Accent),
                Slide::new("notice", "Notice").with_items(vec![text("read me")]),
                Slide::new("ch1", "Chapter 1").with_theme(Theme::Accent),
                Slide::new("radix", "Radix").with_items(vec![
                    SlideItem::Code {
                        content: "int x;".into(),
                        language: None,
                    },
                    SlideItem::Code {
                        content: "int y;".into(),
                        language: None,
                    },
                    SlideItem::Answer {
                        content: "x".into(),
                    },
                ]),
                Slide::new("ch2", "Chapter 2").with_theme(Theme::Accent),
                Slide::new("list", "List").with_items(vec![SlideItem::Bullet {
                    content: "a fairly long bullet that goes on past thirty characters".into(),
                    items: vec![],
                }]),
            ],
        )
        .expect("valid deck")
    }

    #[test]
    fn test_chapter_grouping() {
        let groups = chapters(&deck());
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].name, START_GROUP);
        assert!(!groups[0].is_chapter);
        assert_eq!(groups[0].slides, vec![0, 1]);
        assert_eq!(groups[1].name, "Chapter 1");
        assert_eq!(groups[1].slides, vec![2, 3]);
        assert_eq!(groups[2].slides, vec![4, 5]);
    }

    #[test]
    fn test_chapter_start_skips_start_group() {
        let deck = deck();
        assert_eq!(chapter_start(&deck, 1), Some(2));
        assert_eq!(chapter_start(&deck, 2), Some(4));
        assert_eq!(chapter_start(&deck, 3), None);
        assert_eq!(chapter_start(&deck, 0), None);
    }

    #[test]
    fn test_first_slide_never_opens_chapter() {
        let deck = Deck::new("d", vec![Slide::new("a", "A").with_theme(Theme::Accent)])
            .expect("valid deck");
        let groups = chapters(&deck);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, START_GROUP);
    }

    #[test]
    fn test_thumbnail_summary() {
        let deck = deck();
        let code = Thumbnail::of(&deck.slides[3]);
        assert_eq!(code.kind, ThumbnailKind::Code);
        assert_eq!(code.code_count, 2);
        assert!(code.has_answer);
        assert_eq!(code.steps, 2);
        assert_eq!(code.badges(), "code×2 ans");

        let list = Thumbnail::of(&deck.slides[5]);
        assert_eq!(list.kind, ThumbnailKind::List);
        assert_eq!(list.preview.chars().count(), 30);

        assert_eq!(Thumbnail::of(&deck.slides[0]).kind, ThumbnailKind::Chapter);
        assert_eq!(Thumbnail::of(&deck.slides[1]).kind, ThumbnailKind::Text);
    }

    #[test]
    fn test_cursor_clamps() {
        let mut cursor = OutlineCursor::open(9, 3);
        assert_eq!(cursor.selected(), 2);
        cursor.down();
        assert_eq!(cursor.selected(), 2);
        cursor.first();
        cursor.up();
        assert_eq!(cursor.selected(), 0);
        cursor.last();
        assert_eq!(cursor.selected(), 2);
    }

    #[test]
    fn test_format_outline_lists_every_slide() {
        let listing = format_outline(&deck());
        assert!(listing.starts_with("Course (6 slides)"));
        assert!(listing.contains("Chapter 2 [2]"));
        assert!(listing.contains("  4  Radix  (2 steps) code×2 ans"));
    }
}
