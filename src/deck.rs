// ABOUTME: Slide catalog for the stepdeck application
// ABOUTME: Defines slides, content items and deck loading from JSON or Markdown

use crate::errors::{DeckError, Result};
use crate::markdown;
use crate::utils;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Table label that marks an analysis table as the start of the answer reveal.
pub const ANALYSIS_TABLE_LABEL: &str = "解析";

const BUILTIN_DECK: &str = include_str!("../decks/builtin.md");

/// Cosmetic slide theme. Navigation never looks at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Default,
    Dark,
    Accent,
    Code,
}

impl Theme {
    /// Parse a theme name, ignoring case
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "default" => Some(Theme::Default),
            "dark" => Some(Theme::Dark),
            "accent" => Some(Theme::Accent),
            "code" => Some(Theme::Code),
            _ => None,
        }
    }
}

/// Kind tag of a content item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Text,
    Bullet,
    Code,
    Table,
    Heading,
    Subheading,
    Tip,
    Example,
    Answer,
    Analysis,
}

impl ItemKind {
    pub fn name(self) -> &'static str {
        match self {
            ItemKind::Text => "text",
            ItemKind::Bullet => "bullet",
            ItemKind::Code => "code",
            ItemKind::Table => "table",
            ItemKind::Heading => "heading",
            ItemKind::Subheading => "subheading",
            ItemKind::Tip => "tip",
            ItemKind::Example => "example",
            ItemKind::Answer => "answer",
            ItemKind::Analysis => "analysis",
        }
    }
}

/// One piece of slide content.
///
/// Serialized with an internal `"type"` tag so the JSON form reads
/// `{"type": "bullet", "content": "...", "items": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SlideItem {
    Text {
        content: String,
    },
    Bullet {
        content: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        items: Vec<String>,
    },
    Code {
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        language: Option<String>,
    },
    Table {
        /// Display label of the table
        #[serde(default)]
        content: String,
        #[serde(default)]
        headers: Vec<String>,
        #[serde(default)]
        rows: Vec<Vec<String>>,
    },
    Heading {
        content: String,
    },
    Subheading {
        content: String,
    },
    Tip {
        content: String,
    },
    Example {
        content: String,
    },
    Answer {
        content: String,
    },
    Analysis {
        content: String,
    },
}

impl SlideItem {
    pub fn kind(&self) -> ItemKind {
        match self {
            SlideItem::Text { .. } => ItemKind::Text,
            SlideItem::Bullet { .. } => ItemKind::Bullet,
            SlideItem::Code { .. } => ItemKind::Code,
            SlideItem::Table { .. } => ItemKind::Table,
            SlideItem::Heading { .. } => ItemKind::Heading,
            SlideItem::Subheading { .. } => ItemKind::Subheading,
            SlideItem::Tip { .. } => ItemKind::Tip,
            SlideItem::Example { .. } => ItemKind::Example,
            SlideItem::Answer { .. } => ItemKind::Answer,
            SlideItem::Analysis { .. } => ItemKind::Analysis,
        }
    }

    /// Main text payload of the item (the label for tables)
    pub fn content(&self) -> &str {
        match self {
            SlideItem::Text { content }
            | SlideItem::Bullet { content, .. }
            | SlideItem::Code { content, .. }
            | SlideItem::Table { content, .. }
            | SlideItem::Heading { content }
            | SlideItem::Subheading { content }
            | SlideItem::Tip { content }
            | SlideItem::Example { content }
            | SlideItem::Answer { content }
            | SlideItem::Analysis { content } => content,
        }
    }

    /// Whether this item opens the answer half of a slide.
    pub fn is_reveal_boundary(&self) -> bool {
        match self {
            SlideItem::Answer { .. } | SlideItem::Analysis { .. } => true,
            SlideItem::Table { content, .. } => content == ANALYSIS_TABLE_LABEL,
            _ => false,
        }
    }
}

/// A single slide
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub items: Vec<SlideItem>,
    #[serde(default)]
    pub theme: Theme,
}

impl Slide {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            subtitle: None,
            items: Vec::new(),
            theme: Theme::Default,
        }
    }

    pub fn with_items(mut self, items: Vec<SlideItem>) -> Self {
        self.items = items;
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn count_kind(&self, kind: ItemKind) -> usize {
        self.items.iter().filter(|item| item.kind() == kind).count()
    }

    pub fn has_kind(&self, kind: ItemKind) -> bool {
        self.items.iter().any(|item| item.kind() == kind)
    }
}

fn default_title() -> String {
    "Presentation".to_string()
}

/// An ordered, immutable slide catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    #[serde(default = "default_title")]
    pub title: String,
    pub slides: Vec<Slide>,
}

impl Deck {
    /// Build a deck and validate it
    pub fn new(title: impl Into<String>, slides: Vec<Slide>) -> Result<Self> {
        let deck = Self {
            title: title.into(),
            slides,
        };
        deck.validate()?;
        Ok(deck)
    }

    /// The deck compiled into the binary
    pub fn builtin() -> Result<Self> {
        markdown::parse_deck(BUILTIN_DECK)
    }

    /// Parse a deck from its JSON form
    pub fn from_json_str(json: &str) -> Result<Self> {
        let deck: Deck = serde_json::from_str(json)?;
        deck.validate()?;
        Ok(deck)
    }

    /// Load a deck from disk. `.json` files are read as JSON, anything else as Markdown.
    pub fn load(path: &Path) -> Result<Self> {
        info!("Loading deck from {:?}", path);
        utils::validate_file_exists(path)?;

        let source = fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let deck = if is_json {
            Self::from_json_str(&source)?
        } else {
            markdown::parse_deck(&source)?
        };

        debug!("Loaded {} slides titled {:?}", deck.len(), deck.title);
        Ok(deck)
    }

    /// Check the catalog invariants: at least one slide, unique non-empty ids
    pub fn validate(&self) -> Result<()> {
        if self.slides.is_empty() {
            return Err(DeckError::EmptyDeck);
        }

        let mut seen = HashSet::new();
        for (index, slide) in self.slides.iter().enumerate() {
            if slide.id.trim().is_empty() {
                return Err(DeckError::ValidationError(format!(
                    "Slide {} has an empty id",
                    index + 1
                )));
            }
            if !seen.insert(slide.id.as_str()) {
                return Err(DeckError::DuplicateSlideId(slide.id.clone()));
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Slide> {
        self.slides.get(index)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
