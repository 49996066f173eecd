// ABOUTME: HTML export module for the stepdeck application
// ABOUTME: Writes a deck as a standalone HTML document with per-item reveal steps

use crate::deck::{Deck, Slide, SlideItem, Theme};
use crate::errors::Result;
use crate::steps;
use crate::utils;
use chrono::Utc;
use log::info;
use std::fs;
use std::path::Path;

const STYLE: &str = "body{font-family:sans-serif;margin:0;background:#f4f4f5}\
section{background:#fff;margin:2em auto;max-width:60em;padding:2em;border-radius:8px}\
section.theme-accent{background:#312e81;color:#fff}\
section.theme-dark{background:#18181b;color:#e4e4e7}\
pre{background:#18181b;color:#a7f3d0;padding:1em;overflow-x:auto}\
table{border-collapse:collapse}td,th{border:1px solid #d4d4d8;padding:.3em .8em}\
.tip,.example,.answer,.analysis{border-left:4px solid;padding:.5em 1em;white-space:pre-wrap}\
.answer{border-color:#16a34a}.analysis{border-color:#9333ea}\
.tip{border-color:#ca8a04}.example{border-color:#2563eb}";

/// Render a deck as an HTML document
pub fn generate_html(deck: &Deck) -> String {
    info!("Generating HTML for deck {:?} ({} slides)", deck.title, deck.len());

    let mut html_doc = String::from("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html_doc.push_str("<meta charset=\"UTF-8\">\n");
    html_doc.push_str(
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    html_doc.push_str(&format!(
        "<meta name=\"generated\" content=\"{}\">\n",
        Utc::now().to_rfc3339()
    ));
    html_doc.push_str(&format!("<title>{}</title>\n", escape(&deck.title)));
    html_doc.push_str(&format!("<style>{}</style>\n", STYLE));
    html_doc.push_str("</head>\n<body>\n");

    for slide in &deck.slides {
        html_doc.push_str(&slide_html(slide));
    }

    html_doc.push_str("</body>\n</html>\n");
    html_doc
}

fn slide_html(slide: &Slide) -> String {
    let mut out = format!(
        "<section id=\"{}\" class=\"theme-{}\" data-steps=\"{}\">\n",
        escape(&slide.id),
        theme_name(slide.theme),
        steps::steps_required(slide)
    );
    out.push_str(&format!("<h1>{}</h1>\n", escape(&slide.title)));
    if let Some(subtitle) = &slide.subtitle {
        out.push_str(&format!("<p class=\"subtitle\">{}</p>\n", escape(subtitle)));
    }

    for (index, item) in slide.items.iter().enumerate() {
        let step = steps::required_step(slide, index);
        out.push_str(&item_html(item, step));
        out.push('\n');
    }

    out.push_str("</section>\n");
    out
}

fn item_html(item: &SlideItem, step: usize) -> String {
    let class = item.kind().name();
    let open = |tag: &str| format!("<{} class=\"{}\" data-step=\"{}\">", tag, class, step);

    match item {
        SlideItem::Text { content } => format!("{}{}</p>", open("p"), escape(content)),
        SlideItem::Heading { content } => format!("{}{}</h2>", open("h2"), escape(content)),
        SlideItem::Subheading { content } => format!("{}{}</h3>", open("h3"), escape(content)),
        SlideItem::Bullet { content, items } => {
            let mut out = format!("{}{}", open("ul"), "<li>");
            out.push_str(&escape(content));
            if !items.is_empty() {
                out.push_str("<ul>");
                for sub in items {
                    out.push_str(&format!("<li>{}</li>", escape(sub)));
                }
                out.push_str("</ul>");
            }
            out.push_str("</li></ul>");
            out
        }
        SlideItem::Code { content, language } => {
            let lang = language.as_deref().unwrap_or("c");
            format!(
                "{}<code class=\"language-{}\">{}</code></pre>",
                open("pre"),
                escape(lang),
                escape(content)
            )
        }
        SlideItem::Table {
            content,
            headers,
            rows,
        } => {
            let mut out = open("table");
            if !content.is_empty() {
                out.push_str(&format!("<caption>{}</caption>", escape(content)));
            }
            if !headers.is_empty() {
                out.push_str("<tr>");
                for cell in headers {
                    out.push_str(&format!("<th>{}</th>", escape(cell)));
                }
                out.push_str("</tr>");
            }
            for row in rows {
                out.push_str("<tr>");
                for cell in row {
                    out.push_str(&format!("<td>{}</td>", escape(cell)));
                }
                out.push_str("</tr>");
            }
            out.push_str("</table>");
            out
        }
        SlideItem::Tip { content }
        | SlideItem::Example { content }
        | SlideItem::Answer { content }
        | SlideItem::Analysis { content } => {
            format!("{}{}</div>", open("div"), escape(content))
        }
    }
}

fn theme_name(theme: Theme) -> &'static str {
    match theme {
        Theme::Default => "default",
        Theme::Dark => "dark",
        Theme::Accent => "accent",
        Theme::Code => "code",
    }
}

/// Escape text for HTML element content and attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Utility function to write HTML content to a file
pub fn write_html_to_file(html_content: &str, output_path: &Path) -> Result<()> {
    info!("Writing HTML to file: {:?}", output_path);

    utils::ensure_parent_directory_exists(output_path)?;
    fs::write(output_path, html_content)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn quiz() -> Deck {
        Deck::new(
            "Quiz & more",
            vec![Slide::new("q1", "Pick <one>").with_items(vec![
                SlideItem::Example {
                    content: "Which identifier is valid?".into(),
                },
                SlideItem::Answer {
                    content: "B".into(),
                },
                SlideItem::Table {
                    content: "解析".into(),
                    headers: vec!["Option".into()],
                    rows: vec![vec!["2abc".into()]],
                },
            ])],
        )
        .expect("valid deck")
    }

    #[test]
    fn test_items_carry_reveal_step() {
        let html = generate_html(&quiz());
        assert!(html.contains("<div class=\"example\" data-step=\"1\">Which identifier is valid?</div>"));
        assert!(html.contains("<div class=\"answer\" data-step=\"2\">B</div>"));
        assert!(html.contains("<table class=\"table\" data-step=\"2\"><caption>解析</caption>"));
        assert!(html.contains("data-steps=\"2\""));
    }

    #[test]
    fn test_text_is_escaped() {
        let html = generate_html(&quiz());
        assert!(html.contains("<title>Quiz &amp; more</title>"));
        assert!(html.contains("<h1>Pick &lt;one&gt;</h1>"));
    }

    #[test]
    fn test_document_structure() {
        let html = generate_html(&quiz());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<meta name=\"generated\" content=\""));
        assert_eq!(html.matches("<section").count(), 1);
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_write_creates_parent_directory() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("out").join("deck.html");
        write_html_to_file("<html></html>", &path).expect("write html");
        assert_eq!(
            fs::read_to_string(&path).expect("read back"),
            "<html></html>"
        );
    }
}
