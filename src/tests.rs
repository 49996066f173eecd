use super::*;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

fn create_temp_deck_file(content: &str, suffix: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file
}

fn walk_to_end(nav: &mut Navigator) -> Vec<(usize, usize)> {
    let mut visited = vec![(nav.slide_index(), nav.step_index())];
    loop {
        let before = (nav.slide_index(), nav.step_index());
        nav.next_step();
        let after = (nav.slide_index(), nav.step_index());
        if after == before {
            return visited;
        }
        visited.push(after);
    }
}

#[test]
fn test_builtin_deck_chapters() {
    let deck = Deck::builtin().expect("builtin deck should parse");
    assert_eq!(deck.title, "C Crash Course");

    let names: Vec<String> = outline::chapters(&deck)
        .into_iter()
        .map(|chapter| chapter.name)
        .collect();
    assert_eq!(
        names,
        vec!["Start", "Program structure", "Data types", "Control flow"]
    );
}

#[test]
fn test_builtin_quiz_reveals_in_two_steps() {
    let deck = Deck::builtin().expect("builtin deck should parse");
    let quiz = deck
        .slides
        .iter()
        .find(|slide| slide.id == "quiz-identifiers")
        .expect("quiz slide");

    assert_eq!(steps_required(quiz), 2);
    let prompt = visible_items(quiz, 1);
    assert!(prompt
        .iter()
        .all(|&i| !matches!(quiz.items[i], SlideItem::Answer { .. })));
    assert_eq!(visible_items(quiz, 2).len(), quiz.items.len());

    // the 解析 table sits after the answer and shares its step
    let table = quiz
        .items
        .iter()
        .position(|item| matches!(item, SlideItem::Table { content, .. } if content == ANALYSIS_TABLE_LABEL))
        .expect("analysis table");
    assert_eq!(steps::required_step(quiz, table), 2);
}

#[test]
fn test_walking_the_deck_visits_every_step_once() {
    let deck = Deck::builtin().expect("builtin deck should parse");
    let mut nav = Navigator::new(&deck);
    let visited = walk_to_end(&mut nav);

    let expected: usize = deck.slides.iter().map(steps_required).sum();
    assert_eq!(visited.len(), expected);
    assert!(nav.at_end());
    assert_eq!(nav.direction(), Direction::Forward);
}

#[test]
fn test_walking_back_lands_fully_revealed() {
    let deck = Deck::builtin().expect("builtin deck should parse");
    let mut nav = Navigator::new(&deck);
    walk_to_end(&mut nav);

    while !nav.is_first_slide() {
        nav.prev_step();
        assert!(nav.step_index() >= 1);
        assert!(nav.step_index() <= nav.total_steps());
        assert_eq!(
            nav.total_steps(),
            steps_required(&deck.slides[nav.slide_index()])
        );
    }
    assert_eq!(nav.direction(), Direction::Backward);
}

#[test]
fn test_load_markdown_and_json_agree() {
    let markdown = "% Agree\n\n# One\n<!-- id: one -->\n\n> Answer: yes\n\n# Two\n<!-- id: two -->\n\nplain\n";
    let md_file = create_temp_deck_file(markdown, ".md");
    let from_markdown = Deck::load(md_file.path()).expect("markdown deck");

    let json = from_markdown.to_json_pretty().expect("serialize deck");
    let json_file = create_temp_deck_file(&json, ".json");
    let from_json = Deck::load(json_file.path()).expect("json deck");

    assert_eq!(from_markdown, from_json);
    assert_eq!(steps_required(&from_json.slides[0]), 2);
}

#[test]
fn test_json_deck_rejects_duplicate_ids() {
    let json = r#"{"slides": [{"id": "a", "title": "A"}, {"id": "a", "title": "B"}]}"#;
    let file = create_temp_deck_file(json, ".json");
    assert!(matches!(
        Deck::load(file.path()),
        Err(DeckError::DuplicateSlideId(id)) if id == "a"
    ));
}

#[test]
fn test_json_deck_rejects_empty_slides() {
    let file = create_temp_deck_file(r#"{"title": "Nothing", "slides": []}"#, ".json");
    assert!(matches!(Deck::load(file.path()), Err(DeckError::EmptyDeck)));
}

#[test]
fn test_session_renders_reveal() {
    let deck = Deck::builtin().expect("builtin deck should parse");
    let quiz_index = deck
        .slides
        .iter()
        .position(|slide| slide.id == "quiz-loops")
        .expect("quiz slide");

    let config = Config::new()
        .with_overrides(None, true)
        .expect("valid config");
    let mut session = Session::new(deck, config);
    session.apply(Action::OpenOutline);
    for _ in 0..quiz_index {
        session.apply(Action::OutlineDown);
    }
    session.apply(Action::OutlineSelect);

    let text = session.frame(80, 40).to_plain_text();
    assert!(text.contains("How many times does the body run?"));
    assert!(!text.contains("▌ Answer"));

    session.apply(Action::NextStep);
    let text = session.frame(80, 40).to_plain_text();
    assert!(text.contains("▌ Answer"));
}

#[test]
fn test_export_builtin_deck() {
    let deck = Deck::builtin().expect("builtin deck should parse");
    let html = generate_html(&deck);
    assert_eq!(html.matches("<section").count(), deck.len());

    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("deck.html");
    write_html_to_file(&html, &path).expect("write html");
    assert!(path.exists());
}

#[test]
fn test_outline_lists_step_counts() {
    let deck = Deck::builtin().expect("builtin deck should parse");
    let text = format_outline(&deck);
    assert!(text.starts_with("C Crash Course (13 slides)"));
    assert!(text.contains("Quiz: identifiers  (2 steps)"));
    assert!(text.contains("Hello, world  (1 step) code×1"));
}

#[test]
fn test_reload_error_notice_stays_on_screen() {
    let deck = Deck::builtin().expect("builtin deck should parse");
    let quiz_index = deck
        .slides
        .iter()
        .position(|slide| slide.id == "quiz-loops")
        .expect("quiz slide");
    let error = markdown::parse_deck("stray\n\n# Slide\n").expect_err("content before first slide");

    let mut session = Session::new(deck, Config::new());
    session.apply(Action::OpenOutline);
    for _ in 0..quiz_index {
        session.apply(Action::OutlineDown);
    }
    session.apply(Action::OutlineSelect);
    session.set_notice(format!("reload failed: {}", error), std::time::Instant::now());

    let frame = session.frame(60, 20);
    assert_eq!(frame.lines.len(), 20);
    for line in &frame.lines {
        assert!(utils::display_width(&line.text()) <= 60);
    }
    assert!(frame.lines[19].text().contains("reload failed"));
}
