use super::*;

const MANUAL: &str = "\
Cover Page – The Fox and the Moon
A4 Image Prompt: A small red fox with a blue scarf. Night sky, full moon.
Text: A bedtime story

Page 1 – Waking Up
A4 Image Prompt: The fox stretches outside its den
  at dawn.
Embedded Text: Every morning the fox
said hello to the sun.

Page 2 - The Path
A4 Image Prompt: The fox follows a winding path.
Text: Off it went.

End Page – Goodnight
A4 Image Prompt: The fox asleep under the moon.
Text: The End
";

#[test]
fn manual_format_yields_cover_pages_and_end() {
    let plan = StoryPlan::parse_manual(MANUAL).unwrap();
    let cover = plan.cover.as_ref().unwrap();
    assert_eq!(cover.title, "The Fox and the Moon");
    assert_eq!(cover.subtitle.as_deref(), Some("A bedtime story"));
    assert_eq!(plan.character_lock, "A small red fox with a blue scarf");
    assert_eq!(plan.title, "The Fox and the Moon");

    assert_eq!(plan.pages.len(), 3);
    assert_eq!(
        plan.pages[0].image_request,
        "The fox stretches outside its den at dawn."
    );
    assert_eq!(
        plan.pages[0].text,
        "Every morning the fox said hello to the sun."
    );
    assert_eq!(plan.pages[0].title.as_deref(), Some("Waking Up"));
    assert_eq!(plan.pages[1].text, "Off it went.");
    assert_eq!(plan.pages[2].kind, PageKind::End);
    assert_eq!(plan.pages[2].text, "The End");
}

#[test]
fn unicode_separators_are_normalized() {
    let text = "Page 1 – Intro\u{2028}A4 Image Prompt:\u{00A0}a hill\u{2029}Text: hi there";
    let plan = StoryPlan::parse_manual(text).unwrap();
    assert_eq!(plan.pages.len(), 1);
    assert_eq!(plan.pages[0].image_request, "a hill");
    assert_eq!(plan.pages[0].text, "hi there");
    assert!(plan.cover.is_none());
}

#[test]
fn manual_without_headers_is_rejected() {
    let err = StoryPlan::parse_manual("just some prose\nwith no pages").unwrap_err();
    assert!(err.to_string().contains("validation error"));
}

#[test]
fn lookalike_headers_are_not_headers() {
    let text = "Page 1 – Start\nText: one\nPage-turner stuff\nPages 4 - nope\n";
    let plan = StoryPlan::parse_manual(text).unwrap();
    assert_eq!(plan.pages.len(), 1);
    assert_eq!(plan.pages[0].text, "one Page-turner stuff Pages 4 - nope");
}

#[test]
fn json_plan_accepts_short_field_names() {
    let plan = StoryPlan::from_json_str(
        r#"{
            "title": "Fox",
            "character_lock": "a red fox",
            "pages": [
                {"text": "One.", "img_prompt": "fox wakes", "prev_syn": "The fox woke."},
                {"text": "Two.", "image_request": "fox walks"}
            ]
        }"#,
    )
    .unwrap();
    assert_eq!(plan.pages.len(), 2);
    assert_eq!(plan.pages[0].image_request, "fox wakes");
    assert_eq!(plan.pages[0].synopsis.as_deref(), Some("The fox woke."));
    assert_eq!(plan.pages[1].kind, PageKind::Story);
    assert!(plan.cover.is_none());
}

#[test]
fn json_errors_are_validation_errors() {
    let err = StoryPlan::from_json_str("{ not json").unwrap_err();
    assert!(err.to_string().contains("invalid plan JSON"));
}

#[test]
fn truncate_keeps_the_end_page() {
    let mut plan = StoryPlan::parse_manual(MANUAL).unwrap();
    plan.truncate_pages(1);
    let kinds: Vec<PageKind> = plan.pages.iter().map(|p| p.kind).collect();
    assert_eq!(kinds, vec![PageKind::Story, PageKind::End]);
}

#[test]
fn banner_text_puts_subtitle_on_its_own_line() {
    let cover = CoverRecord {
        title: "Fox".to_string(),
        subtitle: Some("A tale".to_string()),
        image_request: String::new(),
    };
    assert_eq!(cover.banner_text(), "Fox\nA tale");
}
