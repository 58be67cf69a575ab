use super::*;

fn plan_with_lock() -> StoryPlan {
    StoryPlan {
        title: "Fox".to_string(),
        character_lock: " a red fox in a blue scarf ".to_string(),
        reminder: "same fox".to_string(),
        cover: None,
        pages: Vec::new(),
    }
}

#[test]
fn never_cancel_never_cancels() {
    assert!(!NeverCancel.is_cancelled());
}

#[test]
fn cancel_flag_is_shared_between_clones() {
    let flag = CancelFlag::new();
    let observer = flag.clone();
    assert!(!observer.is_cancelled());
    flag.cancel();
    assert!(observer.is_cancelled());
}

#[test]
fn style_takes_character_from_plan_and_band_from_mode() {
    let style = style_for_plan(
        StyleProfile::storybook(),
        &plan_with_lock(),
        CaptionMode::Band { percent: 12 },
    );
    assert_eq!(style.character_lock, "a red fox in a blue scarf");
    assert_eq!(style.reminder, "same fox");
    let clause = style.reserve_clause.unwrap();
    assert!(clause.contains("upper 88%"));
    assert!(clause.contains("bottom 12%"));
}

#[test]
fn overlay_modes_drop_the_reserve_clause() {
    let base = StyleProfile::storybook().with_reserved_band(10);
    let style = style_for_plan(base, &plan_with_lock(), CaptionMode::RandomEdge);
    assert!(style.reserve_clause.is_none());
}

#[test]
fn empty_plan_lock_keeps_base_character() {
    let base = StyleProfile::storybook().with_character("a grey owl", "");
    let style = style_for_plan(base, &StoryPlan::default(), CaptionMode::TopBanner);
    assert_eq!(style.character_lock, "a grey owl");
}

#[test]
fn output_names_carry_the_run_code() {
    let style = StyleProfile::storybook();
    let name = output_file_name(&style);
    let prefix = format!("storybook_{}_", style.run_code());
    assert!(name.starts_with(&prefix), "{name}");
    assert!(name.ends_with(".pdf"));
    let suffix = &name[prefix.len()..name.len() - ".pdf".len()];
    assert_eq!(suffix.len(), 4);
    assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn placeholder_pages_are_counted() {
    let doc = PageAssembler::new(crate::PageSize::new(4, 4).unwrap())
        .assemble(Vec::new())
        .unwrap();
    let out = BookOutput {
        document: doc,
        reports: vec![
            PageReport {
                ordinal: 1,
                tier_used: Some(1),
                attempts: 1,
                degraded_artwork: false,
                degraded_caption: false,
            },
            PageReport {
                ordinal: 2,
                tier_used: None,
                attempts: 9,
                degraded_artwork: true,
                degraded_caption: false,
            },
        ],
    };
    assert_eq!(out.placeholder_pages(), 1);
}
