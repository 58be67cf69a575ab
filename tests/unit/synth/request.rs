use super::request::*;
use crate::foundation::config::StyleProfile;

fn style() -> StyleProfile {
    StyleProfile {
        run_tag: "##ABCDEF12##".to_string(),
        art_style: "watercolor".to_string(),
        no_text: "no text".to_string(),
        negative: "blurry".to_string(),
        character_lock: "a small red fox with a blue scarf".to_string(),
        reminder: "same fox".to_string(),
        reserve_clause: None,
        generic_subject: "pastel meadow".to_string(),
        aspect_ratio: AspectRatio::Portrait3x4,
        guidance_strength: None,
    }
}

#[test]
fn full_text_joins_tags_prompt_and_negative() {
    let mut req = GenerationRequest::new("a hill.", AspectRatio::Square);
    req.style_tags = vec!["watercolor.".to_string(), "  ".to_string()];
    req.negative_constraints = "text".to_string();
    assert_eq!(req.full_text(), "watercolor. a hill --negative text");
}

#[test]
fn page_tiers_degrade_from_scene_to_generic() {
    let s = style();
    let tiers = PromptComposer::new(&s).page_tiers("the fox finds a key", Some("The fox woke up."));
    assert_eq!(tiers.len(), 3);

    let first = tiers[0].full_text();
    assert!(first.starts_with("a small red fox with a blue scarf. watercolor. Previously: The fox woke up. the fox finds a key"));
    assert!(first.contains("same fox"));
    assert!(first.contains("##ABCDEF12##"));
    assert!(first.ends_with("--negative blurry"));

    assert!(tiers[1].full_text().contains("a small red fox"));
    assert!(tiers[1].full_text().contains("pastel meadow"));
    assert!(!tiers[1].full_text().contains("finds a key"));

    assert!(!tiers[2].full_text().contains("red fox"));
    assert!(tiers[2].full_text().starts_with("watercolor. pastel meadow"));
    assert!(tiers.iter().all(|t| t.aspect_ratio == AspectRatio::Portrait3x4));
}

#[test]
fn reserve_clause_only_lands_in_the_primary_tier() {
    let s = style().with_reserved_band(10);
    let tiers = PromptComposer::new(&s).page_tiers("scene", None);
    assert!(tiers[0].full_text().contains("bottom 10% EMPTY"));
    assert!(!tiers[0].full_text().contains("Previously"));
    assert!(!tiers[2].full_text().contains("EMPTY"));
}

#[test]
fn cover_tiers_ask_for_a_banner() {
    let s = style();
    let tiers = PromptComposer::new(&s).cover_tiers("The fox and the moon");
    assert_eq!(tiers.len(), 3);
    assert!(tiers.iter().all(|t| t.full_text().contains("Front cover illustration")));
    assert!(tiers[0].full_text().contains("The fox and the moon"));
}

#[test]
fn empty_lock_is_dropped_from_tags() {
    let s = StyleProfile {
        character_lock: String::new(),
        ..style()
    };
    let tiers = PromptComposer::new(&s).page_tiers("scene", None);
    assert_eq!(tiers[0].style_tags, vec!["watercolor".to_string()]);
}

#[test]
fn aspect_ratio_strings() {
    assert_eq!(AspectRatio::parse("16:9").unwrap(), AspectRatio::Landscape16x9);
    assert_eq!(AspectRatio::Portrait3x4.as_str(), "3:4");
    assert!(AspectRatio::parse("2:1").is_err());
}
