use std::time::Duration;

use super::config::*;
use crate::layout::engine::{Alignment, ReservedRegion};

#[test]
fn run_tag_is_eight_uppercase_hex_between_markers() {
    let style = StyleProfile::storybook();
    assert!(style.run_tag.starts_with("##") && style.run_tag.ends_with("##"));
    let code = style.run_code();
    assert_eq!(code.len(), 8);
    assert!(
        code.chars()
            .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c))
    );
    assert_ne!(StyleProfile::fresh_run_tag(), StyleProfile::fresh_run_tag());
}

#[test]
fn reserved_band_clause_names_both_parts() {
    let style = StyleProfile::storybook().with_reserved_band(10);
    let clause = style.reserve_clause.unwrap();
    assert!(clause.contains("upper 90%"));
    assert!(clause.contains("bottom 10% EMPTY"));
}

#[test]
fn defaults_follow_the_storybook_layout() {
    let cfg = PipelineConfig::default();
    assert_eq!(cfg.page_size.width_pt, 595);
    assert_eq!(cfg.page_size.height_pt, 842);
    assert_eq!(cfg.working_size.width, 768);
    assert_eq!(cfg.working_size.height, 1024);
    assert_eq!(cfg.retry.max_attempts_per_tier, 3);
    assert_eq!(cfg.retry.per_attempt_timeout, Duration::from_secs(60));
    assert_eq!(cfg.placeholder.color.r, 220);
    assert_eq!(cfg.caption_mode, CaptionMode::Band { percent: 10 });
    cfg.validate().unwrap();
}

#[test]
fn caption_mode_parse_and_placement() {
    assert_eq!(
        CaptionMode::parse("band", 12).unwrap(),
        CaptionMode::Band { percent: 12 }
    );
    assert_eq!(
        CaptionMode::parse("Random-Edge", 10).unwrap(),
        CaptionMode::RandomEdge
    );
    assert!(CaptionMode::parse("sideways", 10).is_err());

    assert_eq!(
        CaptionMode::Band { percent: 10 }.placement(),
        (
            ReservedRegion::BottomBand { percent: 10 },
            Alignment::CenteredInBand
        )
    );
    assert_eq!(CaptionMode::TopBanner.reserved_percent(), None);
}

#[test]
fn validate_rejects_degenerate_settings() {
    let mut cfg = PipelineConfig::default();
    cfg.retry.max_attempts_per_tier = 0;
    assert!(cfg.validate().is_err());

    let mut cfg = PipelineConfig::default();
    cfg.retry.per_attempt_timeout = Duration::ZERO;
    assert!(cfg.validate().is_err());

    let mut cfg = PipelineConfig::default();
    cfg.caption_mode = CaptionMode::Band { percent: 80 };
    assert!(cfg.validate().is_err());
}
