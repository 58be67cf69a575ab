use super::*;

fn scratch(name: &str) -> PathBuf {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("target")
        .join("unit_audit")
        .join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn entries_append_in_order() {
    let dir = scratch("append");
    let log = PromptLog::at(dir.join("prompts.txt"));
    log.record("page_1", "a fox in the snow").unwrap();
    log.record("page_1.tier2", "generic").unwrap();

    let text = std::fs::read_to_string(dir.join("prompts.txt")).unwrap();
    assert_eq!(
        text,
        "--- page_1 ---\na fox in the snow\n\n--- page_1.tier2 ---\ngeneric\n\n"
    );
}

#[test]
fn timestamped_log_lives_in_the_directory() {
    let dir = scratch("stamped");
    let log = PromptLog::timestamped_in(&dir.join("logs")).unwrap();
    let path = log.path().unwrap();
    let name = path.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("prompts_") && name.ends_with(".txt"));
    assert_eq!(name.len(), "prompts_YYYYmmdd_HHMMSS.txt".len());
    assert!(path.parent().unwrap().is_dir());
}

#[test]
fn disabled_log_is_silent() {
    let log = PromptLog::disabled();
    log.record("cover", "anything").unwrap();
    assert!(log.path().is_none());
}
