use job_scout::config::Config;

#[test]
fn parse_example_config() {
    let raw = include_str!("../job-scout.example.toml");
    let cfg: Config = toml::from_str(raw).expect("parse TOML");
    assert_eq!(cfg.global.steps_path, "steps.example.json");
    assert_eq!(cfg.postprocess.description_column, "JobDesc");
    assert!(!cfg.output.out_dir.is_empty());
}

#[test]
fn missing_sections_fall_back_to_defaults() {
    let cfg: Config = toml::from_str("[global]\nsleep_seconds = 1\n").expect("parse TOML");
    assert_eq!(cfg.global.sleep_seconds, 1);
    assert_eq!(cfg.global.steps_path, "steps.json");
    assert_eq!(cfg.browser.default_timeout_ms, 3000);
    assert_eq!(cfg.enrichment.title_column, "JobTitle");
}
