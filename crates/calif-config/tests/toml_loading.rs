//! Integration tests for TOML + environment configuration loading.
//!
//! Uses figment::Jail for sandboxed cwd and env var manipulation.

use calif_config::{CalifConfig, PROJECT_CONFIG_FILE};
use calif_core::GradingMode;
use figment::{
    Figment, Jail,
    providers::{Env, Format, Serialized, Toml},
};
use pretty_assertions::assert_eq;

#[test]
fn loads_all_sections_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[paths]
submissions_root = "/srv/entregas"
grading_root = "/srv/calificar"

[review]
open_files = false
audio_extensions = ["mp3", "ogg"]

[general]
default_mode = "individual"
"#,
        )?;

        let config: CalifConfig = Figment::from(Serialized::defaults(CalifConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.paths.submissions_root, "/srv/entregas");
        assert_eq!(config.paths.grading_root, "/srv/calificar");
        assert!(config.paths.is_configured());
        assert!(!config.review.open_files);
        assert_eq!(config.review.audio_extensions, vec!["mp3", "ogg"]);
        assert_eq!(config.general.default_mode, GradingMode::Individual);
        Ok(())
    });
}

#[test]
fn partial_toml_keeps_defaults_for_missing_fields() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[paths]
grading_root = "/srv/calificar"
"#,
        )?;

        let config: CalifConfig = Figment::from(Serialized::defaults(CalifConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert!(config.paths.submissions_root.is_empty());
        assert!(!config.paths.is_configured());
        assert!(config.review.open_files);
        assert_eq!(config.general.default_mode, GradingMode::Teams);
        Ok(())
    });
}

#[test]
fn project_file_is_picked_up_by_load() {
    Jail::expect_with(|jail| {
        jail.create_file(
            PROJECT_CONFIG_FILE,
            r#"
[paths]
submissions_root = "entregas"
grading_root = "calificar"
"#,
        )?;

        let config = CalifConfig::load().expect("config loads");
        assert_eq!(config.paths.submissions_root, "entregas");
        assert_eq!(config.paths.grading_root, "calificar");
        Ok(())
    });
}

#[test]
fn env_beats_project_file() {
    Jail::expect_with(|jail| {
        jail.create_file(
            PROJECT_CONFIG_FILE,
            r#"
[paths]
submissions_root = "from-toml"
"#,
        )?;
        jail.set_env("CALIF_PATHS__SUBMISSIONS_ROOT", "from-env");
        jail.set_env("CALIF_GENERAL__DEFAULT_MODE", "individual");

        let config = CalifConfig::load().expect("config loads");
        assert_eq!(config.paths.submissions_root, "from-env");
        assert_eq!(config.general.default_mode, GradingMode::Individual);
        Ok(())
    });
}

#[test]
fn single_underscore_env_is_ignored() {
    Jail::expect_with(|jail| {
        jail.set_env("CALIF_PATHS_GRADING_ROOT", "/wrong");

        let config: CalifConfig = Figment::from(Serialized::defaults(CalifConfig::default()))
            .merge(Env::prefixed("CALIF_").split("__"))
            .extract()?;

        assert!(config.paths.grading_root.is_empty());
        Ok(())
    });
}

#[test]
fn invalid_audio_extension_fails_load() {
    Jail::expect_with(|jail| {
        jail.create_file(
            PROJECT_CONFIG_FILE,
            r#"
[review]
audio_extensions = [".wav"]
"#,
        )?;

        let err = CalifConfig::load().expect_err("should reject dotted extension");
        assert!(err.to_string().contains("review.audio_extensions"));
        Ok(())
    });
}
