//! Environment variables take precedence over TOML files.

use figment::Jail;
use pmo_config::PmoConfig;
use pmo_redact::RedactionMode;

#[test]
fn env_sets_nested_values() {
    Jail::expect_with(|jail| {
        jail.set_env("PMO_REDACTION__MODE", "strict");
        jail.set_env("PMO_DATABASE__URL", "libsql://pmo-dev-acme.turso.io");
        jail.set_env("PMO_DATABASE__AUTH_TOKEN", "tok");
        jail.set_env("PMO_RETRY__MAX_ATTEMPTS", "2");

        let config = PmoConfig::load().expect("config loads");
        assert_eq!(config.redaction.mode, RedactionMode::Strict);
        assert!(config.database.is_remote_configured());
        assert_eq!(config.retry.max_attempts, 2);
        Ok(())
    });
}

#[test]
fn env_beats_project_file() {
    Jail::expect_with(|jail| {
        std::fs::create_dir(".pmo").map_err(|e| e.to_string())?;
        jail.create_file(".pmo/config.toml", "[redaction]\nmode = \"none\"\n")?;
        jail.set_env("PMO_REDACTION__MODE", "mask");

        let config = PmoConfig::load().expect("config loads");
        assert_eq!(config.redaction.mode, RedactionMode::Mask);
        Ok(())
    });
}

#[test]
fn env_with_bad_scheme_is_rejected() {
    Jail::expect_with(|jail| {
        jail.set_env("PMO_DATABASE__URL", "ftp://nowhere");

        assert!(PmoConfig::load().is_err());
        Ok(())
    });
}
