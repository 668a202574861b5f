use pmo_config::PmoConfig;

/// Emit warnings for likely mistyped env var keys that silently fell back to defaults.
pub fn warn_unconfigured(config: &PmoConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &PmoConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();

    let mut warnings = Vec::new();

    if !config.database.is_remote_configured() && has_remote_database_key(&env_keys) {
        warnings.push(
            "Remote database config appears incomplete while PMO_DATABASE* env vars exist. Set both PMO_DATABASE__URL and PMO_DATABASE__AUTH_TOKEN (double underscores)."
                .to_string(),
        );
    }

    if has_env_prefix(&env_keys, "PMO_REDACTION_")
        && !has_env_prefix(&env_keys, "PMO_REDACTION__")
    {
        warnings.push(
            "PMO_REDACTION_* env vars use a single underscore and are ignored. Use double underscores (example: PMO_REDACTION__MODE)."
                .to_string(),
        );
    }

    warnings
}

fn has_env_prefix(keys: &[String], prefix: &str) -> bool {
    keys.iter().any(|key| key.starts_with(prefix))
}

fn has_remote_database_key(keys: &[String]) -> bool {
    keys.iter().any(|key| {
        key.starts_with("PMO_DATABASE") && (key.ends_with("URL") || key.ends_with("AUTH_TOKEN"))
    })
}

#[cfg(test)]
mod tests {
    use pmo_config::{DatabaseConfig, PmoConfig};

    use super::collect_unconfigured_warnings;

    fn env(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn warns_for_half_configured_database() {
        let config = PmoConfig::default();
        let warnings = collect_unconfigured_warnings(
            &config,
            env(&[("PMO_DATABASE__URL", "libsql://demo.turso.io")]),
        );
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("PMO_DATABASE__AUTH_TOKEN"));
    }

    #[test]
    fn warns_for_single_underscore_redaction_keys() {
        let config = PmoConfig::default();
        let warnings =
            collect_unconfigured_warnings(&config, env(&[("PMO_REDACTION_MODE", "strict")]));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("PMO_REDACTION__MODE"));
    }

    #[test]
    fn local_path_alone_does_not_warn() {
        let config = PmoConfig::default();
        let warnings = collect_unconfigured_warnings(
            &config,
            env(&[("PMO_DATABASE__LOCAL_PATH", "/tmp/pmo.db")]),
        );
        assert!(warnings.is_empty());
    }

    #[test]
    fn does_not_warn_when_configured() {
        let config = PmoConfig {
            database: DatabaseConfig {
                url: "libsql://demo.turso.io".to_string(),
                auth_token: "token".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        let warnings = collect_unconfigured_warnings(
            &config,
            env(&[
                ("PMO_DATABASE__URL", "libsql://demo.turso.io"),
                ("PMO_DATABASE__AUTH_TOKEN", "token"),
                ("PMO_REDACTION__MODE", "strict"),
            ]),
        );
        assert!(warnings.is_empty());
    }
}
