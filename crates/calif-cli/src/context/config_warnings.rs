use calif_config::CalifConfig;

/// Emit warnings for likely mistyped env var keys that silently fell back to defaults.
pub fn warn_unconfigured(config: &CalifConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &CalifConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();
    let mut warnings = Vec::new();

    if !config.paths.is_configured() && has_single_underscore_key(&env_keys, "CALIF_PATHS") {
        warnings.push(
            "paths config appears default while CALIF_PATHS_* env vars exist. Use double underscores (example: CALIF_PATHS__SUBMISSIONS_ROOT)."
                .to_string(),
        );
    }

    for section in ["REVIEW", "GENERAL"] {
        let prefix = format!("CALIF_{section}");
        if has_single_underscore_key(&env_keys, &prefix) {
            warnings.push(format!(
                "{prefix}_* env vars are ignored. Use double underscores (example: {prefix}__<KEY>)."
            ));
        }
    }

    warnings
}

/// `<prefix>_X` set without the `<prefix>__X` form figment reads.
fn has_single_underscore_key(keys: &[String], prefix: &str) -> bool {
    keys.iter().any(|key| {
        key.strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('_') && !rest.starts_with("__"))
    })
}
