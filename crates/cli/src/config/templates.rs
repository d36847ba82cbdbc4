use pluginforge_core::BuildConfig;
use pluginforge_core::config::default_steps;

/// Default configuration with every step spelled out, ready to edit.
pub fn create_default_config() -> String {
    let config = BuildConfig {
        plugins_dir: ".".into(),
        output_dir: "build".into(),
        steps: Some(default_steps()),
        tolerated_steps: Some(vec!["grunt_css".to_string(), "grunt_js".to_string()]),
        ..Default::default()
    };

    serde_json::to_string_pretty(&config).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_round_trips() {
        let json = create_default_config();
        let parsed: BuildConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.step_specs().len(), 6);
        assert_eq!(parsed.name_prefix, "wp-");
        assert!(parsed.policy_table().is_tolerated("grunt_js"));
        assert!(parsed.validate().is_ok());
    }
}
