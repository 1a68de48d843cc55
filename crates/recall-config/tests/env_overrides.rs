//! Environment variables beat files and defaults.

use figment::Jail;
use recall_config::RecallConfig;

#[test]
fn env_vars_map_to_nested_sections() {
    Jail::expect_with(|jail| {
        jail.set_env("RECALL_WANIKANI__API_TOKEN", "from-env");
        jail.set_env("RECALL_SESSION__TOP_K", "5");
        jail.set_env("RECALL_COMMENTARY__ENABLED", "false");

        let config = RecallConfig::load().expect("config loads");
        assert_eq!(config.wanikani.api_token, "from-env");
        assert_eq!(config.session.top_k, 5);
        assert!(!config.commentary.enabled);
        Ok(())
    });
}

#[test]
fn env_beats_project_file() {
    Jail::expect_with(|jail| {
        jail.create_dir(".recall")?;
        jail.create_file(".recall/config.toml", "[session]\nsummary_cap = 900\n")?;
        jail.set_env("RECALL_SESSION__SUMMARY_CAP", "300");

        let config = RecallConfig::load().expect("config loads");
        assert_eq!(config.session.summary_cap, 300);
        Ok(())
    });
}

#[test]
fn single_underscore_does_not_nest() {
    Jail::expect_with(|jail| {
        jail.set_env("RECALL_WANIKANI_API_TOKEN", "ignored");

        let config = RecallConfig::load().expect("config loads");
        assert!(!config.wanikani.is_configured());
        Ok(())
    });
}
