//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for safe, sandboxed env var manipulation.

use figment::{
    Figment, Jail,
    providers::{Env, Format, Serialized, Toml},
};
use mazy_config::{ConfigError, MazyConfig};

#[test]
fn loads_backend_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[backend]
url = "https://abc123.backend.mazylab.com"
anon_key = "anon-key"
service_key = "service-key"
"#,
        )?;

        let config: MazyConfig = Figment::from(Serialized::defaults(MazyConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.backend.url, "https://abc123.backend.mazylab.com");
        assert_eq!(config.backend.anon_key, "anon-key");
        assert_eq!(config.backend.service_key, "service-key");
        assert!(config.backend.is_configured());
        assert!(config.backend.has_service_key());
        Ok(())
    });
}

#[test]
fn loads_recovery_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[recovery]
admin_email = "root@mazylab.com"
bootstrap_password = "first-login"
"#,
        )?;

        let config: MazyConfig = Figment::from(Serialized::defaults(MazyConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.recovery.admin_email, "root@mazylab.com");
        assert_eq!(config.recovery.bootstrap_password, "first-login");
        Ok(())
    });
}

#[test]
fn missing_sections_fall_back_to_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[general]
data_dir = "/var/lib/mazylab"
"#,
        )?;

        let config: MazyConfig = Figment::from(Serialized::defaults(MazyConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.general.data_dir, "/var/lib/mazylab");
        assert!(!config.backend.is_configured());
        assert_eq!(config.recovery.admin_email, "admin@mazylab.com");
        Ok(())
    });
}

#[test]
fn env_var_overrides_toml() {
    Jail::expect_with(|jail| {
        jail.set_env("MAZY_BACKEND__URL", "https://from-env.mazylab.com");

        jail.create_file(
            "config.toml",
            r#"
[backend]
url = "https://from-toml.mazylab.com"
anon_key = "toml-key"
"#,
        )?;

        let config: MazyConfig = Figment::from(Serialized::defaults(MazyConfig::default()))
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("MAZY_").split("__"))
            .extract()?;

        // Env should win over TOML
        assert_eq!(config.backend.url, "https://from-env.mazylab.com");
        // TOML value not overridden by env should remain
        assert_eq!(config.backend.anon_key, "toml-key");
        Ok(())
    });
}

#[test]
fn wrong_field_type_surfaces_as_config_error() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[backend]
url = 42
"#,
        )?;

        let result: Result<MazyConfig, ConfigError> =
            Figment::from(Serialized::defaults(MazyConfig::default()))
                .merge(Toml::file("config.toml"))
                .extract()
                .map_err(ConfigError::from);

        let error = result.expect_err("an integer url must not extract");
        assert!(error.to_string().starts_with("configuration error:"));
        Ok(())
    });
}

/// Documents the figment gotcha: typo'd env var keys are silently ignored.
#[test]
fn typo_env_var_silently_ignored() {
    Jail::expect_with(|jail| {
        jail.set_env("MAZY_BACKEND__URLL", "https://typo.mazylab.com");

        let config: MazyConfig = Figment::from(Serialized::defaults(MazyConfig::default()))
            .merge(Env::prefixed("MAZY_").split("__"))
            .extract()?;

        assert!(
            config.backend.url.is_empty(),
            "typo'd env var should be silently ignored by figment"
        );
        Ok(())
    });
}
