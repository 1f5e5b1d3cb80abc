use figment::Jail;
use lens_config::LensConfig;

#[test]
fn timeout_env_value_is_numeric() {
    Jail::expect_with(|jail| {
        jail.set_env("UXLENS_API__TIMEOUT_SECS", "15");

        let config = LensConfig::load().expect("config loads");
        assert_eq!(config.api.timeout_secs, 15);
        Ok(())
    });
}

#[test]
fn zero_timeout_env_value_is_rejected() {
    Jail::expect_with(|jail| {
        jail.set_env("UXLENS_API__TIMEOUT_SECS", "0");

        assert!(LensConfig::load().is_err());
        Ok(())
    });
}

#[test]
fn unprefixed_env_is_ignored() {
    Jail::expect_with(|jail| {
        jail.set_env("API__BASE_URL", "http://ignored:1");

        let config = LensConfig::load().expect("config loads");
        assert_eq!(config.api.base_url, "http://localhost:8000");
        Ok(())
    });
}
