use super::Config;

fn non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

impl Config {
    pub fn apply_env_overrides(&mut self) {
        if let Some(url) = non_empty("REPORTWRITER_PROXY_URL") {
            self.proxy_url = url;
        }

        if let Some(model) = non_empty("REPORTWRITER_MODEL") {
            self.default_model = Some(model);
        }

        if let Some(endpoint) = non_empty("REPORTWRITER_USAGE_ENDPOINT") {
            self.usage.endpoint = Some(endpoint);
        }

        if let Some(secret) = non_empty("REPORTWRITER_USAGE_SECRET") {
            self.usage.secret = Some(secret);
        }

        if let Some(key) = non_empty("GEMINI_API_KEY") {
            self.gateway.api_key = Some(key);
        }

        if let Ok(port_str) =
            std::env::var("REPORTWRITER_GATEWAY_PORT").or_else(|_| std::env::var("PORT"))
            && let Ok(port) = port_str.parse::<u16>()
        {
            self.gateway.port = port;
        }

        if let Ok(host) =
            std::env::var("REPORTWRITER_GATEWAY_HOST").or_else(|_| std::env::var("HOST"))
            && !host.is_empty()
        {
            self.gateway.host = host;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_env::{ENV_LOCK, EnvVarGuard};
    use super::*;

    #[test]
    fn env_overrides_proxy_and_gateway() {
        let _lock = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let _url = EnvVarGuard::set("REPORTWRITER_PROXY_URL", "https://proxy.example/api/generate");
        let _key = EnvVarGuard::set("GEMINI_API_KEY", "k-123");
        let _port = EnvVarGuard::set("REPORTWRITER_GATEWAY_PORT", "9911");
        let _host = EnvVarGuard::unset("REPORTWRITER_GATEWAY_HOST");
        let _bare_host = EnvVarGuard::unset("HOST");

        let mut config = Config::default();
        config.apply_env_overrides();

        assert_eq!(config.proxy_url, "https://proxy.example/api/generate");
        assert_eq!(config.gateway.api_key.as_deref(), Some("k-123"));
        assert_eq!(config.gateway.port, 9911);
        assert_eq!(config.gateway.host, "127.0.0.1");
    }

    #[test]
    fn invalid_port_is_ignored() {
        let _lock = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let _port = EnvVarGuard::set("REPORTWRITER_GATEWAY_PORT", "not-a-port");

        let mut config = Config::default();
        config.apply_env_overrides();

        assert_eq!(config.gateway.port, 8787);
    }

    #[test]
    fn empty_values_do_not_clear_settings() {
        let _lock = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let _model = EnvVarGuard::set("REPORTWRITER_MODEL", "");

        let mut config = Config {
            default_model: Some("gemini-2.5-pro".into()),
            ..Config::default()
        };
        config.apply_env_overrides();

        assert_eq!(config.default_model.as_deref(), Some("gemini-2.5-pro"));
    }
}
