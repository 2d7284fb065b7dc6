use std::env;

/// Default base URL for the local AmpCode-compatible service
pub const AMPCODE_DEFAULT_BASE_URL: &str = "http://127.0.0.1:8317/v1";

/// Host and port probed when auto-detecting the local service
pub const LOCAL_SERVICE_ADDR: &str = "127.0.0.1:8317";

/// Settings read once from the process environment at startup.
///
/// Everything credential-related lives here so the rest of the code never
/// reaches into environment variables directly.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub openai_api_key: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub minimax_api_key: Option<String>,
    pub qwen_api_key: Option<String>,
    pub ampcode_api_key: Option<String>,
    pub ampcode_base_url: Option<String>,
}

impl Settings {
    /// Build settings from the process environment
    pub fn from_env() -> Self {
        Self {
            openai_api_key: non_empty_var("OPENAI_API_KEY"),
            anthropic_api_key: non_empty_var("ANTHROPIC_API_KEY"),
            minimax_api_key: non_empty_var("MINIMAX_API_KEY"),
            qwen_api_key: non_empty_var("QWEN_API_KEY"),
            ampcode_api_key: non_empty_var("AMPCODE_API_KEY"),
            ampcode_base_url: non_empty_var("AMPCODE_BASE_URL"),
        }
    }

    /// Whether any cloud credential is configured
    pub fn has_any_api_key(&self) -> bool {
        self.openai_api_key.is_some()
            || self.anthropic_api_key.is_some()
            || self.minimax_api_key.is_some()
            || self.qwen_api_key.is_some()
    }

    /// Effective base URL for the local AmpCode-compatible service
    pub fn ampcode_url(&self) -> String {
        self.ampcode_base_url
            .clone()
            .unwrap_or_else(|| AMPCODE_DEFAULT_BASE_URL.to_string())
    }
}

/// Read an environment variable, treating empty values as unset
fn non_empty_var(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_have_no_keys() {
        let settings = Settings::default();
        assert!(!settings.has_any_api_key());
        assert!(settings.ampcode_api_key.is_none());
    }

    #[test]
    fn test_has_any_api_key() {
        let mut settings = Settings::default();
        assert!(!settings.has_any_api_key());

        settings.qwen_api_key = Some("sk-test".to_string());
        assert!(settings.has_any_api_key());
    }

    #[test]
    fn test_ampcode_key_does_not_count_as_cloud_credential() {
        let settings = Settings {
            ampcode_api_key: Some("local-key".to_string()),
            ..Default::default()
        };
        assert!(!settings.has_any_api_key());
    }

    #[test]
    fn test_ampcode_url_default_and_override() {
        let settings = Settings::default();
        assert_eq!(settings.ampcode_url(), AMPCODE_DEFAULT_BASE_URL);

        let settings = Settings {
            ampcode_base_url: Some("http://localhost:9999/v1".to_string()),
            ..Default::default()
        };
        assert_eq!(settings.ampcode_url(), "http://localhost:9999/v1");
    }
}
