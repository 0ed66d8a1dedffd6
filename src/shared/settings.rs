use serde::{Deserialize, Serialize};

use super::error::ConverterResult;

pub const DEFAULT_RATES_URL: &str = "https://api.exchangerate-api.com/v4/latest/USD";
pub const RATES_URL_ENV: &str = "CONVERTER_RATES_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub currency: CurrencySettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencySettings {
    /// Endpoint returning `{"rates": {"EUR": 0.92, ...}}` relative to USD
    pub rates_url: String,
    pub user_agent: String,
}

impl Default for CurrencySettings {
    fn default() -> Self {
        Self {
            rates_url: DEFAULT_RATES_URL.to_string(),
            user_agent: format!("converter-widget/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Settings {
    /// Parse settings handed over by the host page. Missing fields keep their defaults.
    pub fn from_json(raw: &str) -> ConverterResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Defaults, with the rates endpoint overridable through `CONVERTER_RATES_URL`.
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        if let Ok(url) = std::env::var(RATES_URL_ENV) {
            let url = url.trim();
            if !url.is_empty() {
                settings.currency.rates_url = url.to_string();
            }
        }
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoint() {
        let settings = Settings::default();
        assert_eq!(settings.currency.rates_url, DEFAULT_RATES_URL);
        assert!(settings.currency.user_agent.starts_with("converter-widget/"));
    }

    #[test]
    fn test_from_json_partial() {
        let settings = Settings::from_json(r#"{"currency": {"rates_url": "http://localhost:9/rates"}}"#).unwrap();
        assert_eq!(settings.currency.rates_url, "http://localhost:9/rates");
        assert_eq!(settings.currency.user_agent, CurrencySettings::default().user_agent);

        let empty = Settings::from_json("{}").unwrap();
        assert_eq!(empty, Settings::default());
    }

    #[test]
    fn test_from_env_override() {
        std::env::set_var(RATES_URL_ENV, "http://rates.internal/latest");
        let settings = Settings::from_env();
        std::env::remove_var(RATES_URL_ENV);
        assert_eq!(settings.currency.rates_url, "http://rates.internal/latest");
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(Settings::from_json("currency=1").is_err());
    }
}
