// enrich/translate.rs
use crate::config::TranslateConfig;
use crate::scraper::ScraperError;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub trait Translator {
    fn translate(&self, text: &str, from: &str, to: &str) -> Result<String, ScraperError>;
}

/// Used when no translation endpoint is configured.
pub struct PassthroughTranslator;

impl Translator for PassthroughTranslator {
    fn translate(&self, text: &str, _from: &str, _to: &str) -> Result<String, ScraperError> {
        Ok(text.to_string())
    }
}

#[derive(Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Deserialize)]
struct TranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

/// LibreTranslate-compatible client.
pub struct HttpTranslator {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpTranslator {
    pub fn new(endpoint: String, api_key: Option<String>) -> Result<Self, ScraperError> {
        let client = Client::builder().timeout(Duration::from_secs(15)).build()?;
        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }
}

impl Translator for HttpTranslator {
    fn translate(&self, text: &str, from: &str, to: &str) -> Result<String, ScraperError> {
        let body = TranslateRequest {
            q: text,
            source: from,
            target: to,
            format: "text",
            api_key: self.api_key.as_deref(),
        };

        let resp = self.client.post(&self.endpoint).json(&body).send()?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().unwrap_or_default();
            return Err(ScraperError::Enrich(format!("translate {status}: {text}")));
        }

        let parsed: TranslateResponse = resp.json()?;
        Ok(parsed.translated_text)
    }
}

pub fn build_translator(config: &TranslateConfig) -> Result<Box<dyn Translator>, ScraperError> {
    match &config.endpoint {
        Some(endpoint) => Ok(Box::new(HttpTranslator::new(
            endpoint.clone(),
            config.api_key.clone(),
        )?)),
        None => Ok(Box::new(PassthroughTranslator)),
    }
}

/// Italian to English, falling back to the original text when the service fails.
pub fn translate_or_original(translator: &dyn Translator, text: &str) -> String {
    if text.trim().is_empty() {
        return String::new();
    }
    match translator.translate(text, "it", "en") {
        Ok(t) => t,
        Err(e) => {
            tracing::warn!(error = %e, "Translation error");
            text.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    impl Translator for Failing {
        fn translate(&self, _: &str, _: &str, _: &str) -> Result<String, ScraperError> {
            Err(ScraperError::Enrich("down".into()))
        }
    }

    struct Upper;

    impl Translator for Upper {
        fn translate(&self, text: &str, _: &str, _: &str) -> Result<String, ScraperError> {
            Ok(text.to_uppercase())
        }
    }

    #[test]
    fn failure_keeps_original_text() {
        assert_eq!(translate_or_original(&Failing, "casa al mare"), "casa al mare");
    }

    #[test]
    fn empty_input_is_not_sent() {
        assert_eq!(translate_or_original(&Failing, "   "), "");
    }

    #[test]
    fn translated_text_is_returned() {
        assert_eq!(translate_or_original(&Upper, "vista mare"), "VISTA MARE");
    }

    #[test]
    fn request_omits_missing_key() {
        let body = TranslateRequest {
            q: "ciao",
            source: "it",
            target: "en",
            format: "text",
            api_key: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["q"], "ciao");
        assert!(json.get("api_key").is_none());
    }

    #[test]
    fn passthrough_without_endpoint() {
        let t = build_translator(&TranslateConfig::default()).unwrap();
        assert_eq!(t.translate("ciao", "it", "en").unwrap(), "ciao");
    }
}
