use serde::{Deserialize, Serialize};

const DEFAULT_API_URL: &str = "http://localhost:6689";
const DEFAULT_MAX_CANDIDATES: usize = 20;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct EngineConfig {
    /// Base URL of the host's search API, used by [`crate::api::ApiClient`].
    pub api_url: String,
    /// Upper bound on rows shown in the autocomplete menu.
    pub max_candidates: usize,
    /// Append a "create new tag" row when the typed tag does not exist yet.
    pub offer_new_tags: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            max_candidates: DEFAULT_MAX_CANDIDATES,
            offer_new_tags: true,
        }
    }
}

impl EngineConfig {
    /// Defaults, overridden by `window.ENV` when running in a browser.
    ///
    /// We support BOTH `API_URL` and `api_url` keys for the endpoint, matching what
    /// host pages already set.
    pub fn new() -> Self {
        let mut config = Self::default();
        config.apply_window_env();
        config
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[cfg(target_arch = "wasm32")]
    fn apply_window_env(&mut self) {
        let Some(env) = web_sys::window().and_then(|w| w.get("ENV")) else {
            return;
        };
        if env.is_undefined() || !env.is_object() {
            return;
        }

        let get = |key: &str| js_sys::Reflect::get(&env, &key.into()).ok();

        if let Some(url) = get("API_URL")
            .and_then(|v| v.as_string())
            .or_else(|| get("api_url").and_then(|v| v.as_string()))
        {
            self.api_url = url;
        }
        if let Some(n) = get("MAX_CANDIDATES").and_then(|v| v.as_f64()) {
            if n >= 1.0 {
                self.max_candidates = n as usize;
            }
        }
        if let Some(b) = get("OFFER_NEW_TAGS").and_then(|v| v.as_bool()) {
            self.offer_new_tags = b;
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn apply_window_env(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = EngineConfig::default();
        assert_eq!(c.api_url, "http://localhost:6689");
        assert_eq!(c.max_candidates, 20);
        assert!(c.offer_new_tags);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_new_without_browser_uses_defaults() {
        assert_eq!(EngineConfig::new(), EngineConfig::default());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let c = EngineConfig::from_json(r#"{"max_candidates": 5}"#).expect("config should parse");
        assert_eq!(c.max_candidates, 5);
        assert_eq!(c.api_url, "http://localhost:6689");
        assert!(c.offer_new_tags);
    }
}
