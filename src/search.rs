//! Web search redirect for the navbar search bar.
use url::Url;

/// Supported search engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchEngine {
    Baidu,
    Bing,
    Google,
}

impl SearchEngine {
    /// Parse an engine name from config (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "baidu" => Some(Self::Baidu),
            "bing" => Some(Self::Bing),
            "google" => Some(Self::Google),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Baidu => "Baidu",
            Self::Bing => "Bing",
            Self::Google => "Google",
        }
    }

    fn base_url(self) -> &'static str {
        match self {
            Self::Baidu => "https://www.baidu.com/s",
            Self::Bing => "https://www.bing.com/search",
            Self::Google => "https://www.google.com/search",
        }
    }

    fn query_param(self) -> &'static str {
        match self {
            Self::Baidu => "wd",
            Self::Bing | Self::Google => "q",
        }
    }

    /// Baidu → Bing → Google → Baidu.
    pub fn next(self) -> Self {
        match self {
            Self::Baidu => Self::Bing,
            Self::Bing => Self::Google,
            Self::Google => Self::Baidu,
        }
    }
}

/// The results page for `query`, or `None` if the query is blank.
pub fn search_url(engine: SearchEngine, query: &str) -> Option<Url> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }
    Url::parse_with_params(engine.base_url(), &[(engine.query_param(), query)]).ok()
}
