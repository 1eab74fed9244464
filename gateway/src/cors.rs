//! CORS response headers
//!
//! The policy is loaded once from configuration and never changes. Resolution
//! never fails: without a usable request origin the configured default is
//! emitted.

/// `Access-Control-Allow-Origin`
pub const ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";
/// `Access-Control-Allow-Headers`
pub const ALLOW_HEADERS: &str = "Access-Control-Allow-Headers";
/// `Access-Control-Allow-Methods`
pub const ALLOW_METHODS: &str = "Access-Control-Allow-Methods";

/// Request headers the browser may send
pub const ALLOWED_HEADERS: [&str; 3] = ["Content-Type", "X-User-Sub", "X-User-Email"];
/// Methods accepted by the mutation endpoints
pub const ALLOWED_METHODS: [&str; 2] = ["POST", "OPTIONS"];

/// Origin policy
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CorsPolicy {
    /// Any origin; the request origin is echoed back when known
    #[default]
    Wildcard,
    /// Explicit origins, in configured order
    AllowList(Vec<String>),
}

impl CorsPolicy {
    /// Parses `"*"` or a comma-separated origin list.
    ///
    /// Entries are trimmed and blanks dropped; a policy with no entries left
    /// is treated as the wildcard default.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw == "*" {
            return Self::Wildcard;
        }
        let origins: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();
        if origins.is_empty() {
            Self::Wildcard
        } else {
            Self::AllowList(origins)
        }
    }

    /// Value of `Access-Control-Allow-Origin` for a request from `origin`.
    ///
    /// An unlisted origin receives the first configured entry.
    pub fn allow_origin(&self, origin: Option<&str>) -> String {
        let origin = origin.map(str::trim).filter(|o| !o.is_empty());
        match (self, origin) {
            (Self::Wildcard, Some(origin)) => origin.to_string(),
            (Self::Wildcard, None) => "*".to_string(),
            (Self::AllowList(allowed), Some(origin))
                if allowed.iter().any(|entry| entry == origin) =>
            {
                origin.to_string()
            }
            (Self::AllowList(allowed), _) => allowed
                .first()
                .cloned()
                .unwrap_or_else(|| "*".to_string()),
        }
    }

    /// The three CORS response headers for a request from `origin`
    pub fn headers(&self, origin: Option<&str>) -> [(&'static str, String); 3] {
        [
            (ALLOW_ORIGIN, self.allow_origin(origin)),
            (ALLOW_HEADERS, ALLOWED_HEADERS.join(", ")),
            (ALLOW_METHODS, ALLOWED_METHODS.join(", ")),
        ]
    }
}
