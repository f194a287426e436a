//! Cross-origin resource sharing.
//!
//! Credentials are allowed, so the response always names the requesting
//! origin instead of a wildcard.

const ALLOW_METHODS: &str = "DELETE, GET, HEAD, OPTIONS, PATCH, POST, PUT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsPolicy {
    allowed: Vec<String>,
    allow_any: bool,
}

impl CorsPolicy {
    pub fn new<I, S>(origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut allowed = Vec::new();
        let mut allow_any = false;
        for origin in origins {
            let origin = origin.as_ref().trim().trim_end_matches('/');
            match origin {
                "" => {},
                "*" => allow_any = true,
                _ => allowed.push(origin.to_string()),
            }
        }
        Self { allowed, allow_any }
    }

    pub fn is_allowed(&self, origin: &str) -> bool {
        self.allow_any || self.allowed.iter().any(|o| o == origin)
    }

    /// Headers for a regular response to a request from `origin`.
    pub fn response_headers(&self, origin: Option<&str>) -> Vec<(String, String)> {
        match origin {
            Some(origin) if self.is_allowed(origin) => vec![
                ("Access-Control-Allow-Origin".into(), origin.to_string()),
                ("Access-Control-Allow-Credentials".into(), "true".into()),
                ("Vary".into(), "Origin".into()),
            ],
            _ => Vec::new(),
        }
    }

    /// Headers for a preflight (`OPTIONS`) response.
    ///
    /// Requested headers are echoed back, which allows any header.
    pub fn preflight_headers(
        &self,
        origin: Option<&str>,
        requested_headers: Option<&str>,
    ) -> Vec<(String, String)> {
        let mut headers = self.response_headers(origin);
        if headers.is_empty() {
            return headers;
        }
        headers.push(("Access-Control-Allow-Methods".into(), ALLOW_METHODS.into()));
        if let Some(requested) = requested_headers.filter(|h| !h.trim().is_empty()) {
            headers.push(("Access-Control-Allow-Headers".into(), requested.to_string()));
        }
        headers.push(("Access-Control-Max-Age".into(), "600".into()));
        headers
    }
}
