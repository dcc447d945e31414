//! Request template for one side of the comparison

use crate::types::{AppError, Result, Side};
use reqwest::Method;
use serde::{Deserialize, Serialize};

/// One side (X or Y) of the comparison: what to send and where.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestSpec {
    /// HTTP method, e.g. `GET` or `POST`
    pub method: String,

    /// Target URL
    pub url: String,

    /// Optional request body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    /// Content type sent with the body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_type: Option<String>,
}

impl Default for RequestSpec {
    fn default() -> Self {
        Self {
            method: crate::defaults::DEFAULT_METHOD.to_string(),
            url: String::new(),
            body: None,
            body_type: Some(crate::defaults::DEFAULT_BODY_TYPE.to_string()),
        }
    }
}

impl RequestSpec {
    /// Create a bodiless request template
    pub fn new<M: Into<String>, U: Into<String>>(method: M, url: U) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            body: None,
            body_type: None,
        }
    }

    /// Create a GET request template
    pub fn get<U: Into<String>>(url: U) -> Self {
        Self::new("GET", url)
    }

    /// Attach a body and its content type
    pub fn with_body<B: Into<String>, T: Into<String>>(mut self, body: B, body_type: T) -> Self {
        self.body = Some(body.into());
        self.body_type = Some(body_type.into());
        self
    }

    /// Body and content type to send, if both are non-empty.
    ///
    /// A body without a content type (or the other way round) is not sent.
    pub fn payload(&self) -> Option<(&str, &str)> {
        match (self.body.as_deref(), self.body_type.as_deref()) {
            (Some(body), Some(body_type)) if !body.is_empty() && !body_type.is_empty() => {
                Some((body, body_type))
            }
            _ => None,
        }
    }

    /// True when a body string is configured but will be dropped
    pub fn has_stray_body(&self) -> bool {
        self.body.as_deref().is_some_and(|b| !b.is_empty()) && self.payload().is_none()
    }

    /// Parse the configured method
    pub fn http_method(&self) -> Result<Method> {
        Method::from_bytes(self.method.trim().to_uppercase().as_bytes())
            .map_err(|e| AppError::validation(format!("Invalid HTTP method '{}': {}", self.method, e)))
    }

    /// Check that the template can produce a request
    pub fn validate(&self, side: Side) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(AppError::config("URL(s) not supplied"));
        }

        let parsed = url::Url::parse(&self.url)
            .map_err(|e| AppError::config(format!("Invalid {} URL '{}': {}", side, self.url, e)))?;

        match parsed.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(AppError::config(format!(
                    "Unsupported {} URL scheme '{}': must be http or https",
                    side, scheme
                )))
            }
        }

        if parsed.host().is_none() {
            return Err(AppError::config(format!("{} URL must have a host", side)));
        }

        self.http_method()
            .map_err(|e| AppError::config(format!("{} method: {}", side, e)))?;

        Ok(())
    }
}
