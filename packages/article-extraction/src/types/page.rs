//! Fetched page content and per-field extraction status.

use serde::{Deserialize, Serialize};

/// A fetched page with its extracted text.
///
/// Produced once per fetched URL and never modified afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageContent {
    /// URL that was requested
    pub url: String,

    /// URL the page was served from after redirects
    pub final_url: String,

    /// Raw HTML as received
    pub raw_html: String,

    /// Plain-text body
    pub body_text: String,

    /// Page title with branding suffixes stripped
    pub title: String,
}

impl PageContent {
    pub fn new(
        url: impl Into<String>,
        raw_html: impl Into<String>,
        body_text: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        let url = url.into();
        Self {
            final_url: url.clone(),
            url,
            raw_html: raw_html.into(),
            body_text: body_text.into(),
            title: title.into(),
        }
    }

    /// Record where the page actually came from (builder pattern).
    pub fn with_final_url(mut self, final_url: impl Into<String>) -> Self {
        self.final_url = final_url.into();
        self
    }

    /// Empty page for a URL that could not be processed.
    pub fn empty(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            final_url: url.clone(),
            url,
            ..Default::default()
        }
    }

    /// Body length in characters, not bytes.
    pub fn body_chars(&self) -> usize {
        self.body_text.chars().count()
    }

    /// Check if this page has body text.
    pub fn has_content(&self) -> bool {
        !self.body_text.trim().is_empty()
    }
}

/// Outcome of extracting one field group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FieldStatus {
    /// Extraction ran and produced the value
    #[default]
    Ok,

    /// The structure the value comes from does not exist on the page
    Absent,

    /// Extraction failed; the value is a placeholder
    Failed { reason: String },
}

impl FieldStatus {
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// A value together with how it was obtained.
///
/// Failures keep a usable placeholder in `value` so callers that do not
/// care can read it directly, while `status` tells "empty" from "failed".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extracted<T> {
    pub value: T,
    pub status: FieldStatus,
}

impl<T> Extracted<T> {
    pub fn ok(value: T) -> Self {
        Self {
            value,
            status: FieldStatus::Ok,
        }
    }

    /// Wrap a placeholder value with an explicit status.
    pub fn with_status(value: T, status: FieldStatus) -> Self {
        Self { value, status }
    }

    pub fn is_ok(&self) -> bool {
        self.status.is_ok()
    }

    /// Drop the status and keep the value (placeholder on failure).
    pub fn into_value(self) -> T {
        self.value
    }

    /// The value if extraction succeeded.
    pub fn ok_value(self) -> Option<T> {
        match self.status {
            FieldStatus::Ok => Some(self.value),
            _ => None,
        }
    }
}

impl<T: Default> Extracted<T> {
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::with_status(T::default(), FieldStatus::failed(reason))
    }

    pub fn absent() -> Self {
        Self::with_status(T::default(), FieldStatus::Absent)
    }
}
