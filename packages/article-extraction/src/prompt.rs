//! Prompt variables built from an extraction result, and template rendering.
//!
//! Templates use `{name}` placeholders with `{{` and `}}` as literal braces.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::PromptError;
use crate::types::result::ExtractionResult;

/// Named string values for template rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PromptVariables {
    values: BTreeMap<String, String>,
}

impl PromptVariables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Variables for one extraction result.
    ///
    /// Headers and internal links are JSON arrays. Missing writer or editor
    /// text becomes an empty string.
    pub fn from_result(result: &ExtractionResult) -> Self {
        let mut vars = Self::new();
        vars.insert("article_url", result.article_url.as_str());
        vars.insert("article_title", result.article_title.as_str());
        vars.insert("article_text", result.article_text.as_str());
        vars.insert(
            "article_headers_info",
            to_json(&result.article_headers_info),
        );
        vars.insert(
            "article_internal_links",
            to_json(&result.article_internal_links),
        );
        vars.insert(
            "writer_page_text_1",
            result.writer_page_text_1.clone().unwrap_or_default(),
        );
        vars.insert(
            "editor_page_text_1",
            result.editor_page_text_1.clone().unwrap_or_default(),
        );
        for (name, value) in result.contributor_fields() {
            vars.insert(name, value);
        }
        vars
    }

    /// Add or replace a variable.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Variables sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Substitute every `{name}` in `template`.
    pub fn render(&self, template: &str) -> Result<String, PromptError> {
        let mut out = String::with_capacity(template.len());
        let mut chars = template.char_indices().peekable();

        while let Some((pos, c)) = chars.next() {
            match c {
                '{' => {
                    if matches!(chars.peek(), Some((_, '{'))) {
                        chars.next();
                        out.push('{');
                        continue;
                    }
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some((_, '}')) => break,
                            Some((inner, '{')) => {
                                return Err(PromptError::MalformedTemplate {
                                    position: inner,
                                    reason: "unexpected '{' inside placeholder".to_string(),
                                })
                            }
                            Some((_, ch)) => name.push(ch),
                            None => {
                                return Err(PromptError::MalformedTemplate {
                                    position: pos,
                                    reason: "unclosed '{'".to_string(),
                                })
                            }
                        }
                    }
                    let name = name.trim();
                    if name.is_empty() {
                        return Err(PromptError::MalformedTemplate {
                            position: pos,
                            reason: "empty placeholder".to_string(),
                        });
                    }
                    let value = self
                        .get(name)
                        .ok_or_else(|| PromptError::MissingVariable(name.to_string()))?;
                    out.push_str(value);
                }
                '}' => {
                    if matches!(chars.peek(), Some((_, '}'))) {
                        chars.next();
                        out.push('}');
                    } else {
                        return Err(PromptError::MalformedTemplate {
                            position: pos,
                            reason: "single '}' outside placeholder".to_string(),
                        });
                    }
                }
                _ => out.push(c),
            }
        }

        Ok(out)
    }
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "[]".to_string())
}

/// First `max_chars` characters of `text`, with `...` appended when cut.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::page::{Extracted, PageContent};
    use crate::types::result::{ContributorLink, ContributorRole};
    use crate::FieldStatus;

    #[test]
    fn test_render_substitutes_and_escapes() {
        let vars = PromptVariables::new()
            .with("article_title", "CDs vs. annuities")
            .with("selected_topic", "retirement");

        let rendered = vars
            .render("Title: {article_title}\nTopic: { selected_topic }\nJSON: {{\"k\": 1}}")
            .unwrap();

        assert_eq!(
            rendered,
            "Title: CDs vs. annuities\nTopic: retirement\nJSON: {\"k\": 1}"
        );
    }

    #[test]
    fn test_render_missing_variable() {
        let vars = PromptVariables::new();
        assert_eq!(
            vars.render("Hello {name}"),
            Err(PromptError::MissingVariable("name".to_string()))
        );
    }

    #[test]
    fn test_render_malformed() {
        let vars = PromptVariables::new().with("a", "1");
        assert!(matches!(
            vars.render("open {a"),
            Err(PromptError::MalformedTemplate { position: 5, .. })
        ));
        assert!(matches!(
            vars.render("stray } brace"),
            Err(PromptError::MalformedTemplate { position: 6, .. })
        ));
        assert!(matches!(
            vars.render("empty {}"),
            Err(PromptError::MalformedTemplate { .. })
        ));
    }

    #[test]
    fn test_from_result_fills_contract_names() {
        let result = ExtractionResult::assemble(
            Extracted::ok(PageContent::new("https://x.com/a", "<html/>", "Body", "Title")),
            Extracted::ok(vec![ContributorLink {
                url: "https://x.com/w".into(),
                role: ContributorRole::Writer,
                body_text: "Writer bio".into(),
                status: FieldStatus::Ok,
            }]),
            Extracted::ok(vec![]),
            Extracted::absent(),
        );

        let vars = PromptVariables::from_result(&result);

        assert_eq!(vars.get("article_title"), Some("Title"));
        assert_eq!(vars.get("article_headers_info"), Some("[]"));
        assert_eq!(vars.get("writer_page_text_1"), Some("Writer bio"));
        assert_eq!(vars.get("writer_page_url_1"), Some("https://x.com/w"));
        assert_eq!(vars.get("editor_page_text_1"), Some(""));
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("abcdef", 3), "abc...");
        assert_eq!(truncate_text("abc", 3), "abc");
        assert_eq!(truncate_text("héllo", 2), "hé...");
    }
}
