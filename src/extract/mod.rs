//! Owner extraction from inscription pages.
//!
//! Pages render their metadata as label/value pairs (`<dt>address</dt>
//! <dd class="monospace">D...</dd>`). The owner is the value element
//! directly following the label whose text matches.

use crate::config::ExtractConfig;
use crate::error::OwnershipError;
use scraper::{ElementRef, Html, Selector};

/// Finds the value next to a fixed label.
#[derive(Debug, Clone)]
pub struct OwnerExtractor {
    label_selector: Selector,
    label: String,
    value_selector: Selector,
}

impl OwnerExtractor {
    /// Build an extractor, compiling the configured selectors.
    pub fn new(config: &ExtractConfig) -> Result<Self, OwnershipError> {
        Ok(Self {
            label_selector: compile(&config.label_selector)?,
            label: normalize(&config.label),
            value_selector: compile(&config.value_selector)?,
        })
    }

    /// Parse a document and return its owner.
    ///
    /// Zero-length content is an error. Whitespace-only content, a missing
    /// label, a mismatched value element or a blank value all yield `Ok(None)`.
    pub fn parse_owner(&self, file: &str, content: &str) -> Result<Option<String>, OwnershipError> {
        if content.is_empty() {
            return Err(OwnershipError::document(file, "HTML content cannot be empty"));
        }

        let document = Html::parse_document(content);
        Ok(self.find_value(&document))
    }

    /// Text of the first value element paired with a matching label.
    fn find_value(&self, document: &Html) -> Option<String> {
        let text = document
            .select(&self.label_selector)
            .filter(|label| normalize(&label.text().collect::<String>()) == self.label)
            .find_map(|label| self.value_after(label))?
            .text()
            .collect::<String>();

        let trimmed = text.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    /// Next element sibling of `label`, if it matches the value selector.
    fn value_after<'a>(&self, label: ElementRef<'a>) -> Option<ElementRef<'a>> {
        label
            .next_siblings()
            .find_map(ElementRef::wrap)
            .filter(|value| self.value_selector.matches(value))
    }
}

fn compile(selector: &str) -> Result<Selector, OwnershipError> {
    Selector::parse(selector).map_err(|e| OwnershipError::InvalidSelector {
        selector: selector.to_string(),
        reason: format!("{:?}", e),
    })
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> OwnerExtractor {
        OwnerExtractor::new(&ExtractConfig::default()).unwrap()
    }

    fn page(body: &str) -> String {
        format!("<html><body><dl>{}</dl></body></html>", body)
    }

    #[test]
    fn test_extracts_address() {
        let html = page(
            r#"<dt>id</dt><dd class="monospace">abc123i0</dd>
               <dt> Address </dt>
               <dd class="monospace"> DJu4Yc8mKzQe5fGhYjqWp </dd>"#,
        );

        let owner = extractor().parse_owner("a.html", &html).unwrap();
        assert_eq!(owner.as_deref(), Some("DJu4Yc8mKzQe5fGhYjqWp"));
    }

    #[test]
    fn test_blank_value_is_absent() {
        let html = page(r#"<dt>address</dt><dd class="monospace">   </dd>"#);
        assert_eq!(extractor().parse_owner("a.html", &html).unwrap(), None);
    }

    #[test]
    fn test_missing_label_is_absent() {
        let html = page(r#"<dt>owner</dt><dd class="monospace">DAddr</dd>"#);
        assert_eq!(extractor().parse_owner("a.html", &html).unwrap(), None);
    }

    #[test]
    fn test_value_must_match_selector() {
        let html = page(r#"<dt>address</dt><dd>DAddr</dd>"#);
        assert_eq!(extractor().parse_owner("a.html", &html).unwrap(), None);
    }

    #[test]
    fn test_only_immediate_sibling_counts() {
        let html = page(
            r#"<dt>address</dt><dt>other</dt><dd class="monospace">DAddr</dd>"#,
        );
        assert_eq!(extractor().parse_owner("a.html", &html).unwrap(), None);
    }

    #[test]
    fn test_empty_document_is_error() {
        let err = extractor().parse_owner("Doginal_Bat_#9.html", "").unwrap_err();
        assert!(matches!(err, OwnershipError::DocumentParse { ref file, .. } if file == "Doginal_Bat_#9.html"));
    }

    #[test]
    fn test_whitespace_document_has_no_owner() {
        assert_eq!(extractor().parse_owner("a.html", " \n\t").unwrap(), None);
    }

    #[test]
    fn test_invalid_selector_rejected() {
        let config = ExtractConfig {
            value_selector: "dd[".to_string(),
            ..ExtractConfig::default()
        };
        assert!(matches!(
            OwnerExtractor::new(&config),
            Err(OwnershipError::InvalidSelector { .. })
        ));
    }
}
