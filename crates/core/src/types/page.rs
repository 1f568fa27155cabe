//! CMS content pages (Our Story, shipping policy and the like).

use serde::{Deserialize, Serialize};

use super::PageId;

/// A published content page. Title and bodies are rendered HTML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub id: PageId,
    pub slug: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub excerpt: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_excerpt_defaults_to_empty() {
        let page: Page = serde_json::from_str(
            r#"{"id": "12", "slug": "our-story", "title": "Our Story", "content": "<p>Oaxaca</p>"}"#,
        )
        .unwrap();
        assert_eq!(page.id.as_str(), "12");
        assert_eq!(page.excerpt, "");
    }
}
