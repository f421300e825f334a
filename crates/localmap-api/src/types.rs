//! Wire envelopes specific to the backend's response shapes.

use serde::Deserialize;

/// Spring-style pagination envelope: `{"content": [...], ...}`.
///
/// Only `content` is consumed; total counts and page metadata are ignored.
/// A missing `content` field deserializes as an empty page.
#[derive(Debug, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_with_content() {
        let page: Page<i32> = serde_json::from_str(r#"{"content":[1,2,3],"totalPages":5}"#)
            .expect("page should parse");
        assert_eq!(page.content, vec![1, 2, 3]);
    }

    #[test]
    fn page_without_content_is_empty() {
        let page: Page<i32> = serde_json::from_str("{}").expect("page should parse");
        assert!(page.content.is_empty());
    }
}
