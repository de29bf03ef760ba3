//! Offset pagination over id-ordered listings.
//!
//! Pages are 1-indexed. Page `p` covers the zero-indexed rows
//! `[(p - 1) * QUESTIONS_PER_PAGE, p * QUESTIONS_PER_PAGE)`; the query layer
//! turns that into `LIMIT`/`OFFSET`.

use serde::{Deserialize, Deserializer};

pub const QUESTIONS_PER_PAGE: i64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page(i64);

impl Page {
    pub fn new(number: i64) -> Self {
        Page(number)
    }

    pub fn number(self) -> i64 {
        self.0
    }

    /// Pages below 1 address nothing.
    pub fn is_addressable(self) -> bool {
        self.0 >= 1
    }

    pub fn limit(self) -> i64 {
        QUESTIONS_PER_PAGE
    }

    pub fn offset(self) -> i64 {
        (self.0 - 1).saturating_mul(QUESTIONS_PER_PAGE)
    }

    /// The page a "next" link should point at, given how many rows this page held.
    ///
    /// A full page advances; anything shorter cycles back to the first page, even
    /// when the full page happened to be the last one.
    pub fn next(self, items_on_page: usize) -> Page {
        if items_on_page as i64 >= QUESTIONS_PER_PAGE {
            Page(self.0 + 1)
        } else {
            Page::default()
        }
    }

    pub fn next_link(self, url_root: &str, items_on_page: usize) -> String {
        format!(
            "{}questions?page={}",
            url_root,
            self.next(items_on_page).number()
        )
    }
}

impl Default for Page {
    fn default() -> Self {
        Page(1)
    }
}

// query strings like `?page=abc` should fall back to the default instead of rejecting the request
fn deserialize_lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.trim().parse::<i64>().ok()))
}

/// `?page=N` query string. Anything that is not an integer falls back to page 1.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default, deserialize_with = "deserialize_lenient_i64")]
    page: Option<i64>,
}

impl PageQuery {
    pub fn page(&self) -> Page {
        self.page.map(Page::new).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows_on_page(total: i64, page: Page) -> i64 {
        if !page.is_addressable() {
            return 0;
        }
        (total - page.offset()).clamp(0, page.limit())
    }

    #[test]
    fn offsets_follow_page_number() {
        assert_eq!(Page::new(1).offset(), 0);
        assert_eq!(Page::new(2).offset(), 10);
        assert_eq!(Page::new(7).offset(), 60);
        assert_eq!(Page::default().limit(), 10);
    }

    #[test]
    fn row_counts_match_page_window() {
        for total in [0, 1, 9, 10, 11, 19, 20, 35] {
            for p in 1..6 {
                let expected = (total - 10 * (p - 1)).max(0).min(10);
                assert_eq!(rows_on_page(total, Page::new(p)), expected, "L={total} p={p}");
            }
        }
    }

    #[test]
    fn non_positive_pages_are_not_addressable() {
        assert!(!Page::new(0).is_addressable());
        assert!(!Page::new(-3).is_addressable());
        assert!(Page::new(1).is_addressable());
    }

    #[test]
    fn full_page_advances_next_link() {
        assert_eq!(Page::new(1).next(10), Page::new(2));
        assert_eq!(
            Page::new(3).next_link("http://localhost:8080/", 10),
            "http://localhost:8080/questions?page=4"
        );
    }

    #[test]
    fn short_page_cycles_next_link_to_first_page() {
        // 19 questions: the second page holds 9 rows.
        assert_eq!(Page::new(2).next(9), Page::new(1));
        assert_eq!(Page::new(5).next(0), Page::new(1));
        assert_eq!(
            Page::new(2).next_link("http://trivia.local/", 9),
            "http://trivia.local/questions?page=1"
        );
    }

    #[test]
    fn page_query_defaults_to_first_page() {
        let query: PageQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.page(), Page::new(1));

        let query: PageQuery = serde_json::from_str(r#"{"page": "3"}"#).unwrap();
        assert_eq!(query.page(), Page::new(3));

        let query: PageQuery = serde_json::from_str(r#"{"page": "three"}"#).unwrap();
        assert_eq!(query.page(), Page::new(1));
    }

    #[test]
    fn lenient_page_parsing_drops_garbage() {
        let parse = |raw: &str| serde_json::from_str::<PageQuery>(raw).unwrap().page;
        assert_eq!(parse(r#"{"page": " -4 "}"#), Some(-4));
        assert_eq!(parse(r#"{"page": "1.5"}"#), None);
        assert_eq!(parse(r#"{"page": ""}"#), None);
    }
}
