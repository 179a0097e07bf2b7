//! Purchase link generation
//!
//! Builds retailer search links for a book from its title, author, and
//! optional ISBN. Pure URL construction: no availability or price lookups
//! are made. The search query prefers ISBN over title+author over title
//! alone, since an ISBN pins the exact edition.

use reqwest::Url;
use serde::Serialize;

/// A supported retailer, in priority (display) order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Retailer {
    GoogleBooks,
    Amazon,
    Flipkart,
    BarnesNoble,
}

impl Retailer {
    /// All retailers, ordered by priority
    pub const ALL: [Retailer; 4] = [
        Retailer::GoogleBooks,
        Retailer::Amazon,
        Retailer::Flipkart,
        Retailer::BarnesNoble,
    ];

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Retailer::GoogleBooks => "Google Books",
            Retailer::Amazon => "Amazon",
            Retailer::Flipkart => "Flipkart",
            Retailer::BarnesNoble => "Barnes & Noble",
        }
    }

    fn search_url(&self, query: &str) -> Option<Url> {
        let result = match self {
            Retailer::GoogleBooks => Url::parse_with_params(
                "https://www.google.com/books/edition/_/search",
                &[("q", query)],
            ),
            Retailer::Amazon => Url::parse_with_params(
                "https://www.amazon.com/s",
                &[("k", query), ("i", "stripbooks")],
            ),
            Retailer::Flipkart => Url::parse_with_params(
                "https://www.flipkart.com/search",
                &[("q", query), ("marketplace", "FLIPKART")],
            ),
            Retailer::BarnesNoble => {
                Url::parse_with_params("https://www.barnesandnoble.com/s/", &[("Ntt", query)])
            }
        };
        result.ok()
    }
}

impl std::fmt::Display for Retailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A generated purchase link
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseLink {
    pub retailer: Retailer,
    pub name: &'static str,
    pub url: String,
}

/// Generate purchase links for a book, one per retailer, in priority order
///
/// Returns an empty list when there is nothing to search for.
pub fn purchase_links(title: &str, author: &str, isbn: Option<&str>) -> Vec<PurchaseLink> {
    let Some(query) = search_query(title, author, isbn) else {
        return Vec::new();
    };

    Retailer::ALL
        .iter()
        .filter_map(|&retailer| {
            retailer.search_url(&query).map(|url| PurchaseLink {
                retailer,
                name: retailer.name(),
                url: url.into(),
            })
        })
        .collect()
}

/// Build the search query: ISBN > title+author > title
fn search_query(title: &str, author: &str, isbn: Option<&str>) -> Option<String> {
    if let Some(isbn) = isbn {
        let normalized = normalize_isbn(isbn);
        if is_valid_isbn(&normalized) {
            return Some(normalized);
        }
    }

    let title = title.trim();
    let author = author.trim();
    match (title.is_empty(), author.is_empty()) {
        (true, _) => None,
        (false, true) => Some(title.to_string()),
        (false, false) => Some(format!("{} {}", title, author)),
    }
}

/// Strip hyphens and spaces from an ISBN
fn normalize_isbn(isbn: &str) -> String {
    isbn.chars().filter(|c| !matches!(c, '-' | ' ')).collect()
}

/// Check for an ISBN-10 or ISBN-13 shape (no checksum verification)
fn is_valid_isbn(isbn: &str) -> bool {
    match isbn.len() {
        // ISBN-10 may end in X
        10 => {
            isbn[..9].chars().all(|c| c.is_ascii_digit())
                && isbn
                    .chars()
                    .last()
                    .is_some_and(|c| c.is_ascii_digit() || c == 'X' || c == 'x')
        }
        13 => isbn.chars().all(|c| c.is_ascii_digit()),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_links_in_priority_order() {
        let links = purchase_links("Dune", "Frank Herbert", None);
        assert_eq!(links.len(), 4);
        assert_eq!(links[0].retailer, Retailer::GoogleBooks);
        assert_eq!(links[1].retailer, Retailer::Amazon);
        assert_eq!(links[3].retailer, Retailer::BarnesNoble);
    }

    #[test]
    fn test_query_prefers_isbn() {
        let links = purchase_links("Dune", "Frank Herbert", Some("978-0-441-17271-9"));
        assert!(links[1].url.contains("9780441172719"));
        assert!(!links[1].url.contains("Dune"));
    }

    #[test]
    fn test_invalid_isbn_falls_back_to_title_author() {
        let links = purchase_links("Dune", "Frank Herbert", Some("not-an-isbn"));
        assert!(links[1].url.contains("Dune"));
        assert!(links[1].url.contains("Herbert"));
    }

    #[test]
    fn test_title_only_query() {
        let links = purchase_links("Dune", "", None);
        assert!(links[0].url.contains("Dune"));
    }

    #[test]
    fn test_no_query_no_links() {
        assert!(purchase_links("", "", None).is_empty());
        assert!(purchase_links("   ", "", None).is_empty());
    }

    #[test]
    fn test_query_is_url_encoded() {
        let links = purchase_links("War & Peace", "Leo Tolstoy", None);
        // Ampersand must not survive as a parameter separator
        assert!(links[1].url.contains("War+%26+Peace") || links[1].url.contains("War%20%26%20Peace"));
    }

    #[test]
    fn test_isbn_validation() {
        assert!(is_valid_isbn("9780441172719"));
        assert!(is_valid_isbn("044117271X"));
        assert!(!is_valid_isbn("12345"));
        assert!(!is_valid_isbn("97804411727190"));
        assert!(!is_valid_isbn("abcdefghij"));
    }

    #[test]
    fn test_normalize_isbn() {
        assert_eq!(normalize_isbn("978-0-441-17271-9"), "9780441172719");
        assert_eq!(normalize_isbn("0 441 17271 X"), "044117271X");
    }

    #[test]
    fn test_amazon_link_targets_books() {
        let links = purchase_links("Dune", "", None);
        let amazon = links.iter().find(|l| l.retailer == Retailer::Amazon).unwrap();
        assert!(amazon.url.contains("i=stripbooks"));
    }
}
