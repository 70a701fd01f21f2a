//! Title and meta description extraction from HTML.

use scraper::{Html, Selector};

use crate::models::PageMeta;

/// Read the first `<title>` and `<meta name="description">` from a document.
///
/// Missing elements yield empty strings.
pub fn parse_page_meta(html: &str) -> PageMeta {
    let document = Html::parse_document(html);

    let title = Selector::parse("title")
        .ok()
        .and_then(|selector| {
            document
                .select(&selector)
                .next()
                .map(|el| el.text().collect::<String>().trim().to_string())
        })
        .unwrap_or_default();

    let meta_description = Selector::parse("meta[name]")
        .ok()
        .and_then(|selector| {
            document
                .select(&selector)
                .find(|el| {
                    el.value()
                        .attr("name")
                        .is_some_and(|name| name.eq_ignore_ascii_case("description"))
                })
                .and_then(|el| el.value().attr("content"))
                .map(|content| content.trim().to_string())
        })
        .unwrap_or_default();

    PageMeta {
        title,
        meta_description,
    }
}
