//! Link extraction from a search results page.
//!
//! Organic results sit in `div.g` containers whose first `h3 > a` points at
//! an internal redirect (`/url?q=<destination>&sa=...`). Ads and other
//! widgets either lack that heading link or link elsewhere; both are skipped.
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

const REDIRECT_PREFIX: &str = "/url?";

static RESULT_CONTAINER: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.g").expect("static result selector"));
static HEADING_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h3 > a").expect("static heading selector"));

/// Destination URLs of every organic result, in document order, duplicates kept.
pub fn extract_entries(document: &Html) -> Vec<String> {
    document
        .select(&RESULT_CONTAINER)
        .filter_map(container_destination)
        .collect()
}

fn container_destination(container: ElementRef<'_>) -> Option<String> {
    let link = container.select(&HEADING_LINK).next()?;
    let href = link.value().attr("href")?;
    parse_redirect(href)
}

/// Destination of an internal redirect link, i.e. its first non-empty `q`
/// parameter. `None` for anything else.
///
/// ```
/// use warden_search::extract::parse_redirect;
///
/// assert_eq!(
///     parse_redirect("/url?q=https://www.rust-lang.org/&sa=U").as_deref(),
///     Some("https://www.rust-lang.org/")
/// );
/// assert_eq!(parse_redirect("https://ads.example/click"), None);
/// ```
pub fn parse_redirect(href: &str) -> Option<String> {
    let query = href.strip_prefix(REDIRECT_PREFIX)?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(k, v)| k == "q" && !v.is_empty())
        .map(|(_, v)| v.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
<html><body>
  <div id="search">
    <div class="g">
      <h3><a href="/url?q=https://doc.rust-lang.org/book/&amp;sa=U&amp;ved=abc">The Book</a></h3>
    </div>
    <div class="g"><span>People also ask</span></div>
    <div class="g">
      <h3><a href="https://www.googleadservices.com/pagead/aclk?sa=L">Sponsored</a></h3>
    </div>
    <div class="g">
      <h3><a href="/url?q=https%3A%2F%2Fdocs.rs%2Ftokio%3Fsearch%3Dspawn&amp;sa=U">tokio</a></h3>
      <h3><a href="/url?q=https://ignored.example/">second heading</a></h3>
    </div>
    <div class="g">
      <h3><a href="/url?q=https://doc.rust-lang.org/book/&amp;sa=U">The Book again</a></h3>
    </div>
  </div>
</body></html>
"#;

    #[test]
    fn extracts_organic_results_in_order() {
        let doc = Html::parse_document(PAGE);
        assert_eq!(
            extract_entries(&doc),
            vec![
                "https://doc.rust-lang.org/book/",
                "https://docs.rs/tokio?search=spawn",
                "https://doc.rust-lang.org/book/",
            ]
        );
    }

    #[test]
    fn heading_link_must_be_a_direct_child() {
        let doc = Html::parse_document(
            r#"<div class="g"><h3><span><a href="/url?q=https://x.example/">x</a></span></h3></div>"#,
        );
        assert!(extract_entries(&doc).is_empty());
    }

    #[test]
    fn container_class_is_matched_as_a_token() {
        let doc = Html::parse_document(
            r#"<div class="g tF2Cxc"><h3><a href="/url?q=https://y.example/">y</a></h3></div>
               <div class="gx"><h3><a href="/url?q=https://z.example/">z</a></h3></div>"#,
        );
        assert_eq!(extract_entries(&doc), vec!["https://y.example/"]);
    }

    #[test]
    fn redirects_without_destination_are_rejected() {
        assert_eq!(parse_redirect("/url?sa=U&ved=1"), None);
        assert_eq!(parse_redirect("/url?q=&sa=U"), None);
        assert_eq!(parse_redirect("/search?q=rust"), None);
        assert_eq!(
            parse_redirect("/url?sa=U&q=https://a.example/&q=https://b.example/").as_deref(),
            Some("https://a.example/")
        );
    }
}
