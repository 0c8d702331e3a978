//! Visible text extraction from HTML.
//!
//! Only the `<body>` is read. Text inside `script`, `style`, `noscript` and
//! `template` elements is dropped. Block-level elements and `<br>` start a new
//! line, and whitespace within a line is collapsed, so each rendered block
//! becomes one paragraph for the segmenter.

use scraper::{ElementRef, Html, Node, Selector};

/// Elements whose text is never visible.
const HIDDEN: &[&str] = &["script", "style", "noscript", "template", "head"];

/// Elements rendered on their own line.
const BLOCK: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header",
    "hr", "li", "main", "nav", "ol", "p", "pre", "section", "table", "tr", "ul",
];

/// Returns the visible text of an HTML document, one block per line.
///
/// # Example
///
/// ```rust
/// use paradup::crawler::visible_text;
///
/// let html = "<body><p>One</p><script>x()</script><p>Two   words</p></body>";
/// assert_eq!(visible_text(html), "One\nTwo words");
/// ```
#[must_use]
pub fn visible_text(html: &str) -> String {
    let doc = Html::parse_document(html);
    let body = Selector::parse("body")
        .ok()
        .and_then(|sel| doc.select(&sel).next())
        .unwrap_or_else(|| doc.root_element());

    let mut raw = String::new();
    collect(body, &mut raw);

    raw.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn collect(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                // Source newlines are layout, not line breaks.
                out.extend(text.chars().map(|c| if c.is_whitespace() { ' ' } else { c }));
            },
            Node::Element(el) => {
                let name = el.name();
                if HIDDEN.contains(&name) {
                    continue;
                }
                if name == "br" {
                    out.push('\n');
                    continue;
                }
                let Some(child_ref) = ElementRef::wrap(child) else {
                    continue;
                };
                let block = BLOCK.contains(&name);
                if block {
                    out.push('\n');
                }
                collect(child_ref, out);
                if block {
                    out.push('\n');
                } else if matches!(name, "td" | "th") {
                    out.push(' ');
                }
            },
            _ => {},
        }
    }
}
