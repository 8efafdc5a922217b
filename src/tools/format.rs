//! Text rendering shared by the tools

use crate::substack::PostSummary;
use scraper::{ElementRef, Html, Node};

/// `{header}:\n\n` followed by one numbered entry per post
pub fn post_list(header: &str, posts: &[PostSummary]) -> String {
    let mut text = format!("{}:\n\n", header);
    push_posts(&mut text, posts);
    text
}

pub fn push_posts(text: &mut String, posts: &[PostSummary]) {
    for (i, post) in posts.iter().enumerate() {
        text.push_str(&format!(
            "{}. {} - {}\n   URL: {}\n\n",
            i + 1,
            post.title,
            post.published_at,
            post.url
        ));
    }
}

/// Elements whose whole subtree is dropped
const SKIPPED: [&str; 5] = ["script", "style", "noscript", "svg", "template"];

/// Elements that start and end a paragraph of output
const BLOCKS: [&str; 17] = [
    "p", "div", "section", "article", "h1", "h2", "h3", "h4", "h5", "h6", "li", "blockquote", "pre",
    "figure", "figcaption", "tr", "br",
];

/// Reduce a post's HTML body to readable plain text, one paragraph per block element
pub fn html_to_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);

    let mut paragraphs = Vec::new();
    let mut current = String::new();
    collect_text(fragment.root_element(), &mut current, &mut paragraphs);
    end_paragraph(&mut current, &mut paragraphs);

    paragraphs.join("\n\n")
}

fn collect_text(element: ElementRef, current: &mut String, paragraphs: &mut Vec<String>) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => current.push_str(text),
            Node::Element(el) => {
                let name = el.name();
                if SKIPPED.contains(&name) {
                    continue;
                }
                let block = BLOCKS.contains(&name);
                if block {
                    end_paragraph(current, paragraphs);
                }
                if let Some(child_el) = ElementRef::wrap(child) {
                    collect_text(child_el, current, paragraphs);
                }
                if block {
                    end_paragraph(current, paragraphs);
                }
            }
            _ => {}
        }
    }
}

fn end_paragraph(current: &mut String, paragraphs: &mut Vec<String>) {
    let collapsed = current.split_whitespace().collect::<Vec<_>>().join(" ");
    if !collapsed.is_empty() {
        paragraphs.push(collapsed);
    }
    current.clear();
}
