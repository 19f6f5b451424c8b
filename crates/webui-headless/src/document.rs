//! Just enough HTML handling to run a page without a browser.

use scraper::{ElementRef, Html, Node, Selector};
use serde::Serialize;
use tracing::warn;

/// Element or text node handed to the script-side DOM.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DomNode {
    Text(String),
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
        children: Vec<DomNode>,
    },
}

impl DomNode {
    fn from_element(element: ElementRef<'_>) -> Self {
        let value = element.value();
        let attrs = value
            .attrs()
            .map(|(name, val)| (name.to_string(), val.to_string()))
            .collect();
        let children = element
            .children()
            .filter_map(|child| match child.value() {
                Node::Text(text) => Some(DomNode::Text(String::from(&**text))),
                Node::Element(_) => ElementRef::wrap(child).map(DomNode::from_element),
                _ => None,
            })
            .collect();
        DomNode::Element {
            tag: value.name().to_string(),
            attrs,
            children,
        }
    }

    fn empty(tag: &str) -> Self {
        DomNode::Element {
            tag: tag.to_string(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }
}

/// What the engine needs from a parsed page.
#[derive(Debug, Clone)]
pub struct Document {
    pub title: Option<String>,
    /// Inline script bodies in document order.
    pub scripts: Vec<String>,
    pub head: DomNode,
    pub body: DomNode,
}

impl Document {
    pub fn parse(html: &str) -> Self {
        let parsed = Html::parse_document(html);
        let root = parsed.root_element();
        let section = |tag: &str| {
            root.children()
                .filter_map(ElementRef::wrap)
                .find(|el| el.value().name() == tag)
                .map(DomNode::from_element)
                .unwrap_or_else(|| DomNode::empty(tag))
        };
        Self {
            title: title_of(&parsed),
            scripts: scripts_of(&parsed),
            head: section("head"),
            body: section("body"),
        }
    }
}

fn selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(selector) => Some(selector),
        Err(e) => {
            warn!(css, error = %e, "bad selector");
            None
        }
    }
}

fn scripts_of(parsed: &Html) -> Vec<String> {
    let Some(scripts) = selector("script") else {
        return Vec::new();
    };
    parsed
        .select(&scripts)
        .filter(|el| runs_inline(el))
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|body| !body.is_empty())
        .collect()
}

/// External (`src`) scripts and non-JavaScript `type`s do not run.
fn runs_inline(script: &ElementRef<'_>) -> bool {
    let value = script.value();
    if value.attr("src").is_some() {
        return false;
    }
    match value.attr("type") {
        None => true,
        Some(kind) => {
            let kind = kind.trim().to_ascii_lowercase();
            kind.is_empty() || kind.contains("javascript")
        }
    }
}

fn title_of(parsed: &Html) -> Option<String> {
    let title = selector("title")?;
    let text = parsed.select(&title).next()?.text().collect::<String>();
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Bodies of the inline `<script>` blocks of `html`, in document order.
pub fn inline_scripts(html: &str) -> Vec<String> {
    scripts_of(&Html::parse_document(html))
}

/// Text of the first `<title>` element.
pub fn page_title(html: &str) -> Option<String> {
    title_of(&Html::parse_document(html))
}

/// Document carried by a `data:text/html,` URL. Other URLs, and base64
/// payloads, give `None`.
pub fn decode_data_url(url: &str) -> Option<String> {
    let rest = url.strip_prefix("data:")?;
    let (meta, payload) = rest.split_once(',')?;
    let mut params = meta.split(';');
    let mime = params.next().unwrap_or_default().trim();
    if !(mime.is_empty() || mime.eq_ignore_ascii_case("text/html")) {
        return None;
    }
    if params.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
        warn!("base64 data URLs are not supported by the headless engine");
        return None;
    }
    match urlencoding::decode(payload) {
        Ok(html) => Some(html.into_owned()),
        Err(e) => {
            warn!(error = %e, "data URL is not valid UTF-8");
            None
        }
    }
}
