// src/analyzer/features.rs
// =============================================================================
// Facts read straight from the markup: HTML version, title, headings and
// whether the page carries a login form.
//
// All of these are pure functions of the Document - running them twice on
// the same page gives the same answer.
// =============================================================================

use scraper::ElementRef;

use crate::fetch::Document;

use super::model::{Headings, PageFeatures};

pub const UNDEFINED_VERSION: &str = "undefined";

// Checked in order; the first fragment found inside the doctype wins.
// Matching ignores ASCII case.
const DOCTYPES: &[(&str, &str)] = &[
    ("<!DOCTYPE HTML>", "HTML5 and beyond"),
    ("W3C//DTD HTML 4.01 Frameset//EN", "HTML 4.01 Frameset"),
    ("W3C//DTD HTML 4.01 Transitional//EN", "HTML 4.01 Transitional"),
    ("W3C//DTD HTML 4.01//EN", "HTML 4.01 Strict"),
    ("W3C//DTD XHTML 1.0 Frameset//EN", "XHTML 1.0 Frameset"),
    ("W3C//DTD XHTML 1.0 Transitional//EN", "XHTML 1.0 Transitional"),
    ("W3C//DTD XHTML 1.0 Strict//EN", "XHTML 1.0 Strict"),
    ("W3C//DTD XHTML 1.1//EN", "XHTML 1.1 DTD"),
    ("W3C//DTD XHTML Basic 1.1//EN", "XHTML Basic 1.1"),
    (
        "W3C//DTD XHTML 1.1 plus MathML 2.0 plus SVG 1.1//EN",
        "XHTML + MathML + SVG - DTD",
    ),
    ("W3C//DTD SVG 1.1//EN", "SVG 1.1 Full - DTD"),
    ("W3C//DTD SVG 1.0//EN", "SVG 1.0 - DTD:"),
];

const LOGIN_KEYWORDS: &[&str] = &[
    "login", "log in", "pass", "password", "name", "email", "username", "sign in", "sign up",
];

pub fn extract_features(document: &Document) -> PageFeatures {
    let mut headings = Headings::default();
    for level in 1..=6 {
        headings.set_level(level, heading_texts(document, level));
    }

    PageFeatures {
        version: html_version(document.source()).to_string(),
        title: title(document),
        headings,
        login: has_login_form(document),
    }
}

/// Names the HTML version declared by the first `<!...>` in `markup`.
pub fn html_version(markup: &str) -> &'static str {
    let Some(declaration) = first_declaration(markup) else {
        return UNDEFINED_VERSION;
    };
    let declaration = declaration.to_ascii_uppercase();

    DOCTYPES
        .iter()
        .find(|(fragment, _)| declaration.contains(&fragment.to_ascii_uppercase()))
        .map(|(_, version)| *version)
        .unwrap_or(UNDEFINED_VERSION)
}

// Everything from the first "<!" up to and including the next '>'
fn first_declaration(markup: &str) -> Option<&str> {
    let start = markup.find("<!")?;
    let end = start + markup[start..].find('>')?;
    markup.get(start..=end)
}

/// Text of the last <title> on the page, or an empty string.
pub fn title(document: &Document) -> String {
    document
        .select("title")
        .last()
        .map(|element| element.text().collect())
        .unwrap_or_default()
}

/// Texts of every <hN> element with whitespace runs collapsed.
pub fn heading_texts(document: &Document, level: usize) -> Vec<String> {
    document
        .select(&format!("h{}", level))
        .iter()
        .map(|heading| {
            let text: String = heading.text().collect();
            text.split_whitespace().collect::<Vec<_>>().join(" ")
        })
        .collect()
}

pub fn has_login_form(document: &Document) -> bool {
    let fields: Vec<String> = document
        .select("form")
        .into_iter()
        .flat_map(leaf_texts)
        .collect();
    count_login_matches(&fields) > 0
}

/// Collects the trimmed text of every leaf element under `element`.
///
/// An element with child elements contributes nothing itself and defers to
/// its children; text sitting directly next to child elements is ignored.
///
/// Walks with an explicit stack, so nesting depth is bounded by the heap
/// rather than the thread stack. Children are pushed in reverse to keep
/// document order.
pub fn leaf_texts(element: ElementRef<'_>) -> Vec<String> {
    let mut texts = Vec::new();
    let mut pending = vec![element];

    while let Some(current) = pending.pop() {
        let children: Vec<ElementRef<'_>> = current.children().filter_map(ElementRef::wrap).collect();

        if children.is_empty() {
            let text: String = current.text().collect();
            let text = text.trim();
            if !text.is_empty() {
                texts.push(text.to_string());
            }
        } else {
            pending.extend(children.into_iter().rev());
        }
    }

    texts
}

/// Counts (field, keyword) pairs where the field mentions the keyword.
///
/// "Username" matches both "name" and "username" and so counts twice.
pub fn count_login_matches(fields: &[String]) -> usize {
    fields
        .iter()
        .map(|field| {
            let field = field.to_lowercase();
            LOGIN_KEYWORDS
                .iter()
                .filter(|keyword| field.contains(**keyword))
                .count()
        })
        .sum()
}
