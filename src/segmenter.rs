//! Segmentation of scraped documentation pages into clean text blocks.
//!
//! Pages arrive as Markdown produced by an HTML-to-Markdown converter and
//! carry a lot of page furniture: navigation, breadcrumbs, permalink
//! anchors, image spans and horizontal-rule artifacts. The converter emits
//! a triple newline between structurally distinct regions, and a
//! horizontal-rule artifact (`\n--`) right before the substantive body
//! content. [`segment`] splits on that structure, runs a fixed cleanup
//! pipeline over every paragraph, and keeps only body-content paragraphs.

use std::sync::LazyLock;

use regex::Regex;

/// Horizontal-rule artifact separating page furniture from body content.
const BOUNDARY_MARKER: &str = "\n--";

/// Recurring sidebar artifact emitted by the doc site.
const SIDEBAR_PREFIX: &str = "On this page";

/// Permalink anchor glyph whose links must survive cleanup verbatim.
const PILCROW: &str = "\u{b6}";

static DASH_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"--+").unwrap());
static IMAGE_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[.+?\]\(.*?\)").unwrap());
static LEADING_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#+ *").unwrap());
static LEADING_SPECIAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\w\s]+ *").unwrap());
static LINK_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[.*?\]\(.*?\)").unwrap());

/// Split page Markdown into an ordered list of cleaned body paragraphs.
///
/// Paragraphs are the regions between triple newlines. Nothing is kept
/// until a paragraph containing the boundary marker is seen; that
/// paragraph itself is kept (the boundary is inclusive). A page without
/// the marker yields an empty list, not an error.
///
/// # Examples
///
/// ```
/// use docsift::segmenter::segment;
///
/// let page = "Breadcrumbs\n\n\nIntro\n--\nSetting up a project.";
/// let blocks = segment(page);
/// assert_eq!(blocks, vec!["Intro\n\nSetting up a project.".to_string()]);
///
/// assert!(segment("just navigation, no rule").is_empty());
/// ```
pub fn segment(markdown: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut in_body = false;

    for raw in markdown.split("\n\n\n") {
        // Boundary detection looks at the unmodified paragraph; cleanup
        // below removes the very dashes the marker is made of.
        if raw.contains(BOUNDARY_MARKER) {
            in_body = true;
        }
        if !in_body {
            continue;
        }

        let cleaned = clean_paragraph(raw);
        if cleaned.is_empty() || cleaned.starts_with(SIDEBAR_PREFIX) {
            continue;
        }
        blocks.push(cleaned);
    }

    blocks
}

/// Single-string variant of [`segment`]: surviving paragraphs joined with
/// a single newline. Empty string when no boundary marker is present.
pub fn segment_joined(markdown: &str) -> String {
    segment(markdown).join("\n")
}

/// Apply the cleanup rules to one raw paragraph, in their fixed order.
fn clean_paragraph(raw: &str) -> String {
    let without_dashes = collapse_dashes(raw);
    let without_images = IMAGE_SPAN.replace_all(&without_dashes, "");
    let without_bold = without_images.replace("**", "");
    let without_header = strip_heading_markers(&without_bold);
    let without_lead = LEADING_SPECIAL.replace(&without_header, "");
    let normalized = without_lead.trim().replace("\n\n\n", "\n");
    resolve_links(&normalized)
}

/// Collapse every run of two or more dashes to nothing. A lone dash is
/// left untouched. Idempotent: a second pass finds nothing to collapse.
fn collapse_dashes(input: &str) -> String {
    DASH_RUN.replace_all(input, "").into_owned()
}

/// Strip leading Markdown heading markers (`#` run plus following spaces).
fn strip_heading_markers(input: &str) -> String {
    if input.starts_with('#') {
        LEADING_HEADER.replace(input, "").into_owned()
    } else {
        input.to_string()
    }
}

/// Replace every Markdown link with its visible text, left to right.
///
/// Links whose visible text is the pilcrow anchor glyph are kept
/// verbatim: the doc site uses them as in-page permalinks and expanding
/// them would destroy the anchor. An explicit scan loop rather than
/// recursion, so pages with hundreds of links cannot exhaust the stack.
fn resolve_links(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(m) = LINK_SPAN.find(rest) {
        let span = m.as_str();
        let visible = span[1..].split(']').next().unwrap_or("");

        out.push_str(&rest[..m.start()]);
        if visible == PILCROW {
            out.push_str(span);
        } else {
            out.push_str(visible);
        }
        rest = &rest[m.end()..];
    }

    out.push_str(rest);
    out
}
