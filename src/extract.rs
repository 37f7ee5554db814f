//! Snapshot extraction: raw markup in, `StructuralSnapshot` out.
//!
//! Extraction is total. Malformed markup never fails the run: the parser is
//! error-tolerant and anything it cannot surface simply degrades to empty or
//! absent fields. No finding is raised for the degradation itself.
//!
//! All element lists follow document order, and attribute absence maps to
//! `None` rather than `""` so rule evaluation can distinguish the two.

use crate::models::snapshot::{
    ButtonDescriptor, ElementCounts, ImageDescriptor, InputDescriptor, LinkDescriptor,
    ResourceRef, StructuralSnapshot,
};
use chrono::{DateTime, Utc};
use scraper::{Html, Selector};
use std::collections::BTreeSet;

fn sel(css: &str) -> Selector {
    // Only called with static selectors below.
    Selector::parse(css).expect("static selector")
}

/// Build a snapshot from raw markup, stamped with the current time.
pub fn extract(markup: &str, source_url: &str) -> StructuralSnapshot {
    extract_at(markup, source_url, Utc::now())
}

/// Build a snapshot with an explicit capture timestamp. The snapshot is a
/// pure function of `markup`, `source_url`, and `at`.
pub fn extract_at(markup: &str, source_url: &str, at: DateTime<Utc>) -> StructuralSnapshot {
    let doc = Html::parse_document(markup);

    let title = doc
        .select(&sel("title"))
        .next()
        .map(|t| t.text().collect::<String>().trim().to_string());

    let scripts: Vec<ResourceRef> = doc
        .select(&sel("script"))
        .map(|s| match s.value().attr("src") {
            Some(src) => ResourceRef::external(src),
            None => ResourceRef::inline(),
        })
        .collect();

    let stylesheets: Vec<ResourceRef> = doc
        .select(&sel(r#"link[rel~="stylesheet"]"#))
        .filter_map(|l| l.value().attr("href"))
        .map(ResourceRef::external)
        .collect();

    // Label targets are collected once so each input lookup is a set probe.
    let labeled_ids: BTreeSet<String> = doc
        .select(&sel("label"))
        .filter_map(|l| l.value().attr("for"))
        .filter(|f| !f.is_empty())
        .map(str::to_string)
        .collect();

    let buttons: Vec<ButtonDescriptor> = doc
        .select(&sel("button"))
        .map(|b| ButtonDescriptor {
            id: b.value().attr("id").map(str::to_string),
            text: b.text().collect::<String>().trim().to_string(),
            aria_label: b.value().attr("aria-label").map(str::to_string),
            classes: b.value().classes().map(str::to_string).collect(),
        })
        .collect();

    let inputs: Vec<InputDescriptor> = doc
        .select(&sel("input"))
        .map(|i| {
            let id = i.value().attr("id").map(str::to_string);
            let has_associated_label = id
                .as_deref()
                .map(|id| !id.is_empty() && labeled_ids.contains(id))
                .unwrap_or(false);
            InputDescriptor {
                id,
                kind: i.value().attr("type").unwrap_or("text").to_string(),
                has_associated_label,
            }
        })
        .collect();

    let img_sel = sel("img");
    let images: Vec<ImageDescriptor> = doc
        .select(&img_sel)
        .map(|i| ImageDescriptor {
            src: i.value().attr("src").map(str::to_string),
            // An empty alt is treated the same as a missing one; decorative
            // images are out of reach for a structural check.
            has_alt: i
                .value()
                .attr("alt")
                .map(|a| !a.trim().is_empty())
                .unwrap_or(false),
        })
        .collect();

    let links: Vec<LinkDescriptor> = doc
        .select(&sel("a"))
        .map(|a| {
            let text = a.text().collect::<String>();
            let has_child_img = a.select(&img_sel).next().is_some();
            LinkDescriptor {
                href: a.value().attr("href").map(str::to_string),
                has_visible_content: !text.trim().is_empty() || has_child_img,
            }
        })
        .collect();

    // Empty id="" attributes are skipped: they cannot collide meaningfully
    // and would make duplicate detection report a non-id.
    let all_element_ids: Vec<String> = doc
        .select(&sel("[id]"))
        .filter_map(|e| e.value().attr("id"))
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect();

    let has_viewport_meta = doc.select(&sel(r#"meta[name="viewport"]"#)).next().is_some();

    let html_lang = doc
        .select(&sel("html"))
        .next()
        .and_then(|h| h.value().attr("lang"))
        .map(str::to_string);

    let inline_style_count = doc.select(&sel("[style]")).count();

    let element_counts = ElementCounts {
        buttons: buttons.len(),
        inputs: inputs.len(),
        forms: doc.select(&sel("form")).count(),
        links: links.len(),
        images: images.len(),
        scripts: scripts.len(),
        styles: stylesheets.len(),
    };

    StructuralSnapshot {
        source_url: source_url.to_string(),
        captured_at: at,
        title,
        scripts,
        stylesheets,
        buttons,
        inputs,
        images,
        links,
        all_element_ids,
        has_viewport_meta,
        html_lang,
        inline_style_count,
        element_counts,
    }
}
