//! Snapshot schema: the normalized structural fingerprint of one page fetch.
//!
//! A `StructuralSnapshot` is built once by `extract::extract` and never
//! mutated afterwards. All sequences follow document order so that diffing
//! two snapshots of the same markup is deterministic. Absent attributes are
//! modeled as `None`, never as empty strings, so rules can tell "present but
//! empty" apart from "missing".

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Sentinel location for `<script>` elements without a `src` attribute.
pub const INLINE_LOCATION: &str = "inline";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One referenced script or stylesheet. `location` is the URL as written in
/// the markup, or [`INLINE_LOCATION`] for inline scripts.
pub struct ResourceRef {
    pub location: String,
}

impl ResourceRef {
    pub fn external(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
        }
    }

    pub fn inline() -> Self {
        Self {
            location: INLINE_LOCATION.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A `<button>` element as seen by the extractor.
pub struct ButtonDescriptor {
    pub id: Option<String>,
    pub text: String,
    pub aria_label: Option<String>,
    #[serde(default)]
    pub classes: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// An `<input>` element. `has_associated_label` is resolved at extraction
/// time by looking for a `<label for="...">` matching the input id.
pub struct InputDescriptor {
    pub id: Option<String>,
    /// The `type` attribute, defaulting to `text` when absent.
    pub kind: String,
    pub has_associated_label: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDescriptor {
    pub src: Option<String>,
    pub has_alt: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkDescriptor {
    pub href: Option<String>,
    /// True when the link carries non-whitespace text or a child `<img>`.
    pub has_visible_content: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Per-kind element totals, kept alongside the descriptor lists so a report
/// can show page scale without re-walking the markup.
pub struct ElementCounts {
    pub buttons: usize,
    pub inputs: usize,
    pub forms: usize,
    pub links: usize,
    pub images: usize,
    pub scripts: usize,
    pub styles: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Point-in-time structural fingerprint of one page.
pub struct StructuralSnapshot {
    pub source_url: String,
    pub captured_at: DateTime<Utc>,
    /// `None` when the document has no `<title>`; `Some("")` when the tag is
    /// present but empty. The title rule treats both as defects.
    pub title: Option<String>,
    pub scripts: Vec<ResourceRef>,
    pub stylesheets: Vec<ResourceRef>,
    pub buttons: Vec<ButtonDescriptor>,
    pub inputs: Vec<InputDescriptor>,
    pub images: Vec<ImageDescriptor>,
    pub links: Vec<LinkDescriptor>,
    /// Every non-empty `id` attribute in document order. Duplicates are kept:
    /// a repeated value here is a genuine duplicate-id defect.
    pub all_element_ids: Vec<String>,
    pub has_viewport_meta: bool,
    pub html_lang: Option<String>,
    /// Number of elements carrying an inline `style` attribute.
    pub inline_style_count: usize,
    pub element_counts: ElementCounts,
}

impl StructuralSnapshot {
    /// Set of button ids (buttons without an id, or with an empty id, are
    /// excluded — they cannot be tracked across deployments).
    pub fn button_ids(&self) -> BTreeSet<String> {
        self.buttons
            .iter()
            .filter_map(|b| b.id.as_deref())
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Distinct element ids present anywhere in the document.
    pub fn id_set(&self) -> BTreeSet<String> {
        self.all_element_ids.iter().cloned().collect()
    }

    /// Distinct script locations (external URLs plus the inline sentinel).
    pub fn script_locations(&self) -> BTreeSet<String> {
        self.scripts.iter().map(|r| r.location.clone()).collect()
    }

    pub fn stylesheet_locations(&self) -> BTreeSet<String> {
        self.stylesheets.iter().map(|r| r.location.clone()).collect()
    }
}
