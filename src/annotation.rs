//! Classify trailing parameter annotations and preview directives.
//!
//! Customizer annotations are bracketed directives in a trailing comment,
//! e.g. `size = 10; // [1:100]`. The classifier decides which UI control an
//! annotation selects, or flags it invalid. Anything that does not start
//! with `[` is treated as an ordinary comment, not a malformed annotation.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// UI control category selected by a parameter annotation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationKind {
    /// No annotation present; the parameter renders as a plain text input.
    None,
    /// Numeric range: `[max]`, `[min:max]` or `[min:step:max]`.
    Slider,
    /// `[image_surface:WxH]`
    ImageSurface,
    /// `[image_array:WxH]`
    ImageArray,
    /// `[draw_polygon:WxH]`
    DrawPolygon,
    /// Comma-separated value list, each entry optionally `value:Label`.
    Dropdown,
    /// Starts with `[` but matches no known form.
    Unknown,
}

impl AnnotationKind {
    /// `Unknown` is the only invalid kind; everything else either selects a
    /// control or means "no annotation".
    pub fn is_valid(self) -> bool {
        !matches!(self, AnnotationKind::Unknown)
    }
}

/// Tab name whose parameters are exempt from all per-parameter diagnostics.
pub const HIDDEN_TAB: &str = "Hidden";

static SLIDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[-?\d+(?:\.\d+)?(?::-?\d+(?:\.\d+)?){0,2}\]$").expect("invalid regex")
});

static IMAGE_SURFACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[image_surface:[1-9]\d*x[1-9]\d*\]$").expect("invalid regex"));

static IMAGE_ARRAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[image_array:[1-9]\d*x[1-9]\d*\]$").expect("invalid regex"));

static DRAW_POLYGON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[draw_polygon:[1-9]\d*x[1-9]\d*\]$").expect("invalid regex"));

static DROPDOWN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[([^\[\]]+)\]$").expect("invalid regex"));

/// Classify a trailing annotation string.
///
/// The fixed-keyword forms are checked before the dropdown form so that
/// `[image_surface:50x50]` is never misread as a one-entry dropdown.
pub fn classify_annotation(text: &str) -> AnnotationKind {
    let text = text.trim();

    if text.is_empty() {
        return AnnotationKind::None;
    }

    if SLIDER.is_match(text) {
        return AnnotationKind::Slider;
    }

    if IMAGE_SURFACE.is_match(text) {
        return AnnotationKind::ImageSurface;
    }

    if IMAGE_ARRAY.is_match(text) {
        return AnnotationKind::ImageArray;
    }

    if DRAW_POLYGON.is_match(text) {
        return AnnotationKind::DrawPolygon;
    }

    if let Some(captures) = DROPDOWN.captures(text) {
        let body = &captures[1];
        if !has_keyword_prefix(body) && is_dropdown_body(body) {
            return AnnotationKind::Dropdown;
        }
    }

    if text.starts_with('[') {
        return AnnotationKind::Unknown;
    }

    AnnotationKind::None
}

/// A malformed keyword form (say, a zero dimension) must stay invalid
/// rather than fall through and pass as a one-entry dropdown.
fn has_keyword_prefix(body: &str) -> bool {
    ["image_surface:", "image_array:", "draw_polygon:"]
        .iter()
        .any(|prefix| body.trim_start().starts_with(prefix))
}

/// A bracketed body is a dropdown when it lists two or more entries, or a
/// single `value:Label` entry. A bare single token such as `abc` is not a
/// dropdown; the annotation falls through to `Unknown`.
fn is_dropdown_body(body: &str) -> bool {
    let entries: Vec<&str> = body.split(',').map(str::trim).collect();

    if entries.iter().any(|e| e.is_empty()) {
        return false;
    }

    entries.len() > 1 || entries[0].contains(':')
}

static PREVIEW_BODY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^preview\[([^\]]*)\]$").expect("invalid regex"));

/// Valid `view:` options in a preview directive.
const VALID_VIEWS: [&str; 8] = [
    "north",
    "north east",
    "east",
    "south east",
    "south",
    "south west",
    "west",
    "north west",
];

/// Valid `tilt:` options in a preview directive.
const VALID_TILTS: [&str; 5] = ["top", "top diagonal", "side", "bottom diagonal", "bottom"];

/// Validate a `// preview[view:X, tilt:Y]` directive.
///
/// Returns one human-readable problem per violation; an empty vec means the
/// directive is well formed.
pub fn check_preview(comment: &str) -> Vec<String> {
    let Some(captures) = PREVIEW_BODY.captures(comment.trim()) else {
        return vec!["malformed preview directive".to_string()];
    };

    let mut problems = Vec::new();

    for entry in captures[1].split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }

        match entry.split_once(':') {
            Some(("view", value)) => {
                let value = value.trim();
                if !VALID_VIEWS.contains(&value) {
                    problems.push(format!("invalid preview view '{value}'"));
                }
            }
            Some(("tilt", value)) => {
                let value = value.trim();
                if !VALID_TILTS.contains(&value) {
                    problems.push(format!("invalid preview tilt '{value}'"));
                }
            }
            Some((key, _)) => problems.push(format!("unknown preview option '{key}'")),
            None => problems.push(format!("unknown preview option '{entry}'")),
        }
    }

    problems
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_absent() {
        assert_eq!(classify_annotation(""), AnnotationKind::None);
        assert_eq!(classify_annotation("   "), AnnotationKind::None);
    }

    #[test]
    fn test_plain_comment_is_absent() {
        assert_eq!(classify_annotation("just a note"), AnnotationKind::None);
    }

    #[test]
    fn test_slider_forms() {
        assert_eq!(classify_annotation("[20]"), AnnotationKind::Slider);
        assert_eq!(classify_annotation("[1:20]"), AnnotationKind::Slider);
        assert_eq!(classify_annotation("[1:0.5:20]"), AnnotationKind::Slider);
        assert_eq!(classify_annotation("[-5:5]"), AnnotationKind::Slider);
    }

    #[test]
    fn test_image_and_polygon_forms() {
        assert_eq!(
            classify_annotation("[image_surface:50x50]"),
            AnnotationKind::ImageSurface
        );
        assert_eq!(
            classify_annotation("[image_array:10x10]"),
            AnnotationKind::ImageArray
        );
        assert_eq!(
            classify_annotation("[draw_polygon:100x100]"),
            AnnotationKind::DrawPolygon
        );
        // Zero dimensions are not positive integers.
        assert_eq!(
            classify_annotation("[image_surface:0x50]"),
            AnnotationKind::Unknown
        );
    }

    #[test]
    fn test_dropdown_forms() {
        assert_eq!(classify_annotation("[red, green, blue]"), AnnotationKind::Dropdown);
        assert_eq!(
            classify_annotation("[s:Small, l:Large]"),
            AnnotationKind::Dropdown
        );
        assert_eq!(classify_annotation("[yes:Yes]"), AnnotationKind::Dropdown);
    }

    #[test]
    fn test_bare_token_is_invalid() {
        assert_eq!(classify_annotation("[abc]"), AnnotationKind::Unknown);
        assert!(!classify_annotation("[abc]").is_valid());
    }

    #[test]
    fn test_nested_brackets_are_invalid() {
        assert_eq!(classify_annotation("[[1,2],[3,4]]"), AnnotationKind::Unknown);
    }

    #[test]
    fn test_keyword_precedence_over_dropdown() {
        // Matches the dropdown shape too, but the keyword check runs first.
        assert_eq!(
            classify_annotation("[image_array:20x20]"),
            AnnotationKind::ImageArray
        );
    }

    #[test]
    fn test_preview_valid() {
        assert!(check_preview("preview[view:south east, tilt:top]").is_empty());
        assert!(check_preview("preview[view:north]").is_empty());
    }

    #[test]
    fn test_preview_invalid_view() {
        let problems = check_preview("preview[view:upside down]");
        assert_eq!(problems, vec!["invalid preview view 'upside down'".to_string()]);
    }

    #[test]
    fn test_preview_unknown_option() {
        let problems = check_preview("preview[zoom:2]");
        assert_eq!(problems, vec!["unknown preview option 'zoom'".to_string()]);
    }

    #[test]
    fn test_preview_malformed() {
        let problems = check_preview("preview[view:north");
        assert_eq!(problems, vec!["malformed preview directive".to_string()]);
    }
}
