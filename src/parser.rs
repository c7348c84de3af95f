//! Scan OpenSCAD source into top-level constructs.
//!
//! This is a deliberately partial parse: only the constructs the walker cares
//! about (comments, tab markers, declarations) are distinguished. Variable
//! assignments accumulate lines until the terminating `;` at bracket depth
//! zero, so multi-line literal lists keep their full value text and a
//! trailing annotation comment is attached to the right declaration.

use regex::Regex;
use std::sync::LazyLock;

/// One top-level construct, tagged with its 1-indexed starting line.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub line: usize,
    pub kind: ItemKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ItemKind {
    /// Empty or whitespace-only line.
    Blank,
    /// `/* [Tab Name] */`
    TabMarker(String),
    /// Any other block comment, single- or multi-line.
    BlockComment,
    /// `// preview[...]`, carried verbatim for validation.
    Preview(String),
    /// Any other single-line comment; content with the `//` stripped.
    Comment(String),
    /// `module name(...)` or `function name(...)`.
    Callable(String),
    /// Assignment to a `$`-prefixed special variable.
    SpecialAssign(String),
    /// Top-level variable assignment.
    Assign {
        name: String,
        value: String,
        annotation: Option<String>,
    },
    /// Anything else (`include`, `use`, module invocations, partial syntax).
    Other,
}

static TAB_DECL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/\*\s*\[([^\]]+)\]\s*\*/$").expect("invalid regex"));

static CALLABLE_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:module|function)\s+([A-Za-z_$][A-Za-z0-9_]*)\s*\(").expect("invalid regex")
});

static SPECIAL_ASSIGN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\$([A-Za-z_][A-Za-z0-9_]*)\s*=").expect("invalid regex"));

static ASSIGN_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*)\s*=\s*(.*)$").expect("invalid regex"));

/// Scan source text into top-level items in lexical order.
pub fn scan(content: &str) -> Vec<Item> {
    let lines: Vec<&str> = content.lines().collect();
    let mut items = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = i + 1;
        let trimmed = lines[i].trim();

        if trimmed.is_empty() {
            items.push(Item {
                line,
                kind: ItemKind::Blank,
            });
            i += 1;
            continue;
        }

        if trimmed.starts_with("/*") {
            if let Some(captures) = TAB_DECL.captures(trimmed) {
                items.push(Item {
                    line,
                    kind: ItemKind::TabMarker(captures[1].trim().to_string()),
                });
                i += 1;
                continue;
            }

            i = consume_block_comment(&lines, i);
            items.push(Item {
                line,
                kind: ItemKind::BlockComment,
            });
            continue;
        }

        if let Some(rest) = trimmed.strip_prefix("//") {
            let text = rest.trim();
            let kind = if text.starts_with("preview[") {
                ItemKind::Preview(text.to_string())
            } else {
                ItemKind::Comment(text.to_string())
            };
            items.push(Item { line, kind });
            i += 1;
            continue;
        }

        if let Some(captures) = CALLABLE_DECL.captures(trimmed) {
            items.push(Item {
                line,
                kind: ItemKind::Callable(captures[1].to_string()),
            });
            i += 1;
            continue;
        }

        if let Some(captures) = SPECIAL_ASSIGN.captures(trimmed) {
            items.push(Item {
                line,
                kind: ItemKind::SpecialAssign(captures[1].to_string()),
            });
            i += 1;
            continue;
        }

        if let Some(captures) = ASSIGN_START.captures(trimmed) {
            let name = captures[1].to_string();
            let first_segment = captures.get(2).map(|m| m.as_str()).unwrap_or("");

            let (assign, next) = accumulate_assignment(&lines, i, name, first_segment);
            items.push(Item {
                line,
                kind: assign.unwrap_or(ItemKind::Other),
            });
            i = next;
            continue;
        }

        items.push(Item {
            line,
            kind: ItemKind::Other,
        });
        i += 1;
    }

    items
}

/// Advance past a block comment opened on line `start`; returns the index of
/// the first line after it.
fn consume_block_comment(lines: &[&str], start: usize) -> usize {
    let mut j = start;

    while j < lines.len() {
        let hay = if j == start {
            // Skip the opener so `/*/` does not self-close.
            &lines[j].trim()[2..]
        } else {
            lines[j]
        };
        if hay.contains("*/") {
            return j + 1;
        }
        j += 1;
    }

    lines.len()
}

/// Outcome of scanning one source segment of an assignment value.
enum SegmentEnd {
    /// `;` at depth zero, byte offset into the segment.
    Terminator(usize),
    /// `//` outside a string; rest of the line is comment.
    Comment(usize),
    Continue,
}

/// Collect an assignment's value text across lines until the `;` that closes
/// it at bracket depth zero, outside string literals. Returns the item (or
/// `None` if the file ends mid-assignment) and the next line index.
fn accumulate_assignment<'a>(
    lines: &[&'a str],
    start: usize,
    name: String,
    first_segment: &'a str,
) -> (Option<ItemKind>, usize) {
    let mut value = String::new();
    let mut depth: i32 = 0;
    let mut in_str = false;
    let mut j = start;
    let mut segment = first_segment;

    loop {
        match scan_segment(segment, &mut depth, &mut in_str) {
            SegmentEnd::Terminator(at) => {
                value.push_str(&segment[..at]);

                let rest = segment[at + 1..].trim();
                let annotation = rest
                    .strip_prefix("//")
                    .map(|comment| comment.trim().to_string());

                return (
                    Some(ItemKind::Assign {
                        name,
                        value: value.trim().to_string(),
                        annotation,
                    }),
                    j + 1,
                );
            }
            SegmentEnd::Comment(at) => {
                value.push_str(&segment[..at]);
            }
            SegmentEnd::Continue => {
                value.push_str(segment);
            }
        }

        value.push(' ');
        j += 1;
        if j >= lines.len() {
            // Unterminated assignment; treat the opening line as unknown.
            return (None, lines.len());
        }
        segment = lines[j];
    }
}

fn scan_segment(segment: &str, depth: &mut i32, in_str: &mut bool) -> SegmentEnd {
    let bytes = segment.as_bytes();
    let mut escaped = false;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];

        if *in_str {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                *in_str = false;
            }
            i += 1;
            continue;
        }

        match b {
            b'"' => *in_str = true,
            b'[' | b'(' | b'{' => *depth += 1,
            b']' | b')' | b'}' => *depth -= 1,
            b';' if *depth <= 0 => return SegmentEnd::Terminator(i),
            b'/' if bytes.get(i + 1) == Some(&b'/') => return SegmentEnd::Comment(i),
            _ => {}
        }
        i += 1;
    }

    SegmentEnd::Continue
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(content: &str) -> Vec<ItemKind> {
        scan(content).into_iter().map(|i| i.kind).collect()
    }

    #[test]
    fn test_tab_marker() {
        assert_eq!(
            kinds("/* [Size] */"),
            vec![ItemKind::TabMarker("Size".to_string())]
        );
    }

    #[test]
    fn test_plain_block_comment() {
        let items = kinds("/* just a note,\n   spanning lines */\nradius = 5;");
        assert_eq!(items[0], ItemKind::BlockComment);
        assert!(matches!(items[1], ItemKind::Assign { .. }));
    }

    #[test]
    fn test_simple_assignment_with_annotation() {
        let items = scan("radius = 5; // [1:20]");
        assert_eq!(items.len(), 1);
        assert_eq!(
            items[0].kind,
            ItemKind::Assign {
                name: "radius".to_string(),
                value: "5".to_string(),
                annotation: Some("[1:20]".to_string()),
            }
        );
        assert_eq!(items[0].line, 1);
    }

    #[test]
    fn test_assignment_without_annotation() {
        let items = scan("radius = 5;");
        assert_eq!(
            items[0].kind,
            ItemKind::Assign {
                name: "radius".to_string(),
                value: "5".to_string(),
                annotation: None,
            }
        );
    }

    #[test]
    fn test_multiline_list_assignment() {
        let src = "points = [\n    [0, 0],\n    [10, 0],\n    [10, 10]\n];\nnext = 1;";
        let items = scan(src);
        let ItemKind::Assign { name, value, annotation } = &items[0].kind else {
            panic!("expected assignment, got {:?}", items[0].kind);
        };
        assert_eq!(name, "points");
        assert!(annotation.is_none());
        assert_eq!(items[0].line, 1);
        // Collapsed to one logical value with brackets balanced.
        assert!(value.starts_with('[') && value.ends_with(']'));
        assert!(matches!(items[1].kind, ItemKind::Assign { .. }));
        assert_eq!(items[1].line, 6);
    }

    #[test]
    fn test_semicolon_inside_string() {
        let items = scan("label = \"a;b\"; // note");
        assert_eq!(
            items[0].kind,
            ItemKind::Assign {
                name: "label".to_string(),
                value: "\"a;b\"".to_string(),
                annotation: Some("note".to_string()),
            }
        );
    }

    #[test]
    fn test_callable_and_special() {
        let items = kinds("$fn = 64;\nmodule thing() {\nfunction f(x) = x;");
        assert_eq!(items[0], ItemKind::SpecialAssign("fn".to_string()));
        assert_eq!(items[1], ItemKind::Callable("thing".to_string()));
        assert_eq!(items[2], ItemKind::Callable("f".to_string()));
    }

    #[test]
    fn test_comments_and_preview() {
        let items = kinds("// A radius\n// preview[view:north, tilt:top]\n");
        assert_eq!(items[0], ItemKind::Comment("A radius".to_string()));
        assert_eq!(
            items[1],
            ItemKind::Preview("preview[view:north, tilt:top]".to_string())
        );
    }

    #[test]
    fn test_unterminated_assignment_is_other() {
        let items = kinds("broken = [1, 2");
        assert_eq!(items, vec![ItemKind::Other]);
    }

    #[test]
    fn test_include_is_other() {
        assert_eq!(kinds("include <lib.scad>"), vec![ItemKind::Other]);
    }

    #[test]
    fn test_blank_lines() {
        let items = kinds("\n   \n");
        assert_eq!(items, vec![ItemKind::Blank, ItemKind::Blank]);
    }
}
