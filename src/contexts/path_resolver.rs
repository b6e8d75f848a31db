//! Destination paths for extracted code blocks.

use crate::data::{AffectedArea, CodeBlock, TaskMetadata};

/// Used when a hint normalizes to nothing (e.g. `"../.."`)
const FALLBACK_PATH: &str = "src/generated.txt";

struct PlacementRule {
    applies: fn(filename: &str, ext: &str) -> bool,
    place: fn(filename: &str, meta: &TaskMetadata) -> String,
}

/// Evaluated in order, first match wins. The `test`/`spec` rule is a plain
/// case-sensitive substring check and sits after the style rule, so
/// `Button.test.jsx` still lands with the components.
const PLACEMENT_RULES: &[PlacementRule] = &[
    PlacementRule {
        applies: |_, ext| matches!(ext, ".js" | ".jsx" | ".ts" | ".tsx" | ".vue"),
        place: |filename, meta| {
            if meta.has_area(AffectedArea::Frontend) {
                format!("src/components/{}", filename)
            } else {
                format!("src/{}", filename)
            }
        },
    },
    PlacementRule {
        applies: |_, ext| ext == ".py",
        place: |filename, meta| {
            if meta.has_area(AffectedArea::Backend) {
                format!("src/api/{}", filename)
            } else {
                format!("src/{}", filename)
            }
        },
    },
    PlacementRule {
        applies: |_, ext| matches!(ext, ".css" | ".scss" | ".sass"),
        place: |filename, _| format!("src/styles/{}", filename),
    },
    PlacementRule {
        applies: |filename, _| filename.contains("test") || filename.contains("spec"),
        place: |filename, _| format!("tests/{}", filename),
    },
    PlacementRule {
        applies: |_, ext| matches!(ext, ".md" | ".txt"),
        place: |filename, _| format!("docs/{}", filename),
    },
];

/// Extension including the dot, case preserved; empty when there is no dot.
fn file_extension(filename: &str) -> &str {
    match filename.rfind('.') {
        Some(idx) => &filename[idx..],
        None => "",
    }
}

/// Rewrites a path into a safe repository-relative form.
///
/// Backslashes become slashes; leading slashes, empty, `.` and `..`
/// segments are removed. Already clean relative paths come back unchanged.
pub fn normalize_path(path: &str) -> String {
    let unified = path.replace('\\', "/");
    let segments: Vec<&str> = unified
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != "." && *segment != "..")
        .collect();

    if segments.is_empty() {
        FALLBACK_PATH.to_string()
    } else {
        segments.join("/")
    }
}

/// Decides where `block` is written, given the task's placement hints.
///
/// A filename that already contains `/` is kept as given; anything else is
/// placed by extension and affected areas. A hint with no usable name
/// (blank, `.`, `..`) goes to the fallback path. Total and pure.
pub fn resolve_path(block: &CodeBlock, meta: &TaskMetadata) -> String {
    let filename = block.filename();

    if normalize_path(filename) == FALLBACK_PATH {
        return FALLBACK_PATH.to_string();
    }

    let placed = if filename.contains('/') {
        filename.to_string()
    } else {
        let ext = file_extension(filename);
        PLACEMENT_RULES
            .iter()
            .find(|rule| (rule.applies)(filename, ext))
            .map(|rule| (rule.place)(filename, meta))
            .unwrap_or_else(|| format!("src/{}", filename))
    };

    normalize_path(&placed)
}
