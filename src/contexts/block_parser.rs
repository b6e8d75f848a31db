//! Fenced code block extraction from free-form LLM output.
//!
//! Three header conventions are tried in priority order and the first one
//! whose fence pattern matches wins; later tiers never run once an earlier
//! tier has matched, even if all of its blocks turned out blank. Bodies are matched lazily, so a block always ends at
//! the first closing fence after its header. A fence nested inside a body
//! therefore closes the outer block early; the scan resumes after it.

use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::debug;

use crate::data::CodeBlock;
use crate::registries::language_registry::{extension_for, language_for};

/// Per-language counters for synthesized filenames, local to one parse call
type Ordinals = HashMap<&'static str, usize>;

struct Tier {
    name: &'static str,
    pattern: fn() -> &'static Regex,
    extract: fn(&Captures<'_>, &mut Ordinals) -> Option<CodeBlock>,
}

const TIERS: [Tier; 3] = [
    Tier {
        name: "language+path",
        pattern: explicit_path_re,
        extract: extract_explicit_path,
    },
    Tier {
        name: "filename",
        pattern: filename_re,
        extract: extract_filename,
    },
    Tier {
        name: "bare-language",
        pattern: bare_language_re,
        extract: extract_bare_language,
    },
];

/// Bare fence tags recognized by the last tier, with their canonical language.
/// Other bare tags (```rust, ```go, ...) are ignored.
const BARE_LANGUAGE_ALIASES: &[(&str, &str)] = &[
    ("js", "javascript"),
    ("javascript", "javascript"),
    ("ts", "typescript"),
    ("typescript", "typescript"),
    ("py", "python"),
    ("python", "python"),
    ("css", "css"),
    ("html", "html"),
];

/// ```lang:path
fn explicit_path_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)```(\w+)[ \t]*:[ \t]*([^\n]+)\n(.*?)```").expect("valid regex")
    })
}

/// ```name.ext
fn filename_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)```([^\n]+\.\w+)\r?\n(.*?)```").expect("valid regex"))
}

/// ```js, ```python, ...
fn bare_language_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)```(js|javascript|ts|typescript|py|python|css|html)\r?\n(.*?)```")
            .expect("valid regex")
    })
}

fn extract_explicit_path(caps: &Captures<'_>, _ordinals: &mut Ordinals) -> Option<CodeBlock> {
    CodeBlock::new(&caps[2], &caps[3], &caps[1])
}

fn extract_filename(caps: &Captures<'_>, _ordinals: &mut Ordinals) -> Option<CodeBlock> {
    let filename = caps[1].trim();
    CodeBlock::new(filename, &caps[2], language_for(filename))
}

fn extract_bare_language(caps: &Captures<'_>, ordinals: &mut Ordinals) -> Option<CodeBlock> {
    let language = BARE_LANGUAGE_ALIASES
        .iter()
        .find(|(alias, _)| *alias == &caps[1])
        .map(|(_, language)| *language)?;

    let content = caps[2].trim();
    if content.is_empty() {
        return None;
    }

    let ordinal = ordinals.entry(language).or_insert(0);
    *ordinal += 1;
    let filename = format!(
        "generated_{}_{}.{}",
        language,
        ordinal,
        extension_for(language)
    );
    CodeBlock::new(&filename, content, language)
}

/// Extracts code blocks from `raw` in order of appearance.
///
/// The first tier whose pattern matches anywhere decides the result, even
/// when every block it matched has a blank body. Never fails: text without
/// usable fences yields an empty vector.
pub fn parse_code_blocks(raw: &str) -> Vec<CodeBlock> {
    let mut ordinals = Ordinals::new();

    for tier in &TIERS {
        let mut matched = 0;
        let blocks: Vec<CodeBlock> = (tier.pattern)()
            .captures_iter(raw)
            .inspect(|_| matched += 1)
            .filter_map(|caps| (tier.extract)(&caps, &mut ordinals))
            .collect();

        if matched > 0 {
            debug!(
                "Parsed {} of {} code block(s) with the {} tier",
                blocks.len(),
                matched,
                tier.name
            );
            return blocks;
        }
    }

    debug!("No code blocks found in {} byte(s) of text", raw.len());
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(blocks: &[CodeBlock]) -> Vec<(&str, &str, &str)> {
        blocks
            .iter()
            .map(|b| (b.filename(), b.language(), b.content()))
            .collect()
    }

    #[test]
    fn test_no_fences_yields_nothing() {
        assert!(parse_code_blocks("").is_empty());
        assert!(parse_code_blocks("Here is some prose without code.").is_empty());
    }

    #[test]
    fn test_explicit_path_tier_keeps_order() {
        let text = "Intro\n```javascript:src/components/Hero.jsx\nexport default function Hero() { return null; }\n```\nand\n```css:src/styles/hero.css\n.hero { color: red; }\n```\n";
        let blocks = parse_code_blocks(text);
        assert_eq!(
            summary(&blocks),
            vec![
                (
                    "src/components/Hero.jsx",
                    "javascript",
                    "export default function Hero() { return null; }"
                ),
                ("src/styles/hero.css", "css", ".hero { color: red; }"),
            ]
        );
    }

    #[test]
    fn test_multiline_bodies_stop_at_next_fence() {
        let text = "```py:a.py\nline1\nline2\n```\n```py:b.py\nline3\n```";
        let blocks = parse_code_blocks(text);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].content(), "line1\nline2");
        assert_eq!(blocks[1].content(), "line3");
    }

    #[test]
    fn test_blank_body_is_dropped() {
        let text = "```js:foo.js\n   \n```\n```js:bar.js\nlet x = 1;\n```";
        let blocks = parse_code_blocks(text);
        assert_eq!(summary(&blocks), vec![("bar.js", "js", "let x = 1;")]);
    }

    #[test]
    fn test_blank_explicit_block_still_excludes_later_tiers() {
        let text = "```js:foo.js\n   \n```\n```js\nreal()\n```";
        assert!(parse_code_blocks(text).is_empty());
    }

    #[test]
    fn test_whitespace_around_separator() {
        let text = "```typescript :  src/app.ts  \nconst a = 1;\n```";
        let blocks = parse_code_blocks(text);
        assert_eq!(summary(&blocks), vec![("src/app.ts", "typescript", "const a = 1;")]);
    }

    #[test]
    fn test_first_tier_excludes_others() {
        let text = "```utils.py\nprint('tier 2')\n```\n```js\nconsole.log('tier 3')\n```\n```go:main.go\npackage main\n```";
        let blocks = parse_code_blocks(text);
        assert_eq!(summary(&blocks), vec![("main.go", "go", "package main")]);
    }

    #[test]
    fn test_filename_tier_infers_language() {
        let text = "```Button.jsx\nexport const Button = () => null;\n```\n```README.md\n# Title\n```";
        let blocks = parse_code_blocks(text);
        assert_eq!(
            summary(&blocks),
            vec![
                ("Button.jsx", "javascript", "export const Button = () => null;"),
                ("README.md", "text", "# Title"),
            ]
        );
    }

    #[test]
    fn test_bare_language_tier_counts_per_language() {
        let text = "```js\na()\n```\n```python\nb()\n```\n```javascript\nc()\n```\n```css\n.d {}\n```";
        let blocks = parse_code_blocks(text);
        assert_eq!(
            summary(&blocks),
            vec![
                ("generated_javascript_1.js", "javascript", "a()"),
                ("generated_python_1.py", "python", "b()"),
                ("generated_javascript_2.js", "javascript", "c()"),
                ("generated_css_1.css", "css", ".d {}"),
            ]
        );
    }

    #[test]
    fn test_bare_language_blank_body_does_not_consume_ordinal() {
        let text = "```ts\n\n```\n```ts\nlet a: number = 1;\n```";
        let blocks = parse_code_blocks(text);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].filename(), "generated_typescript_1.ts");
    }

    #[test]
    fn test_ordinals_restart_on_each_call() {
        let text = "```html\n<p>hi</p>\n```";
        let first = parse_code_blocks(text);
        let second = parse_code_blocks(text);
        assert_eq!(first[0].filename(), "generated_html_1.html");
        assert_eq!(second[0].filename(), "generated_html_1.html");
    }

    #[test]
    fn test_unsupported_bare_language_is_ignored() {
        let text = "```rust\nfn main() {}\n```";
        assert!(parse_code_blocks(text).is_empty());
    }

    #[test]
    fn test_unclosed_fence_yields_nothing() {
        let text = "```js:open.js\nconsole.log('never closed');";
        assert!(parse_code_blocks(text).is_empty());
    }

    #[test]
    fn test_nested_fence_closes_outer_block() {
        let text = "```md:docs/guide.md\nUsage:\n```\nnpm start\n```\n```";
        let blocks = parse_code_blocks(text);
        assert_eq!(summary(&blocks), vec![("docs/guide.md", "md", "Usage:")]);
    }

    #[test]
    fn test_crlf_headers() {
        let text = "```js:src/a.js\r\nlet a = 1;\r\n```";
        let blocks = parse_code_blocks(text);
        assert_eq!(summary(&blocks), vec![("src/a.js", "js", "let a = 1;")]);
    }
}
