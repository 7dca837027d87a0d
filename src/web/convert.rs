//! HTML to text/markdown conversion for LLM consumption.
//!
//! Pure functions, no I/O. Regex-based tag stripping keeps the crate free
//! of a full HTML parser; pages that matter for LLM context are reduced to
//! their visible text either way.

use std::sync::OnceLock;

use regex::Regex;

struct Patterns {
    noise: Regex,
    title: Regex,
    block_breaks: Regex,
    paragraph: Regex,
    heading: Regex,
    link: Regex,
    bold: Regex,
    italic: Regex,
    code: Regex,
    list_item: Regex,
    tag: Regex,
    spaces: Regex,
    blank_lines: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        noise: Regex::new(r"(?is)<(script|style|noscript|nav|footer|header)[^>]*>.*?</(script|style|noscript|nav|footer|header)>")
            .expect("valid regex"),
        title: Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("valid regex"),
        block_breaks: Regex::new(r"(?i)<(?:br|hr)\s*/?>").expect("valid regex"),
        paragraph: Regex::new(r"(?i)</(?:p|div|section|article|tr|table|ul|ol|h[1-6]|blockquote)>")
            .expect("valid regex"),
        heading: Regex::new(r"(?is)<h([1-6])[^>]*>(.*?)</h[1-6]>").expect("valid regex"),
        link: Regex::new(r#"(?is)<a\s[^>]*href\s*=\s*["']([^"']*)["'][^>]*>(.*?)</a>"#)
            .expect("valid regex"),
        bold: Regex::new(r"(?is)<(?:strong|b)[^>]*>(.*?)</(?:strong|b)>").expect("valid regex"),
        italic: Regex::new(r"(?is)<(?:em|i)[^>]*>(.*?)</(?:em|i)>").expect("valid regex"),
        code: Regex::new(r"(?is)<code[^>]*>(.*?)</code>").expect("valid regex"),
        list_item: Regex::new(r"(?i)<li[^>]*>").expect("valid regex"),
        tag: Regex::new(r"<[^>]+>").expect("valid regex"),
        spaces: Regex::new(r"[ \t]+").expect("valid regex"),
        blank_lines: Regex::new(r"\n{3,}").expect("valid regex"),
    })
}

/// Remove script/style/nav/footer/header blocks.
pub(crate) fn strip_noise(html: &str) -> String {
    patterns().noise.replace_all(html, " ").into_owned()
}

/// Extract the page title, if any.
pub fn extract_title(html: &str) -> Option<String> {
    patterns()
        .title
        .captures(html)
        .map(|c| decode_entities(c[1].trim()))
        .filter(|t| !t.is_empty())
}

/// Convert HTML to clean text: tags stripped, entities decoded, block
/// boundaries preserved as newlines.
pub fn html_to_text(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }
    let p = patterns();
    let cleaned = strip_noise(html);
    let cleaned = p.block_breaks.replace_all(&cleaned, "\n");
    let cleaned = p.paragraph.replace_all(&cleaned, "\n");
    let cleaned = p.tag.replace_all(&cleaned, " ");
    collapse(&decode_entities(&cleaned))
}

/// Convert HTML to markdown: headings, links, emphasis, and list items
/// survive; everything else is reduced to text.
pub fn html_to_markdown(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }
    let p = patterns();
    let cleaned = strip_noise(html);
    let cleaned = p.heading.replace_all(&cleaned, |caps: &regex::Captures| {
        let level: usize = caps[1].parse().unwrap_or(1);
        format!("\n{} {}\n", "#".repeat(level), caps[2].trim())
    });
    let cleaned = p.link.replace_all(&cleaned, "[$2]($1)");
    let cleaned = p.bold.replace_all(&cleaned, "**$1**");
    let cleaned = p.italic.replace_all(&cleaned, "*$1*");
    let cleaned = p.code.replace_all(&cleaned, "`$1`");
    let cleaned = p.list_item.replace_all(&cleaned, "\n- ");
    let cleaned = p.block_breaks.replace_all(&cleaned, "\n");
    let cleaned = p.paragraph.replace_all(&cleaned, "\n\n");
    let cleaned = p.tag.replace_all(&cleaned, " ");
    collapse(&decode_entities(&cleaned))
}

/// Extract the inner HTML of the first matching container element.
pub(crate) fn extract_container(html: &str, tag: &str) -> Option<String> {
    let pattern = format!(r"(?is)<{tag}[^>]*>(.*?)</{tag}>");
    Regex::new(&pattern)
        .ok()?
        .captures(html)
        .map(|c| c[1].to_string())
}

/// Extract the inner HTML of the first `div` with one of the given class names.
pub(crate) fn extract_div_with_class(html: &str, class_name: &str) -> Option<String> {
    let pattern = format!(
        r#"(?is)<div[^>]*class\s*=\s*["'](?:[^"']*\s)?{}(?:\s[^"']*)?["'][^>]*>(.*?)</div>"#,
        regex::escape(class_name)
    );
    Regex::new(&pattern)
        .ok()?
        .captures(html)
        .map(|c| c[1].to_string())
}

fn decode_entities(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&nbsp;", " ")
}

fn collapse(text: &str) -> String {
    let p = patterns();
    let text = p.spaces.replace_all(text, " ");
    let lines: Vec<&str> = text.lines().map(str::trim).collect();
    let joined = lines.join("\n");
    p.blank_lines.replace_all(&joined, "\n\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><head><title>Sample &amp; Title</title>
        <style>body { color: red; }</style></head>
        <body><nav><a href="/">home</a></nav>
        <h1>Heading</h1>
        <p>First <strong>bold</strong> paragraph.</p>
        <p>See <a href="https://example.com/doc">the docs</a>.</p>
        <script>var x = 1;</script>
        <footer>copyright</footer></body></html>"#;

    #[test]
    fn text_strips_scripts_styles_and_chrome() {
        let text = html_to_text(PAGE);
        assert!(text.contains("First bold paragraph."));
        assert!(!text.contains("var x"));
        assert!(!text.contains("color: red"));
        assert!(!text.contains("copyright"));
        assert!(!text.contains("home"));
    }

    #[test]
    fn title_is_extracted_and_decoded() {
        assert_eq!(extract_title(PAGE).as_deref(), Some("Sample & Title"));
        assert_eq!(extract_title("<p>no title</p>"), None);
    }

    #[test]
    fn markdown_keeps_structure() {
        let md = html_to_markdown(PAGE);
        assert!(md.contains("# Heading"));
        assert!(md.contains("**bold**"));
        assert!(md.contains("[the docs](https://example.com/doc)"));
    }

    #[test]
    fn markdown_renders_list_items() {
        let md = html_to_markdown("<ul><li>one</li><li>two</li></ul>");
        assert!(md.contains("- one"));
        assert!(md.contains("- two"));
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert_eq!(html_to_text(""), "");
        assert_eq!(html_to_markdown(""), "");
    }

    #[test]
    fn container_extraction_finds_article() {
        let html = "<body><div>junk</div><article><p>the story</p></article></body>";
        let inner = extract_container(html, "article").unwrap();
        assert!(inner.contains("the story"));
        assert!(extract_container(html, "main").is_none());
    }

    #[test]
    fn div_class_extraction_matches_word_boundary() {
        let html = r#"<div class="post-content wide"><p>body</p></div>"#;
        assert!(extract_div_with_class(html, "post-content").is_some());
        assert!(extract_div_with_class(html, "content").is_none());
    }
}
