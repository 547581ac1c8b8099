//! HTML to plain text conversion
//!
//! Answer bodies arrive as HTML. For terminal display the markup is dropped,
//! entities are decoded and every `<code>` element is called out as a
//! code snippet so it stays distinguishable from prose.

use scraper::{ElementRef, Html, Node};

/// Marker written before the text of each code element
const SNIPPET_HEADER: &str = "\nCode Snippet:\n";

/// Elements that end with a line break when rendered
const BLOCK_ELEMENTS: &[&str] = &[
    "p", "pre", "div", "li", "ul", "ol", "blockquote", "h1", "h2", "h3", "h4", "h5", "h6",
    "hr", "tr", "table",
];

/// Converts answer markup to readable plain text
///
/// Each `<code>` element becomes `"\nCode Snippet:\n<text>\n"`. Malformed
/// markup never fails; the parser recovers and whatever text it finds is
/// returned.
pub fn clean(markup: &str) -> String {
    let fragment = Html::parse_fragment(markup);
    let mut out = String::with_capacity(markup.len());
    render(fragment.root_element(), &mut out);
    tidy(&out)
}

/// Strips all markup and collapses whitespace into a single line
pub fn plain_text(markup: &str) -> String {
    let fragment = Html::parse_fragment(markup);
    fragment
        .root_element()
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn render(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => {
                let Some(child_el) = ElementRef::wrap(child) else {
                    continue;
                };
                match el.name() {
                    "code" => {
                        out.push_str(SNIPPET_HEADER);
                        out.extend(child_el.text());
                        out.push('\n');
                    }
                    "br" => out.push('\n'),
                    "script" | "style" => {}
                    name => {
                        render(child_el, out);
                        if BLOCK_ELEMENTS.contains(&name) {
                            out.push('\n');
                        }
                    }
                }
            }
            _ => {}
        }
    }
}

/// Trims trailing whitespace per line and collapses runs of blank lines
fn tidy(text: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    let mut previous_blank = true;

    for line in text.lines().map(str::trim_end) {
        let blank = line.is_empty();
        if blank && previous_blank {
            continue;
        }
        lines.push(line);
        previous_blank = blank;
    }

    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_code_is_tagged() {
        let text = clean("<code>x+y</code>");
        assert!(text.contains("Code Snippet"));
        assert!(text.contains("x+y"));
    }

    #[test]
    fn test_code_block_keeps_indentation() {
        let html = "<p>Try this:</p>\n<pre><code>fn main() {\n    println!(\"hi\");\n}\n</code></pre>\n<p>Done.</p>";
        let text = clean(html);

        assert_eq!(
            text,
            "Try this:\n\nCode Snippet:\nfn main() {\n    println!(\"hi\");\n}\n\nDone."
        );
    }

    #[test]
    fn test_code_inside_paragraph() {
        let text = clean("<p>Use <code>Vec::new()</code> here.</p>");
        assert_eq!(text, "Use\nCode Snippet:\nVec::new()\n here.");
    }

    #[test]
    fn test_entities_are_decoded() {
        let text = clean("<p>a &lt; b &amp;&amp; c &gt; d</p><code>&lt;div&gt;</code>");
        assert!(text.contains("a < b && c > d"));
        assert!(text.contains("<div>"));
    }

    #[test]
    fn test_nested_markup_inside_code_is_flattened() {
        let text = clean("<code><b>bold</b> <i>it</i></code>");
        assert!(text.contains("Code Snippet:\nbold it"));
    }

    #[test]
    fn test_list_items_on_separate_lines() {
        let text = clean("<ul><li>one</li><li>two</li></ul>");
        assert_eq!(text, "one\ntwo");
    }

    #[test]
    fn test_malformed_markup_degrades_to_text() {
        let text = clean("<p>unclosed <b>bold <div>and</p> stray</i> text");
        assert!(text.contains("unclosed"));
        assert!(text.contains("bold"));
        assert!(text.contains("stray"));
        assert!(text.contains("text"));
    }

    #[test]
    fn test_plain_input_passes_through() {
        assert_eq!(clean("just words"), "just words");
        assert_eq!(clean(""), "");
    }

    #[test]
    fn test_script_content_is_dropped() {
        let text = clean("<p>visible</p><script>alert(1)</script>");
        assert_eq!(text, "visible");
    }

    #[test]
    fn test_plain_text_collapses_whitespace() {
        assert_eq!(plain_text("  How do I <em>sort</em>\n a   Vec?  "), "How do I sort a Vec?");
        assert_eq!(plain_text("Don&#39;t panic"), "Don't panic");
    }

    #[test]
    fn test_tidy_collapses_blank_runs() {
        assert_eq!(tidy("\n\na\n\n\n\nb  \n\n"), "a\n\nb");
    }
}
