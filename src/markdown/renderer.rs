//! Markdown to HTML rendering using pulldown-cmark

use pulldown_cmark::{html, Event, Options, Parser, Tag, TagEnd};

fn options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
}

/// Convert a markdown document to an HTML fragment
pub fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, options());
    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);
    html_output
}

/// Render the text of one heading to inline HTML (no `<hN>` wrapper)
///
/// The fragment is parsed in heading position so that text such as
/// "1. Introduction" or "- notes" stays inline instead of becoming a list.
pub fn heading_fragment_html(fragment: &str) -> String {
    let single_line = fragment.split_whitespace().collect::<Vec<_>>().join(" ");
    let source = format!("# {}", single_line);
    let parser = Parser::new_ext(&source, options()).filter(|event| {
        !matches!(
            event,
            Event::Start(Tag::Heading { .. }) | Event::End(TagEnd::Heading(_))
        )
    });

    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);
    html_output.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_to_html_headings() {
        let html = markdown_to_html("# Title\n\ntext\n\n## Sub\n");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<h2>Sub</h2>"));
    }

    #[test]
    fn test_heading_fragment_inline_markup() {
        assert_eq!(
            heading_fragment_html("**Bold** title"),
            "<strong>Bold</strong> title"
        );
        assert_eq!(heading_fragment_html("`code`"), "<code>code</code>");
    }

    #[test]
    fn test_heading_fragment_list_like_text_stays_inline() {
        assert_eq!(heading_fragment_html("1. Introduction"), "1. Introduction");
    }

    #[test]
    fn test_heading_fragment_joins_lines() {
        assert_eq!(heading_fragment_html("Line one\nline two"), "Line one line two");
    }
}
