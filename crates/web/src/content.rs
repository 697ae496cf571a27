//! Lesson content rendering.
//!
//! Lesson bodies are authored in markdown and rendered to HTML on request.
//! Raw HTML in lesson source is escaped.

use comrak::{Options, markdown_to_html};

/// Render lesson markdown to HTML.
#[must_use]
pub fn render_markdown(content: &str) -> String {
    let mut options = Options::default();

    // Enable GFM extensions
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.extension.header_ids = Some("lesson-".to_string());

    markdown_to_html(content, &options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_headings_and_lists() {
        let html = render_markdown("## Parts\n\n- battery\n- motor\n");
        assert!(html.contains("<h2>"));
        assert!(html.contains("lesson-parts"));
        assert!(html.contains("<li>battery</li>"));
    }

    #[test]
    fn test_escapes_raw_html() {
        let html = render_markdown("<script>alert(1)</script>\n\nhello");
        assert!(!html.contains("<script>"));
        assert!(html.contains("hello"));
    }

    #[test]
    fn test_renders_tables() {
        let html = render_markdown("| Pin | Use |\n|---|---|\n| D2 | LED |\n");
        assert!(html.contains("<table>"));
    }
}
