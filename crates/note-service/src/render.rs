//! Server-side rendering for shared (read-only) notes.

use note_store::{NoteMode, NoteRecord};
use pulldown_cmark::{Options, Parser, html as md_html};

/// Escapes HTML special characters in untrusted text.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Converts a CommonMark markdown string to an HTML string.
///
/// Enables strikethrough and tables (GFM extensions).
pub fn render_markdown(text: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    let parser = Parser::new_ext(text, options);
    let mut html_output = String::new();
    md_html::push_html(&mut html_output, parser);
    html_output
}

/// Escaped plain text with line breaks preserved.
pub fn render_plain(text: &str) -> String {
    format!("<pre class=\"note-plain\">{}</pre>", html_escape(text))
}

/// Renders a note body according to its mode.
pub fn note_html(record: &NoteRecord) -> String {
    match record.meta.mode {
        NoteMode::Md => render_markdown(&record.body),
        NoteMode::Plain => render_plain(&record.body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use note_store::NoteMeta;

    #[test]
    fn markdown_renders_headings_and_tables() {
        let html = render_markdown("# Title\n\n| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<table>"));
    }

    #[test]
    fn plain_mode_escapes_markup() {
        let html = render_plain("<script>alert(1)</script>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn note_html_follows_mode() {
        let mut record = NoteRecord {
            body: "# hi".to_string(),
            meta: NoteMeta::default(),
        };
        assert!(note_html(&record).contains("# hi"));

        record.meta.mode = NoteMode::Md;
        assert!(note_html(&record).contains("<h1>hi</h1>"));
    }
}
