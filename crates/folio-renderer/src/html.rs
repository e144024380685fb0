//! HTML element writers used by the markdown renderer.
//!
//! Produces semantic HTML5 fragments. All text content is escaped with
//! [`html_escape::encode_text`] and attribute values with
//! [`html_escape::encode_double_quoted_attribute`].

use html_escape::{encode_double_quoted_attribute, encode_text};

/// Write a fenced or indented code block.
pub(crate) fn code_block(lang: Option<&str>, content: &str, out: &mut String) {
    match lang {
        Some(lang) => {
            out.push_str(r#"<pre><code class="language-"#);
            out.push_str(&encode_double_quoted_attribute(lang));
            out.push_str(r#"">"#);
        }
        None => out.push_str("<pre><code>"),
    }
    out.push_str(&encode_text(content));
    out.push_str("</code></pre>");
}

/// Write an `<img>` element.
///
/// The figure post-processor later reads `alt` back, so it is written in full
/// (including any `|key=value` directive segments).
pub(crate) fn image(src: &str, alt: &str, title: &str, out: &mut String) {
    out.push_str(r#"<img src=""#);
    out.push_str(&encode_double_quoted_attribute(src));
    out.push('"');
    if !title.is_empty() {
        out.push_str(r#" title=""#);
        out.push_str(&encode_double_quoted_attribute(title));
        out.push('"');
    }
    out.push_str(r#" alt=""#);
    out.push_str(&encode_double_quoted_attribute(alt));
    out.push_str(r#"">"#);
}

/// Write a heading with its anchor ID and optional classes.
pub(crate) fn heading(level: u8, id: &str, classes: &[String], inner_html: &str, out: &mut String) {
    out.push_str("<h");
    out.push_str(&level.to_string());
    out.push_str(r#" id=""#);
    out.push_str(&encode_double_quoted_attribute(id));
    out.push('"');
    if !classes.is_empty() {
        out.push_str(r#" class=""#);
        out.push_str(&encode_double_quoted_attribute(&classes.join(" ")));
        out.push('"');
    }
    out.push('>');
    out.push_str(inner_html.trim());
    out.push_str("</h");
    out.push_str(&level.to_string());
    out.push('>');
}

/// Write a link opening tag.
pub(crate) fn link_start(href: &str, title: &str) -> String {
    let mut tag = String::from(r#"<a href=""#);
    tag.push_str(&encode_double_quoted_attribute(href));
    tag.push('"');
    if !title.is_empty() {
        tag.push_str(r#" title=""#);
        tag.push_str(&encode_double_quoted_attribute(title));
        tag.push('"');
    }
    tag.push('>');
    tag
}

/// Write a task list checkbox.
pub(crate) fn task_list_marker(checked: bool, out: &mut String) {
    if checked {
        out.push_str(r#"<input type="checkbox" checked disabled> "#);
    } else {
        out.push_str(r#"<input type="checkbox" disabled> "#);
    }
}

/// Write a footnote reference (`[^label]` in the source).
pub(crate) fn footnote_reference(label: &str, number: usize, out: &mut String) {
    let id = encode_double_quoted_attribute(label);
    out.push_str(r##"<sup class="footnote-reference"><a href="#fn-"##);
    out.push_str(&id);
    out.push_str(r#"">"#);
    out.push_str(&number.to_string());
    out.push_str("</a></sup>");
}

/// Write the opening of a footnote definition block.
pub(crate) fn footnote_definition_start(label: &str, number: usize, out: &mut String) {
    out.push_str(r#"<div class="footnote-definition" id="fn-"#);
    out.push_str(&encode_double_quoted_attribute(label));
    out.push_str(r#""><sup class="footnote-definition-label">"#);
    out.push_str(&number.to_string());
    out.push_str("</sup>");
}

/// Escape plain text for element content.
pub(crate) fn escape_text(text: &str, out: &mut String) {
    out.push_str(&encode_text(text));
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_code_block_with_language() {
        let mut out = String::new();
        code_block(Some("rust"), "fn main() {}", &mut out);
        assert_eq!(
            out,
            r#"<pre><code class="language-rust">fn main() {}</code></pre>"#
        );
    }

    #[test]
    fn test_code_block_without_language() {
        let mut out = String::new();
        code_block(None, "a < b", &mut out);
        assert_eq!(out, "<pre><code>a &lt; b</code></pre>");
    }

    #[test]
    fn test_image() {
        let mut out = String::new();
        image("image.png", "Alt text", "", &mut out);
        assert_eq!(out, r#"<img src="image.png" alt="Alt text">"#);
    }

    #[test]
    fn test_image_with_title() {
        let mut out = String::new();
        image("image.png", "Alt text", "Image title", &mut out);
        assert_eq!(
            out,
            r#"<img src="image.png" title="Image title" alt="Alt text">"#
        );
    }

    #[test]
    fn test_image_keeps_directives_in_alt() {
        let mut out = String::new();
        image("map.png", r#"Map|caption="North""#, "", &mut out);
        assert_eq!(
            out,
            r#"<img src="map.png" alt="Map|caption=&quot;North&quot;">"#
        );
    }

    #[test]
    fn test_heading_with_classes() {
        let mut out = String::new();
        heading(2, "intro", &["lead".to_owned(), "wide".to_owned()], " Intro ", &mut out);
        assert_eq!(out, r#"<h2 id="intro" class="lead wide">Intro</h2>"#);
    }

    #[test]
    fn test_link_start_with_title() {
        assert_eq!(
            link_start("/page/dragons", "All about \"dragons\""),
            r#"<a href="/page/dragons" title="All about &quot;dragons&quot;">"#
        );
    }

    #[test]
    fn test_footnote_reference() {
        let mut out = String::new();
        footnote_reference("note", 3, &mut out);
        assert_eq!(
            out,
            r##"<sup class="footnote-reference"><a href="#fn-note">3</a></sup>"##
        );
    }

    #[test]
    fn test_footnote_definition_start() {
        let mut out = String::new();
        footnote_definition_start("note", 1, &mut out);
        assert_eq!(
            out,
            r#"<div class="footnote-definition" id="fn-note"><sup class="footnote-definition-label">1</sup>"#
        );
    }
}
