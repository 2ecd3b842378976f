//! HTML rendering for coverage links.

/// Renders one coverage link as `<a href="{url}">{station}: {title}</a>`.
///
/// Text and attribute values are escaped; the result is otherwise opaque to
/// the rest of the pipeline.
#[must_use]
pub fn render_link(url: &str, station_name: &str, title: &str) -> String {
    format!(
        "<a href=\"{}\">{}: {}</a>",
        html_escape::encode_double_quoted_attribute(url),
        html_escape::encode_text(station_name),
        html_escape::encode_text(title)
    )
}
