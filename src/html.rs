//! Small markup helpers. Link text is inserted as-is because API text is
//! already entity-escaped; attribute values are escaped.

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn attrs(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!(" {}=\"{}\"", k, escape_attr(v)))
        .collect()
}

/// `<a href="..." k="v"...>text</a>`
pub fn link(href: &str, text: &str, extra: &[(&str, &str)]) -> String {
    format!("<a href=\"{}\"{}>{}</a>", escape_attr(href), attrs(extra), text)
}

pub fn image(src: &str, alt: &str, extra: &[(&str, &str)]) -> String {
    format!(
        "<img src=\"{}\" alt=\"{}\"{} />",
        escape_attr(src),
        escape_attr(alt),
        attrs(extra)
    )
}

pub fn iframe(src: &str, name: &str, extra: &[(&str, &str)]) -> String {
    format!(
        "<iframe src=\"{}\" name=\"{}\"{}></iframe>",
        escape_attr(src),
        escape_attr(name),
        attrs(extra)
    )
}
