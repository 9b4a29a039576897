//! Markdown anchor/slug generation for the index section.

/// Generate an index link for an entry name.
pub fn render_toc_link(text: &str) -> String {
    format!("[{}](#{})", text, slug(text))
}

/// Generate an index list item.
pub fn render_toc_item(title: &str) -> String {
    format!("* {}", render_toc_link(title))
}

/// GitHub heading anchor slug:
/// - lowercase
/// - keep alphanumerics, spaces, and hyphens; strip everything else
/// - replace spaces with hyphens
fn slug(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.to_lowercase().chars() {
        if c.is_alphanumeric() || c == ' ' || c == '-' {
            slug.push(c);
        }
    }
    slug.replace(' ', "-")
}
