/// Convert a space name into a URL slug.
///
/// Lowercases and trims, drops everything except word characters,
/// whitespace and hyphens, collapses runs of whitespace, underscores and
/// hyphens into a single hyphen, then strips leading and trailing hyphens.
pub fn generate_slug(name: &str) -> String {
    let lowered = name.to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut pending_sep = false;

    for c in lowered.trim().chars() {
        if c.is_whitespace() || c == '_' || c == '-' {
            pending_sep = true;
        } else if c.is_ascii_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('-');
            }
            pending_sep = false;
            slug.push(c);
        }
    }

    slug
}

/// Session cache key for a top-level space.
pub fn space_cache_key(slug: &str) -> String {
    format!("space_{slug}")
}

/// Session cache key for a space nested under a parent.
pub fn nested_space_cache_key(parent_slug: &str, child_slug: &str) -> String {
    format!("space_{parent_slug}_{child_slug}")
}
