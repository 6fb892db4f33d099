use std::path::Path;

/// Normalized lookup key for a page file: basename, extension stripped, lowercased.
///
/// `pages/Welcome.Email.TXT` becomes `welcome.email`. Only the last extension
/// is removed, so a bare dotfile such as `.tmpl` normalizes to the empty string.
pub fn normalize(path: &Path) -> String {
    let base = basename(path);
    let stem = match base.rfind('.') {
        Some(idx) => &base[..idx],
        None => base.as_str(),
    };
    stem.to_ascii_lowercase()
}

/// Lookup key for a destination field.
pub fn field_key(field: &str) -> String {
    field.to_ascii_lowercase()
}

/// Final path component, used as the template's name inside its Tera context.
pub(crate) fn basename(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_extension_and_lowercases() {
        assert_eq!(normalize(Path::new("One.TXT")), "one");
        assert_eq!(normalize(Path::new("one.tmpl")), "one");
        assert_eq!(normalize(Path::new("ONE.md")), "one");
    }

    #[test]
    fn uses_basename_only() {
        assert_eq!(normalize(Path::new("/srv/pages/Home.html")), "home");
        assert_eq!(normalize(Path::new("nested/dir/about")), "about");
    }

    #[test]
    fn strips_only_last_extension() {
        assert_eq!(normalize(Path::new("welcome.email.tmpl")), "welcome.email");
    }

    #[test]
    fn bare_dotfile_normalizes_to_empty() {
        assert_eq!(normalize(Path::new("dir/.tmpl")), "");
    }

    #[test]
    fn field_key_matches_normalized_name() {
        assert_eq!(field_key("One"), normalize(Path::new("one.tmpl")));
        assert_eq!(field_key("welcome_email"), normalize(Path::new("Welcome_Email.txt")));
    }
}
