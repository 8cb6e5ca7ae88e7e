//! Derives a human-readable section title from a page URL.

use url::Url;

/// Extract the final path segment (the slug) from a page URL.
///
/// The slug doubles as the section anchor stored alongside each block.
/// No casing or punctuation normalization is applied. A URL with an
/// empty path, or one that does not parse, yields an empty string.
///
/// # Examples
///
/// ```
/// use docsift::url_title::extract_title;
///
/// assert_eq!(
///     extract_title("https://docs.example.com/5.1/foo/bar/"),
///     "bar"
/// );
/// assert_eq!(extract_title("https://docs.example.com/"), "");
/// ```
pub fn extract_title(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return String::new();
    };

    let path = parsed.path().trim_matches('/');
    path.rsplit('/').next().unwrap_or("").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_last_path_segment() {
        assert_eq!(
            extract_title("https://docs.example.com/5.1/foo/bar/"),
            "bar"
        );
        assert_eq!(
            extract_title("https://docs.example.com/guides/lighting"),
            "lighting"
        );
    }

    #[test]
    fn empty_path_yields_empty_string() {
        assert_eq!(extract_title("https://docs.example.com/"), "");
        assert_eq!(extract_title("https://docs.example.com"), "");
    }

    #[test]
    fn query_and_fragment_are_ignored() {
        assert_eq!(
            extract_title("https://docs.example.com/a/b?lang=en#frag"),
            "b"
        );
    }

    #[test]
    fn unparseable_url_yields_empty_string() {
        assert_eq!(extract_title("not a url"), "");
    }
}
