//! Request URL construction

use url::Url;

use crate::error::HttpError;
use crate::response::Response;

/// Join a base address and a request path with exactly one `/` at the seam.
///
/// The operation is purely textual: neither side is normalized, percent
/// encoded or resolved. Only the join point is touched.
pub fn join_url(base: &str, path: &str) -> String {
    match (base.ends_with('/'), path.starts_with('/')) {
        (true, true) => format!("{base}{}", &path[1..]),
        (false, false) => format!("{base}/{path}"),
        _ => format!("{base}{path}"),
    }
}

/// Check that `base` is an absolute URL that can carry paths.
///
/// Returns the input unchanged; [`Url`] would otherwise add a trailing slash
/// to bare hosts and shift the join point.
pub(crate) fn validate_base_url(base: &str) -> Response<String> {
    let parsed = Url::parse(base).map_err(|e| HttpError::InvalidUrl(format!("{base}: {e}")))?;
    if parsed.cannot_be_a_base() {
        return Err(HttpError::InvalidUrl(format!(
            "{base}: not usable as a base address"
        )));
    }
    Ok(base.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_drops_duplicate_slash() {
        assert_eq!(join_url("http://x/", "/y"), "http://x/y");
    }

    #[test]
    fn test_join_inserts_missing_slash() {
        assert_eq!(join_url("http://x", "y"), "http://x/y");
    }

    #[test]
    fn test_join_keeps_single_slash() {
        assert_eq!(join_url("http://x/", "y"), "http://x/y");
        assert_eq!(join_url("http://x", "/y"), "http://x/y");
    }

    #[test]
    fn test_join_with_base_path() {
        assert_eq!(
            join_url("https://api.example.com/v2/", "/users/7"),
            "https://api.example.com/v2/users/7"
        );
        assert_eq!(
            join_url("https://api.example.com/v2", "users/7?active=true"),
            "https://api.example.com/v2/users/7?active=true"
        );
    }

    #[test]
    fn test_join_only_touches_the_seam() {
        // Interior slashes belong to the caller
        assert_eq!(join_url("http://x/", "/a//b"), "http://x/a//b");
        assert_eq!(join_url("http://x/", "//y"), "http://x//y");
    }

    #[test]
    fn test_join_never_doubles_or_drops_slash() {
        let bases = ["http://x", "http://x/", "http://x/api", "http://x/api/"];
        let paths = ["y", "/y", "y/z", "/y/z"];

        for base in bases {
            for path in paths {
                let joined = join_url(base, path);
                let seam = base.trim_end_matches('/').len();
                let tail = &joined[seam..];
                assert!(tail.starts_with('/'), "{base} + {path} -> {joined}");
                assert!(!tail.starts_with("//"), "{base} + {path} -> {joined}");
                assert!(joined.ends_with(path.trim_start_matches('/')));
            }
        }
    }

    #[test]
    fn test_empty_path() {
        assert_eq!(join_url("http://x", ""), "http://x/");
        assert_eq!(join_url("http://x/", ""), "http://x/");
    }

    #[test]
    fn test_validate_base_url() {
        assert_eq!(
            validate_base_url("http://localhost:8080").expect("valid base"),
            "http://localhost:8080"
        );
        assert_eq!(
            validate_base_url("https://example.com/api/").expect("valid base"),
            "https://example.com/api/"
        );
    }

    #[test]
    fn test_validate_rejects_relative_and_opaque() {
        assert!(matches!(
            validate_base_url("/relative/only"),
            Err(HttpError::InvalidUrl(_))
        ));
        assert!(matches!(
            validate_base_url("mailto:someone@example.com"),
            Err(HttpError::InvalidUrl(_))
        ));
    }
}
