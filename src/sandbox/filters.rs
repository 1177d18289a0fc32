//! Include/exclude list adjustment for the engine's `web` keyword.
//!
//! The engine treats a bare `web` token as "web content" rather than a
//! package named `web`, so package references get a trailing slash. A
//! project's `web` folder is also always excluded unless the engine is told
//! otherwise.

/// Token the engine interprets as the project's web content folder.
pub const KEYWORD_WEB: &str = "web";

/// Replace every token exactly equal to `web` in a comma-separated list with `web/`.
#[must_use]
pub fn qualify_web_with_slash(original: &str) -> String {
    original
        .split(',')
        .map(|token| if token == KEYWORD_WEB { "web/" } else { token })
        .collect::<Vec<_>>()
        .join(",")
}

/// Adjusted `--include` / `--exclude` values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filters {
    pub include: Option<String>,
    pub exclude: String,
}

/// Qualify `web` tokens in both lists and append the default `web` exclusion.
///
/// An empty include is passed through untouched. The exclude list always
/// ends up non-empty.
#[must_use]
pub fn adjust_include_exclude(include: Option<&str>, exclude: Option<&str>) -> Filters {
    let include = include.map(|inc| {
        if inc.is_empty() {
            inc.to_owned()
        } else {
            qualify_web_with_slash(inc)
        }
    });

    let exclude = match exclude {
        Some(exc) if !exc.is_empty() => format!("{},{KEYWORD_WEB}", qualify_web_with_slash(exc)),
        _ => KEYWORD_WEB.to_owned(),
    };

    Filters { include, exclude }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualify_only_exact_tokens() {
        assert_eq!(qualify_web_with_slash("web"), "web/");
        assert_eq!(qualify_web_with_slash("a,web,b"), "a,web/,b");
        assert_eq!(qualify_web_with_slash("website,web2,web/"), "website,web2,web/");
    }

    #[test]
    fn test_qualify_does_not_trim() {
        assert_eq!(qualify_web_with_slash("a, web"), "a, web");
        assert_eq!(qualify_web_with_slash("a,,web"), "a,,web/");
    }

    #[test]
    fn test_default_exclusion_when_absent() {
        let f = adjust_include_exclude(None, None);
        assert_eq!(f.include, None);
        assert_eq!(f.exclude, "web");

        let f = adjust_include_exclude(Some(""), Some(""));
        assert_eq!(f.include.as_deref(), Some(""));
        assert_eq!(f.exclude, "web");
    }

    #[test]
    fn test_exclusion_appended_to_existing() {
        let f = adjust_include_exclude(Some("web,admin"), Some("web,tests"));
        assert_eq!(f.include.as_deref(), Some("web/,admin"));
        assert_eq!(f.exclude, "web/,tests,web");
    }
}
