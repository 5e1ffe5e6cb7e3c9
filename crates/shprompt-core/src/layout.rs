//! Width negotiation for the working-directory path.
//!
//! Everything here measures in codepoints. Byte offsets never leak out.

/// Marker shown in place of a truncated path head.
pub const ELLIPSIS: &str = "…";

/// Columns held back for [`ELLIPSIS`] whenever a path is truncated.
pub const TRUNCATION_RESERVE: i64 = 1;

/// Below this budget the path gets a line of its own.
pub const DEFAULT_MIN_PATH_WIDTH: i64 = 20;

/// Where the path goes and how many columns it may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathPlacement {
    pub budget: usize,
    pub own_line: bool,
}

/// Decides how much of a `width`-column line is left for the path once the
/// fixed segments before and after it are placed.
///
/// When the line is wide enough to be worth it (`width >= min_path_width`)
/// but the leftover space is not, the path moves to its own line and gets the
/// whole width.
pub fn negotiate(
    width: i64,
    before_len: usize,
    after_len: usize,
    min_path_width: i64,
) -> PathPlacement {
    let remaining = (width - before_len as i64 - after_len as i64).max(0);
    if width >= min_path_width && remaining < min_path_width {
        PathPlacement {
            budget: width as usize,
            own_line: true,
        }
    } else {
        PathPlacement {
            budget: remaining as usize,
            own_line: false,
        }
    }
}

/// Shortens `path` to fit `budget` columns by dropping its head.
///
/// A truncated path starts with [`ELLIPSIS`]. When there is no room for any of
/// the path the result is empty.
pub fn truncate_path(path: &str, budget: usize) -> String {
    let n = path.chars().count() as i64;
    let cut = n - (budget as i64 - TRUNCATION_RESERVE);
    if cut <= 0 {
        return path.to_string();
    }
    if cut >= n {
        return String::new();
    }
    let start = path
        .char_indices()
        .nth(cut as usize)
        .map_or(path.len(), |(i, _)| i);
    format!("{ELLIPSIS}{}", &path[start..])
}

/// Replaces a leading `home` in `pwd` with `~`.
///
/// `home` may carry one trailing slash. The match is a plain string prefix,
/// so `/home/meg` becomes `~g` when home is `/home/me`. An unknown (empty)
/// home never matches. An empty result is shown as `/`.
pub fn collapse_home(pwd: &str, home: &str) -> String {
    let home = home.strip_suffix('/').unwrap_or(home);
    let collapsed = match pwd.strip_prefix(home) {
        Some(rest) if !home.is_empty() => format!("~{rest}"),
        _ => pwd.to_string(),
    };
    if collapsed.is_empty() {
        "/".to_string()
    } else {
        collapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIGITS: &str = "1234567890123456789012345678901234567890";

    #[test]
    fn test_truncate_path_fits() {
        assert_eq!(truncate_path("/pw/d", 100), "/pw/d");
        assert_eq!(truncate_path("/pw/d", 6), "/pw/d");
    }

    #[test]
    fn test_truncate_path_cuts_head() {
        let truncated = truncate_path(DIGITS, 26);
        assert_eq!(truncated, "…6789012345678901234567890");
        assert_eq!(truncated.chars().count(), 26);
    }

    #[test]
    fn test_truncate_path_fills_budget() {
        // The ellipsis takes exactly one column; the tail gets the rest.
        for budget in 2..40 {
            assert_eq!(truncate_path(DIGITS, budget).chars().count(), budget);
        }
        assert_eq!(truncate_path(DIGITS, 30), "…23456789012345678901234567890");
    }

    #[test]
    fn test_truncate_path_no_room() {
        assert_eq!(truncate_path(DIGITS, 1), "");
        assert_eq!(truncate_path(DIGITS, 0), "");
        assert_eq!(truncate_path("/", 0), "");
    }

    #[test]
    fn test_truncate_path_smallest_visible_tail() {
        assert_eq!(truncate_path("abcdef", 2), "…f");
        assert_eq!(truncate_path("abcdef", 3), "…ef");
    }

    #[test]
    fn test_truncate_path_multibyte() {
        // Ten 3-byte characters; cutting by codepoint keeps whole characters.
        let path = "日本語日本語日本語日";
        let truncated = truncate_path(path, 6);
        assert_eq!(truncated, "…語日本語日");
        assert_eq!(truncated.chars().count(), 6);
    }

    #[test]
    fn test_negotiate_shared_line() {
        let placement = negotiate(100, 26, 5, DEFAULT_MIN_PATH_WIDTH);
        assert_eq!(
            placement,
            PathPlacement {
                budget: 69,
                own_line: false
            }
        );
    }

    #[test]
    fn test_negotiate_own_line() {
        let placement = negotiate(30, 26, 0, DEFAULT_MIN_PATH_WIDTH);
        assert_eq!(
            placement,
            PathPlacement {
                budget: 30,
                own_line: true
            }
        );
    }

    #[test]
    fn test_negotiate_narrow_terminal_never_wraps() {
        let placement = negotiate(15, 26, 0, DEFAULT_MIN_PATH_WIDTH);
        assert_eq!(
            placement,
            PathPlacement {
                budget: 0,
                own_line: false
            }
        );
    }

    #[test]
    fn test_negotiate_negative_width() {
        let placement = negotiate(-5, 3, 3, DEFAULT_MIN_PATH_WIDTH);
        assert_eq!(placement.budget, 0);
        assert!(!placement.own_line);
    }

    #[test]
    fn test_collapse_home() {
        assert_eq!(collapse_home("/home/me/place", "/home/me"), "~/place");
        assert_eq!(collapse_home("/home/me/place", "/home/me/"), "~/place");
        assert_eq!(collapse_home("/home/me", "/home/me"), "~");
    }

    #[test]
    fn test_collapse_home_matches_plain_prefix() {
        assert_eq!(collapse_home("/home/meg/x", "/home/me"), "~g/x");
        assert_eq!(collapse_home("/elsewhere", "/home/me"), "/elsewhere");
    }

    #[test]
    fn test_collapse_home_missing_home() {
        assert_eq!(collapse_home("/pw/d", ""), "/pw/d");
        assert_eq!(collapse_home("", ""), "/");
    }
}
