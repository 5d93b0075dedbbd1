use crate::models::{CommentId, Thread, ThreadId};
use once_cell::sync::Lazy;
use regex::Regex;

pub const ATTRIBUTION_URL: &str = "https://developers.reddit.com/apps/solutionpinner";
pub const TOMBSTONE_TEXT: &str =
    "[Replaced by a new verified solution]\n\nThis used to be the old solution.";
pub const METADATA_SOLUTION_FIELD: &str = "verifiedSolutionId";
pub const METADATA_ORIGINAL_FIELD: &str = "originalThreadId";

// `!` 必须位于开头或紧跟在非字母数字字符之后，关键字后面必须是词边界
static COMMAND_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:^|[^A-Za-z0-9])!(?:solved|solution|answer)\b")
        .expect("command regex is valid")
});

pub fn is_solution_command(body: &str) -> bool {
    COMMAND_RE.is_match(body.trim())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesignatedBy {
    Op,
    Moderator,
}

impl DesignatedBy {
    fn label(self) -> &'static str {
        match self {
            DesignatedBy::Op => "OP",
            DesignatedBy::Moderator => "a moderator",
        }
    }
}

pub fn synthesize_permalink(base_url: &str, thread_id: &ThreadId, comment_id: &CommentId) -> String {
    format!(
        "{}/comments/{}/_/{}",
        base_url.trim_end_matches('/'),
        thread_id,
        comment_id
    )
}

/// 平台给的 permalink 可能是相对路径 (/r/x/comments/...)，补全成绝对地址
pub fn absolutize_permalink(base_url: &str, permalink: &str) -> String {
    if permalink.starts_with("http://") || permalink.starts_with("https://") {
        permalink.to_string()
    } else {
        format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            permalink.trim_start_matches('/')
        )
    }
}

pub fn build_confirmation_body(permalink: &str, by: DesignatedBy) -> String {
    format!(
        " #### **Verified solution by {}** - [Navigate]({})\n\n ^([Get solutionpinner]({}))",
        by.label(),
        permalink,
        ATTRIBUTION_URL
    )
}

pub fn build_duplicate_title(original: &Thread) -> String {
    let title = if original.title.trim().is_empty() {
        "Untitled"
    } else {
        original.title.as_str()
    };
    format!("Copy: {}", title)
}

pub fn build_duplicate_body(original_url: Option<&str>, original_body: &str) -> String {
    let body = if original_body.is_empty() {
        "(no body)"
    } else {
        original_body
    };
    match original_url {
        Some(url) => format!("Original: {}\n\n---\n\n{}", url, body),
        None => format!("---\n\n{}", body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_recognition() {
        let hits = [
            "!solved",
            "!SOLUTION",
            "!Answer",
            "  !solved  ",
            "Thanks, that worked! !solved",
            "that did it (!answer)",
            "done.!solution",
            "!solved!",
            "line one\n!answer please",
        ];
        for text in hits {
            assert!(is_solution_command(text), "should match: {:?}", text);
        }

        let misses = [
            "",
            "resolved!",
            "this is resolved",
            "foo!solved",
            "x1!answer",
            "!solvedit",
            "!answers",
            "solved",
            "! solved",
            "!solve",
        ];
        for text in misses {
            assert!(!is_solution_command(text), "should not match: {:?}", text);
        }
    }

    #[test]
    fn test_permalinks() {
        let t = ThreadId::new("t3_p1").unwrap();
        let c = CommentId::new("t1_c1").unwrap();
        assert_eq!(
            synthesize_permalink("https://www.reddit.com/", &t, &c),
            "https://www.reddit.com/comments/t3_p1/_/t1_c1"
        );
        assert_eq!(
            absolutize_permalink("https://www.reddit.com", "/r/x/comments/p1/_/c1/"),
            "https://www.reddit.com/r/x/comments/p1/_/c1/"
        );
        assert_eq!(
            absolutize_permalink("https://www.reddit.com", "https://example.org/c1"),
            "https://example.org/c1"
        );
    }

    #[test]
    fn test_confirmation_body() {
        let body = build_confirmation_body("https://x/c1", DesignatedBy::Op);
        assert!(body.contains("Verified solution by OP"));
        assert!(body.contains("[Navigate](https://x/c1)"));
        assert!(body.contains(ATTRIBUTION_URL));

        let body = build_confirmation_body("https://x/c2", DesignatedBy::Moderator);
        assert!(body.contains("by a moderator"));
    }

    #[test]
    fn test_duplicate_body() {
        assert_eq!(
            build_duplicate_body(Some("https://x/p1"), "hello"),
            "Original: https://x/p1\n\n---\n\nhello"
        );
        assert_eq!(build_duplicate_body(None, ""), "---\n\n(no body)");
    }
}
