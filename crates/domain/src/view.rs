use crate::models::CommentId;
use serde::Serialize;

pub const EXCERPT_CHARS: usize = 1000;
pub const UNAVAILABLE_BODY: &str = "(deleted or unavailable)";
pub const UNANSWERED_INSTRUCTIONS: &str = "The OP hasn't verified a solution yet. The OP or a \
     subreddit moderator can mark a verified solution by replying to a helpful comment with !solved.";

/// 从存储和平台读到的解答快照
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionSnapshot {
    pub solution_id: CommentId,
    pub body: String,
    pub permalink: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SummaryView {
    Loading,
    Unanswered {
        headline: &'static str,
        instructions: &'static str,
    },
    Verified {
        headline: &'static str,
        solution_id: CommentId,
        excerpt: String,
        is_long: bool,
        expanded: bool,
        permalink: String,
        attribution_url: &'static str,
    },
}

pub fn render_summary(snapshot: Option<&SolutionSnapshot>, expanded: bool) -> SummaryView {
    let Some(s) = snapshot else {
        return SummaryView::Unanswered {
            headline: "Help Wanted",
            instructions: UNANSWERED_INSTRUCTIONS,
        };
    };

    // 按字符截断，避免切在 UTF-8 中间
    let is_long = s.body.chars().count() > EXCERPT_CHARS;
    let excerpt = if !is_long || expanded {
        s.body.clone()
    } else {
        let mut cut: String = s.body.chars().take(EXCERPT_CHARS).collect();
        cut.push('…');
        cut
    };

    SummaryView::Verified {
        headline: "Verified Solution",
        solution_id: s.solution_id.clone(),
        excerpt,
        is_long,
        expanded: expanded && is_long,
        permalink: s.permalink.clone(),
        attribution_url: crate::protocol::ATTRIBUTION_URL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(body: &str) -> SolutionSnapshot {
        SolutionSnapshot {
            solution_id: CommentId::new("t1_c1").unwrap(),
            body: body.to_string(),
            permalink: "https://x/comments/p1/_/c1".into(),
        }
    }

    #[test]
    fn test_unanswered() {
        match render_summary(None, false) {
            SummaryView::Unanswered { instructions, .. } => assert!(instructions.contains("!solved")),
            other => panic!("unexpected view: {:?}", other),
        }
    }

    #[test]
    fn test_short_body_is_not_truncated() {
        let view = render_summary(Some(&snapshot("use --force")), false);
        match view {
            SummaryView::Verified { excerpt, is_long, expanded, .. } => {
                assert_eq!(excerpt, "use --force");
                assert!(!is_long);
                assert!(!expanded);
            }
            other => panic!("unexpected view: {:?}", other),
        }
    }

    #[test]
    fn test_long_body_collapse_and_expand() {
        let body = "é".repeat(EXCERPT_CHARS + 5);
        match render_summary(Some(&snapshot(&body)), false) {
            SummaryView::Verified { excerpt, is_long, .. } => {
                assert!(is_long);
                assert_eq!(excerpt.chars().count(), EXCERPT_CHARS + 1);
                assert!(excerpt.ends_with('…'));
            }
            other => panic!("unexpected view: {:?}", other),
        }
        match render_summary(Some(&snapshot(&body)), true) {
            SummaryView::Verified { excerpt, expanded, .. } => {
                assert_eq!(excerpt, body);
                assert!(expanded);
            }
            other => panic!("unexpected view: {:?}", other),
        }
    }

    #[test]
    fn test_render_is_idempotent() {
        let s = snapshot("same body");
        assert_eq!(render_summary(Some(&s), false), render_summary(Some(&s), false));
        assert_eq!(render_summary(None, true), render_summary(None, true));
    }
}
