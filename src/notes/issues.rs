use regex::Regex;
use std::sync::LazyLock;

// keyword, whitespace, then #<number>
static ISSUE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:close[sd]?|fix(?:e[sd])?|resolve[sd]?|update[sd]?|see)\s+#(\d+)",
    )
    .unwrap()
});

/// Collect every issue number referenced by a closing phrase such as
/// "Closes #12" or "see #7". Repeated references are kept.
pub fn extract_issues(body: &str) -> Vec<u64> {
    ISSUE_REGEX
        .captures_iter(body)
        .filter_map(|caps| caps.get(1))
        .filter_map(|m| m.as_str().parse::<u64>().ok())
        .collect()
}
