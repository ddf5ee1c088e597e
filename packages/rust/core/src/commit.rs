//! Commit message for publishing the generated wiki.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Length of `{shaShort}`.
const SHORT_SHA_LEN: usize = 7;

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{(commitMessage|shaFull|shaShort)\}").expect("valid regex")
});

/// Fill `{commitMessage}`, `{shaFull}` and `{shaShort}` in `template`.
///
/// Placeholders are substituted in one pass, so text inside the commit
/// message is never expanded. Without a template the source commit message
/// is reused as is.
pub fn render_commit_message(template: Option<&str>, message: &str, sha: &str) -> String {
    let Some(template) = template else {
        return message.to_string();
    };

    let short = sha.get(..SHORT_SHA_LEN).unwrap_or(sha);
    PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures<'_>| match &caps[1] {
            "commitMessage" => message,
            "shaFull" => sha,
            _ => short,
        })
        .into_owned()
}
