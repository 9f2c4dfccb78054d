//! Unified-diff previews for pending actions.

use onyx_core::CancellationToken;

use crate::action::RefactoringAction;
use crate::document::Document;
use crate::error::ApplyError;
use crate::rewrite;

/// Render the diff a pending action would produce, without committing it.
///
/// Runs the deferred transform against the snapshot and diffs the texts;
/// the snapshot itself is untouched.
pub fn preview_action(
    document: &Document,
    action: &RefactoringAction,
    cancellation: &CancellationToken,
) -> Result<String, ApplyError> {
    let after = rewrite::execute(action, document, cancellation)?;
    Ok(unified_diff(&document.text(), &after.text()))
}

fn unified_diff(before: &str, after: &str) -> String {
    similar::TextDiff::from_lines(before, after)
        .unified_diff()
        .context_radius(3)
        .header("before", "after")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diff_shows_changed_lines() {
        let diff = unified_diff("a\nb\nc\n", "a\nX\nc\n");
        assert!(diff.contains("-b"));
        assert!(diff.contains("+X"));
    }
}
