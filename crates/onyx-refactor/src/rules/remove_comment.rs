//! Remove the comment under the cursor.

use onyx_syntax::{token_range, SyntaxKind, SyntaxToken, TextEdit, TextRange};

use crate::action::{ActionRegistry, RefactoringAction};
use crate::context::RefactoringContext;
use crate::error::{ApplyError, RuleError};
use crate::rewrite::{self, comment_run_bounds, trivia_run};
use crate::rule::TriviaRefactoring;
use crate::settings::RefactoringId;

pub(crate) struct RemoveComment;

impl TriviaRefactoring for RemoveComment {
    fn id(&self) -> RefactoringId {
        RefactoringId::RemoveComment
    }

    fn compute(
        &self,
        trivia: &SyntaxToken,
        ctx: &RefactoringContext<'_>,
        registry: &mut ActionRegistry,
    ) -> Result<(), RuleError> {
        if !trivia.kind().is_comment() {
            return Ok(());
        }

        let (run, index) = trivia_run(trivia);
        let (lo, hi) = comment_run_bounds(&run, index);

        // For a line-comment group the deletion spans from the outermost
        // left comment to the outermost right one, absorbing only the
        // whitespace/line breaks *between* them, plus the horizontal
        // whitespace immediately before the group so no trailing spaces are
        // left behind. Block and doc comments delete exactly themselves,
        // absorbing no neighbors.
        let mut start = token_range(&run[lo]).start as usize;
        if trivia.kind() == SyntaxKind::LineComment
            && lo > 0
            && run[lo - 1].kind() == SyntaxKind::Whitespace
        {
            start = token_range(&run[lo - 1]).start as usize;
        }
        let end = token_range(&run[hi]).end as usize;
        let deletion = TextRange::new(start, end);

        let expected: String = ctx
            .document()
            .text()
            .get(start..end)
            .unwrap_or_default()
            .to_string();

        registry.register(RefactoringAction::new(
            self.id(),
            "Remove comment",
            Box::new(move |doc, _ct| {
                let text = doc.text();
                let current = text
                    .get(deletion.start as usize..deletion.end as usize)
                    .ok_or(ApplyError::Stale)?;
                if current != expected {
                    return Err(ApplyError::Stale);
                }
                let new_text =
                    rewrite::apply_text_edits(&text, &[TextEdit::new(deletion, "")])?;
                Ok(doc.with_text(&new_text))
            }),
        ));
        Ok(())
    }
}
