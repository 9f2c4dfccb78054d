//! Remove every comment in the document.

use onyx_syntax::{token_range, SyntaxKind, SyntaxToken, TextEdit, TextRange};

use crate::action::{ActionRegistry, RefactoringAction};
use crate::context::RefactoringContext;
use crate::error::RuleError;
use crate::rewrite;
use crate::rule::TriviaRefactoring;
use crate::settings::RefactoringId;

pub(crate) struct RemoveAllComments;

impl TriviaRefactoring for RemoveAllComments {
    fn id(&self) -> RefactoringId {
        RefactoringId::RemoveAllComments
    }

    fn compute(
        &self,
        trivia: &SyntaxToken,
        _ctx: &RefactoringContext<'_>,
        registry: &mut ActionRegistry,
    ) -> Result<(), RuleError> {
        if !trivia.kind().is_comment() {
            return Ok(());
        }

        // No captured positions: the transform re-scans whichever snapshot
        // it is applied to, so it cannot go stale.
        registry.register(RefactoringAction::new(
            self.id(),
            "Remove all comments",
            Box::new(move |doc, ct| {
                let root = doc.root();
                let mut edits: Vec<TextEdit> = Vec::new();

                for token in root
                    .descendants_with_tokens()
                    .filter_map(|el| el.into_token())
                    .filter(|tok| tok.kind().is_comment())
                {
                    ct.check()?;
                    let tok_start = token_range(&token).start as usize;
                    let tok_end = token_range(&token).end as usize;

                    // Strict kind-filtering: only the comment itself and its
                    // immediate whitespace neighbors are ever deleted. A
                    // comment alone on its line takes the whole line; a
                    // comment starting a line of code takes its trailing
                    // spacing; everything else takes its leading spacing.
                    let prev = token.prev_token();
                    let next = token.next_token();
                    let (prev_ws, before) = match prev {
                        Some(t) if t.kind() == SyntaxKind::Whitespace => {
                            let before = t.prev_token();
                            (Some(t), before)
                        }
                        other => (None, other),
                    };
                    let at_line_start =
                        before.map_or(true, |t| t.kind() == SyntaxKind::Newline);
                    let next_is_newline =
                        next.as_ref().is_some_and(|t| t.kind() == SyntaxKind::Newline);
                    let next_ws = next
                        .as_ref()
                        .filter(|t| t.kind() == SyntaxKind::Whitespace)
                        .cloned();

                    let deletion = if at_line_start && (next.is_none() || next_is_newline) {
                        // Whole-line comment: drop the line.
                        let start = prev_ws
                            .as_ref()
                            .map(|ws| token_range(ws).start as usize)
                            .unwrap_or(tok_start);
                        let end = next
                            .as_ref()
                            .filter(|t| t.kind() == SyntaxKind::Newline)
                            .map(|nl| token_range(nl).end as usize)
                            .unwrap_or(tok_end);
                        TextRange::new(start, end)
                    } else if at_line_start {
                        // Comment starts a line of code: keep the indentation.
                        let end = next_ws
                            .as_ref()
                            .map(|ws| token_range(ws).end as usize)
                            .unwrap_or(tok_end);
                        TextRange::new(tok_start, end)
                    } else {
                        // Trailing or mid-line comment.
                        let start = prev_ws
                            .as_ref()
                            .map(|ws| token_range(ws).start as usize)
                            .unwrap_or(tok_start);
                        TextRange::new(start, tok_end)
                    };
                    edits.push(TextEdit::new(deletion, ""));
                }

                let text = doc.text();
                let new_text = rewrite::apply_text_edits(&text, &edits)?;
                Ok(doc.with_text(&new_text))
            }),
        ));
        Ok(())
    }
}
