//! Uncomment the comment group under the cursor.

use onyx_syntax::{token_range, SyntaxKind, SyntaxToken, TextEdit, TextRange};

use crate::action::{ActionRegistry, RefactoringAction};
use crate::context::RefactoringContext;
use crate::error::{ApplyError, RuleError};
use crate::rewrite::{self, comment_run_bounds, trivia_run};
use crate::rule::TriviaRefactoring;
use crate::settings::RefactoringId;

pub(crate) struct Uncomment;

impl TriviaRefactoring for Uncomment {
    fn id(&self) -> RefactoringId {
        RefactoringId::Uncomment
    }

    fn compute(
        &self,
        trivia: &SyntaxToken,
        _ctx: &RefactoringContext<'_>,
        registry: &mut ActionRegistry,
    ) -> Result<(), RuleError> {
        match trivia.kind() {
            SyntaxKind::LineComment => {
                // Strip the `//` marker from every line comment in the
                // contiguous group; whitespace layout stays untouched.
                let (run, index) = trivia_run(trivia);
                let (lo, hi) = comment_run_bounds(&run, index);
                let markers: Vec<TextRange> = run[lo..=hi]
                    .iter()
                    .filter(|tok| tok.kind() == SyntaxKind::LineComment)
                    .map(|tok| {
                        let range = token_range(tok);
                        TextRange::new(range.start as usize, range.start as usize + 2)
                    })
                    .collect();

                registry.register(RefactoringAction::new(
                    self.id(),
                    "Uncomment",
                    Box::new(move |doc, _ct| {
                        let text = doc.text();
                        let edits: Vec<TextEdit> = markers
                            .iter()
                            .map(|range| {
                                expect_text(&text, *range, "//")?;
                                Ok(TextEdit::new(*range, ""))
                            })
                            .collect::<Result<_, ApplyError>>()?;
                        let new_text = rewrite::apply_text_edits(&text, &edits)?;
                        Ok(doc.with_text(&new_text))
                    }),
                ));
            }
            SyntaxKind::BlockComment => {
                let range = token_range(trivia);
                let (start, end) = (range.start as usize, range.end as usize);
                if end - start < 4 {
                    return Ok(());
                }
                let open = TextRange::new(start, start + 2);
                let close = TextRange::new(end - 2, end);

                registry.register(RefactoringAction::new(
                    self.id(),
                    "Uncomment",
                    Box::new(move |doc, _ct| {
                        let text = doc.text();
                        expect_text(&text, open, "/*")?;
                        expect_text(&text, close, "*/")?;
                        let edits = vec![TextEdit::new(open, ""), TextEdit::new(close, "")];
                        let new_text = rewrite::apply_text_edits(&text, &edits)?;
                        Ok(doc.with_text(&new_text))
                    }),
                ));
            }
            _ => {}
        }
        Ok(())
    }
}

fn expect_text(text: &str, range: TextRange, expected: &str) -> Result<(), ApplyError> {
    let ok = text
        .get(range.start as usize..range.end as usize)
        .is_some_and(|slice| slice == expected);
    if ok {
        Ok(())
    } else {
        Err(ApplyError::Stale)
    }
}
