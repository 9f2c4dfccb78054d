//! Unwrap a single-statement block in embedded position.

use onyx_syntax::ast::{self, AstNode};
use onyx_syntax::{syntax_range, SyntaxKind, SyntaxNode, TextRange};

use crate::action::{ActionRegistry, RefactoringAction};
use crate::context::RefactoringContext;
use crate::error::{ApplyError, RuleError};
use crate::rewrite;
use crate::rule::Refactoring;
use crate::rules::add_braces::is_embedded_position;
use crate::settings::RefactoringId;

pub(crate) struct RemoveBraces;

impl Refactoring for RemoveBraces {
    fn id(&self) -> RefactoringId {
        RefactoringId::RemoveBraces
    }

    fn can_apply(&self, node: &SyntaxNode, _ctx: &RefactoringContext<'_>) -> bool {
        let Some(block) = ast::Block::cast(node.clone()) else {
            return false;
        };
        if !node
            .parent()
            .is_some_and(|parent| is_embedded_position(parent.kind()))
        {
            return false;
        }
        let mut statements = block.statements();
        let Some(single) = statements.next() else {
            return false;
        };
        if statements.next().is_some() {
            return false;
        }
        // A declaration cannot stand as an embedded statement, and removing
        // the braces strips only whitespace/line-break trivia by kind, so a
        // block carrying comments is refused rather than losing them.
        single.kind() != SyntaxKind::LocalDeclarationStatement
            && !rewrite::contains_comment(node)
    }

    fn compute(
        &self,
        node: &SyntaxNode,
        ctx: &RefactoringContext<'_>,
        registry: &mut ActionRegistry,
    ) -> Result<(), RuleError> {
        if !self.can_apply(node, ctx) {
            return Ok(());
        }
        let range = syntax_range(node);

        registry.register(RefactoringAction::new(
            self.id(),
            "Remove braces",
            Box::new(move |doc, _ct| {
                let block_node = rewrite::node_at_exact(doc, range, SyntaxKind::Block)?;
                let block = ast::Block::cast(block_node.clone()).ok_or(ApplyError::Stale)?;
                let single = block.statements().next().ok_or(ApplyError::Stale)?;

                let new_doc = rewrite::replace_node(doc, &block_node, &single);
                let start = range.start as usize;
                let len = single.to_string().len();
                Ok(new_doc.with_reformat(TextRange::new(start, start + len)))
            }),
        ));
        Ok(())
    }
}
