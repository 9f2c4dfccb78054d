//! LSP bridging: registered actions → `lsp_types` code actions.
//!
//! A thin conversion layer; hosts that do not speak LSP can consume
//! [`RefactoringAction`] directly.

use std::collections::HashMap;
use std::str::FromStr;

use lsp_types::{CodeAction, CodeActionKind, Position, Range, Uri, WorkspaceEdit};
use onyx_core::{CancellationToken, LineIndex};
use onyx_syntax::TextRange;
use serde::{Deserialize, Serialize};

use crate::action::RefactoringAction;
use crate::dispatch::compute_refactorings;
use crate::document::Document;
use crate::error::ApplyError;
use crate::rewrite;
use crate::settings::{RefactoringId, RefactoringSettings};

/// Payload stored in an unresolved code action's `data` field.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CodeActionData {
    id: RefactoringId,
    title: String,
    start: usize,
    end: usize,
}

/// Resolve registered actions into LSP code actions with computed edits.
///
/// Each edit replaces the full document text; minimal-diff edits are a host
/// concern. Actions whose transform fails are skipped; a failure to offer
/// one action never suppresses the others.
pub fn actions_to_lsp(
    document: &Document,
    actions: &[RefactoringAction],
    cancellation: &CancellationToken,
) -> Vec<CodeAction> {
    actions
        .iter()
        .filter_map(|action| match action_to_lsp(document, action, cancellation) {
            Ok(code_action) => Some(code_action),
            Err(err) => {
                tracing::warn!(title = action.title(), error = %err, "skipping unresolvable action");
                None
            }
        })
        .collect()
}

fn action_to_lsp(
    document: &Document,
    action: &RefactoringAction,
    cancellation: &CancellationToken,
) -> Result<CodeAction, ApplyError> {
    let after = rewrite::execute(action, document, cancellation)?;
    let edit = full_document_edit(document, &after.text())?;

    Ok(CodeAction {
        title: action.title().to_string(),
        kind: Some(code_action_kind(action.id())),
        edit: Some(edit),
        ..CodeAction::default()
    })
}

fn full_document_edit(document: &Document, new_text: &str) -> Result<WorkspaceEdit, ApplyError> {
    let uri = Uri::from_str(document.file().as_str()).map_err(|_| ApplyError::Stale)?;

    let text = document.text();
    let index = LineIndex::new(&text);
    let end = index.position(&text, text.len());
    let range = Range {
        start: Position::new(0, 0),
        end: Position::new(end.line, end.character),
    };

    let mut changes = HashMap::new();
    changes.insert(
        uri,
        vec![lsp_types::TextEdit {
            range,
            new_text: new_text.to_string(),
        }],
    );
    Ok(WorkspaceEdit {
        changes: Some(changes),
        ..WorkspaceEdit::default()
    })
}

/// Convert registered actions into *unresolved* LSP code actions.
///
/// No transform runs here: each action only carries `data` identifying it.
/// Clients resolve a chosen action through [`resolve_code_action`], which is
/// when the deferred transform actually executes. This is the lazy path for hosts
/// that support `codeAction/resolve`.
pub fn unresolved_actions_to_lsp(
    span: TextRange,
    actions: &[RefactoringAction],
) -> Vec<CodeAction> {
    actions
        .iter()
        .map(|action| {
            let data = CodeActionData {
                id: action.id(),
                title: action.title().to_string(),
                start: span.start as usize,
                end: span.end as usize,
            };
            CodeAction {
                title: action.title().to_string(),
                kind: Some(code_action_kind(action.id())),
                data: serde_json::to_value(data).ok(),
                ..CodeAction::default()
            }
        })
        .collect()
}

/// Resolve a code action produced by [`unresolved_actions_to_lsp`].
///
/// Re-dispatches at the recorded span, re-finds the action by identity, runs
/// its transform, and attaches the resulting edit.
pub fn resolve_code_action(
    document: &Document,
    settings: &RefactoringSettings,
    action: &mut CodeAction,
    cancellation: &CancellationToken,
) -> Result<(), ApplyError> {
    let Some(data) = action.data.take() else {
        return Ok(());
    };
    let data: CodeActionData = serde_json::from_value(data).map_err(|_| ApplyError::Stale)?;

    let span = TextRange::new(data.start, data.end);
    let actions = compute_refactorings(document, span, settings, cancellation)
        .map_err(|_| ApplyError::Cancelled(onyx_core::Cancelled))?;
    let registered = actions
        .iter()
        .find(|a| a.id() == data.id && a.title() == data.title)
        .ok_or(ApplyError::Stale)?;

    let after = rewrite::execute(registered, document, cancellation)?;
    action.edit = Some(full_document_edit(document, &after.text())?);
    Ok(())
}

fn code_action_kind(id: RefactoringId) -> CodeActionKind {
    match id {
        RefactoringId::ExpandExpressionBody
        | RefactoringId::UseExpressionBody
        | RefactoringId::ExpandProperty
        | RefactoringId::ConvertSwitchToIf
        | RefactoringId::InvertIf
        | RefactoringId::AddBraces
        | RefactoringId::RemoveBraces
        | RefactoringId::NegateOperator
        | RefactoringId::SwapBinaryOperands
        | RefactoringId::ParenthesizeExpression => CodeActionKind::REFACTOR_REWRITE,
        RefactoringId::AddParameterNullCheck => CodeActionKind::REFACTOR,
        RefactoringId::Uncomment
        | RefactoringId::RemoveComment
        | RefactoringId::RemoveAllComments => CodeActionKind::REFACTOR,
    }
}
