//! Fragment parsing: build detached subtrees for rewrites.
//!
//! Rewrites construct replacement nodes by rendering text and parsing it as
//! a single construct of a known sort. Failure is a first-class outcome:
//! speculative transforms probe feasibility by attempting a fragment parse
//! and treating [`FragmentError`] as "not applicable".

use thiserror::Error;

use crate::parser::{parse_fragment, FragmentKind, SyntaxNode};
use crate::ParseError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FragmentError {
    #[error("fragment did not parse: {}", .0.first().map(|e| e.message.as_str()).unwrap_or("unknown error"))]
    Invalid(Vec<ParseError>),
    #[error("fragment has trailing input after the construct")]
    Leftover,
    #[error("fragment is empty")]
    Empty,
}

/// Parse `text` as a single expression.
pub fn parse_expression_fragment(text: &str) -> Result<SyntaxNode, FragmentError> {
    fragment(text, FragmentKind::Expression)
}

/// Parse `text` as a single statement.
pub fn parse_statement_fragment(text: &str) -> Result<SyntaxNode, FragmentError> {
    fragment(text, FragmentKind::Statement)
}

/// Parse `text` as a single type member (field, method, constructor, property).
pub fn parse_member_fragment(text: &str) -> Result<SyntaxNode, FragmentError> {
    fragment(text, FragmentKind::Member)
}

fn fragment(text: &str, kind: FragmentKind) -> Result<SyntaxNode, FragmentError> {
    let (result, leftover) = parse_fragment(text, kind);
    if !result.errors.is_empty() {
        return Err(FragmentError::Invalid(result.errors));
    }
    if leftover {
        return Err(FragmentError::Leftover);
    }
    // The fragment is the single non-trivia child of the wrapper root;
    // leading/trailing trivia of the snippet stay in the wrapper.
    result
        .syntax()
        .children()
        .next()
        .ok_or(FragmentError::Empty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SyntaxKind;

    #[test]
    fn expression_fragment_round_trips() {
        let node = parse_expression_fragment("a + b * 2").unwrap();
        assert_eq!(node.kind(), SyntaxKind::BinaryExpression);
        assert_eq!(node.to_string(), "a + b * 2");
    }

    #[test]
    fn statement_fragment_excludes_exterior_trivia() {
        let node = parse_statement_fragment("  return x;\n").unwrap();
        assert_eq!(node.kind(), SyntaxKind::ReturnStatement);
        assert_eq!(node.to_string(), "return x;");
    }

    #[test]
    fn member_fragment() {
        let node = parse_member_fragment("public int M() { return 1; }").unwrap();
        assert_eq!(node.kind(), SyntaxKind::MethodDeclaration);
    }

    #[test]
    fn leftover_input_is_an_error() {
        assert_eq!(
            parse_expression_fragment("a + b; junk"),
            Err(FragmentError::Leftover)
        );
    }

    #[test]
    fn malformed_input_is_an_error() {
        assert!(matches!(
            parse_expression_fragment("+"),
            Err(FragmentError::Invalid(_))
        ));
    }

    #[test]
    fn empty_input_is_an_error() {
        // An empty snippet produces an error node or nothing at all; either
        // way the caller sees a failure, never a panic.
        assert!(parse_statement_fragment("   ").is_err());
    }
}
