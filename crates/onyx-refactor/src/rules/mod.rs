//! The rule set.
//!
//! Each rule is one file: a stateless unit struct implementing the rule
//! contract, plus unit tests for any helper logic the rule carries. The
//! dispatch tables in [`crate::dispatch`] decide when each rule runs; rules
//! decide whether they apply and what the deferred transform does.

mod add_braces;
mod add_null_check;
mod convert_switch_to_if;
mod expand_expression_body;
mod expand_property;
mod invert_if;
mod negate_operator;
mod parenthesize_expression;
mod remove_all_comments;
mod remove_braces;
mod remove_comment;
mod swap_binary_operands;
mod uncomment;
mod use_expression_body;

pub(crate) use add_braces::AddBraces;
pub(crate) use add_null_check::AddParameterNullCheck;
pub(crate) use convert_switch_to_if::ConvertSwitchToIf;
pub(crate) use expand_expression_body::ExpandExpressionBody;
pub(crate) use expand_property::ExpandProperty;
pub(crate) use invert_if::InvertIf;
pub(crate) use negate_operator::NegateOperator;
pub(crate) use parenthesize_expression::ParenthesizeExpression;
pub(crate) use remove_all_comments::RemoveAllComments;
pub(crate) use remove_braces::RemoveBraces;
pub(crate) use remove_comment::RemoveComment;
pub(crate) use swap_binary_operands::SwapBinaryOperands;
pub(crate) use uncomment::Uncomment;
pub(crate) use use_expression_body::UseExpressionBody;
