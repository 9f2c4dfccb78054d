//! Typed wrappers over the untyped syntax tree.
//!
//! Each wrapper is a zero-cost view: it owns the `SyntaxNode` and exposes
//! structured accessors. Casting is by kind; accessors are position- and
//! kind-based lookups over direct children.

use crate::ast::{support, AstNode};
use crate::parser::{SyntaxNode, SyntaxToken};
use crate::syntax_kind::SyntaxKind;

macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            syntax: SyntaxNode,
        }

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                kind == SyntaxKind::$kind
            }

            fn cast(syntax: SyntaxNode) -> Option<Self> {
                Self::can_cast(syntax.kind()).then_some(Self { syntax })
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.syntax
            }
        }
    };
}

ast_node!(CompilationUnit, CompilationUnit);
ast_node!(UsingDirective, UsingDirective);
ast_node!(NamespaceDeclaration, NamespaceDeclaration);
ast_node!(Name, Name);
ast_node!(Modifiers, Modifiers);

ast_node!(ClassDeclaration, ClassDeclaration);
ast_node!(InterfaceDeclaration, InterfaceDeclaration);
ast_node!(StructDeclaration, StructDeclaration);
ast_node!(EnumDeclaration, EnumDeclaration);
ast_node!(BaseList, BaseList);
ast_node!(EnumMemberDeclaration, EnumMemberDeclaration);

ast_node!(FieldDeclaration, FieldDeclaration);
ast_node!(MethodDeclaration, MethodDeclaration);
ast_node!(ConstructorDeclaration, ConstructorDeclaration);
ast_node!(PropertyDeclaration, PropertyDeclaration);
ast_node!(AccessorList, AccessorList);
ast_node!(AccessorDeclaration, AccessorDeclaration);
ast_node!(ArrowExpressionClause, ArrowExpressionClause);
ast_node!(ParameterList, ParameterList);
ast_node!(Parameter, Parameter);
ast_node!(VariableDeclarator, VariableDeclarator);

ast_node!(PredefinedType, PredefinedType);
ast_node!(NamedType, NamedType);
ast_node!(ArrayType, ArrayType);
ast_node!(NullableType, NullableType);
ast_node!(TypeArgumentList, TypeArgumentList);

ast_node!(Block, Block);
ast_node!(LocalDeclarationStatement, LocalDeclarationStatement);
ast_node!(ExpressionStatement, ExpressionStatement);
ast_node!(IfStatement, IfStatement);
ast_node!(ElseClause, ElseClause);
ast_node!(WhileStatement, WhileStatement);
ast_node!(DoStatement, DoStatement);
ast_node!(ForStatement, ForStatement);
ast_node!(ForEachStatement, ForEachStatement);
ast_node!(SwitchStatement, SwitchStatement);
ast_node!(SwitchSection, SwitchSection);
ast_node!(SwitchLabel, SwitchLabel);
ast_node!(ReturnStatement, ReturnStatement);
ast_node!(ThrowStatement, ThrowStatement);
ast_node!(BreakStatement, BreakStatement);
ast_node!(ContinueStatement, ContinueStatement);
ast_node!(EmptyStatement, EmptyStatement);

ast_node!(ArgumentList, ArgumentList);
ast_node!(Argument, Argument);

ast_node!(LiteralExpression, LiteralExpression);
ast_node!(NameExpression, NameExpression);
ast_node!(ThisExpression, ThisExpression);
ast_node!(BaseExpression, BaseExpression);
ast_node!(ParenthesizedExpression, ParenthesizedExpression);
ast_node!(ObjectCreationExpression, ObjectCreationExpression);
ast_node!(InvocationExpression, InvocationExpression);
ast_node!(MemberAccessExpression, MemberAccessExpression);
ast_node!(ElementAccessExpression, ElementAccessExpression);
ast_node!(PrefixUnaryExpression, PrefixUnaryExpression);
ast_node!(PostfixUnaryExpression, PostfixUnaryExpression);
ast_node!(BinaryExpression, BinaryExpression);
ast_node!(AssignmentExpression, AssignmentExpression);
ast_node!(ConditionalExpression, ConditionalExpression);
ast_node!(LambdaExpression, LambdaExpression);
ast_node!(CastExpression, CastExpression);
ast_node!(IsPatternExpression, IsPatternExpression);

/// Any class-like or enum type declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDeclaration {
    syntax: SyntaxNode,
}

impl AstNode for TypeDeclaration {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind.is_type_declaration()
    }

    fn cast(syntax: SyntaxNode) -> Option<Self> {
        Self::can_cast(syntax.kind()).then_some(Self { syntax })
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.syntax
    }
}

/// Any member of a type body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberDeclaration {
    syntax: SyntaxNode,
}

impl AstNode for MemberDeclaration {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind.is_member_declaration()
    }

    fn cast(syntax: SyntaxNode) -> Option<Self> {
        Self::can_cast(syntax.kind()).then_some(Self { syntax })
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.syntax
    }
}

/// Any type reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Type {
    syntax: SyntaxNode,
}

impl AstNode for Type {
    fn can_cast(kind: SyntaxKind) -> bool {
        matches!(
            kind,
            SyntaxKind::PredefinedType
                | SyntaxKind::NamedType
                | SyntaxKind::ArrayType
                | SyntaxKind::NullableType
        )
    }

    fn cast(syntax: SyntaxNode) -> Option<Self> {
        Self::can_cast(syntax.kind()).then_some(Self { syntax })
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.syntax
    }
}

impl CompilationUnit {
    pub fn usings(&self) -> impl Iterator<Item = UsingDirective> + '_ {
        support::children::<UsingDirective>(&self.syntax)
    }

    pub fn namespace(&self) -> Option<NamespaceDeclaration> {
        support::child::<NamespaceDeclaration>(&self.syntax)
    }

    pub fn type_declarations(&self) -> impl Iterator<Item = TypeDeclaration> + '_ {
        support::children::<TypeDeclaration>(&self.syntax)
    }
}

impl UsingDirective {
    pub fn name(&self) -> Option<Name> {
        support::child::<Name>(&self.syntax)
    }
}

impl NamespaceDeclaration {
    pub fn name(&self) -> Option<Name> {
        support::child::<Name>(&self.syntax)
    }

    pub fn type_declarations(&self) -> impl Iterator<Item = TypeDeclaration> + '_ {
        support::children::<TypeDeclaration>(&self.syntax)
    }
}

impl TypeDeclaration {
    pub fn name_token(&self) -> Option<SyntaxToken> {
        support::ident_token(&self.syntax)
    }

    pub fn members(&self) -> impl Iterator<Item = MemberDeclaration> + '_ {
        support::children::<MemberDeclaration>(&self.syntax)
    }
}

impl ClassDeclaration {
    pub fn name_token(&self) -> Option<SyntaxToken> {
        support::ident_token(&self.syntax)
    }

    pub fn members(&self) -> impl Iterator<Item = MemberDeclaration> + '_ {
        support::children::<MemberDeclaration>(&self.syntax)
    }
}

impl Modifiers {
    pub fn keywords(&self) -> impl Iterator<Item = SyntaxToken> + '_ {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .filter(|t| !t.kind().is_trivia())
    }
}

impl FieldDeclaration {
    pub fn modifiers(&self) -> Option<Modifiers> {
        support::child::<Modifiers>(&self.syntax)
    }

    pub fn field_type(&self) -> Option<Type> {
        support::child::<Type>(&self.syntax)
    }

    pub fn declarators(&self) -> impl Iterator<Item = VariableDeclarator> + '_ {
        support::children::<VariableDeclarator>(&self.syntax)
    }
}

impl MethodDeclaration {
    pub fn modifiers(&self) -> Option<Modifiers> {
        support::child::<Modifiers>(&self.syntax)
    }

    pub fn return_type(&self) -> Option<Type> {
        support::child::<Type>(&self.syntax)
    }

    pub fn name_token(&self) -> Option<SyntaxToken> {
        support::ident_token(&self.syntax)
    }

    pub fn parameter_list(&self) -> Option<ParameterList> {
        support::child::<ParameterList>(&self.syntax)
    }

    pub fn body(&self) -> Option<Block> {
        support::child::<Block>(&self.syntax)
    }

    pub fn arrow_clause(&self) -> Option<ArrowExpressionClause> {
        support::child::<ArrowExpressionClause>(&self.syntax)
    }
}

impl ConstructorDeclaration {
    pub fn name_token(&self) -> Option<SyntaxToken> {
        support::ident_token(&self.syntax)
    }

    pub fn parameter_list(&self) -> Option<ParameterList> {
        support::child::<ParameterList>(&self.syntax)
    }

    pub fn body(&self) -> Option<Block> {
        support::child::<Block>(&self.syntax)
    }
}

impl PropertyDeclaration {
    pub fn modifiers(&self) -> Option<Modifiers> {
        support::child::<Modifiers>(&self.syntax)
    }

    pub fn property_type(&self) -> Option<Type> {
        support::child::<Type>(&self.syntax)
    }

    pub fn name_token(&self) -> Option<SyntaxToken> {
        support::ident_token(&self.syntax)
    }

    pub fn accessor_list(&self) -> Option<AccessorList> {
        support::child::<AccessorList>(&self.syntax)
    }

    pub fn arrow_clause(&self) -> Option<ArrowExpressionClause> {
        support::child::<ArrowExpressionClause>(&self.syntax)
    }
}

impl AccessorList {
    pub fn accessors(&self) -> impl Iterator<Item = AccessorDeclaration> + '_ {
        support::children::<AccessorDeclaration>(&self.syntax)
    }
}

impl AccessorDeclaration {
    pub fn is_get(&self) -> bool {
        support::token(&self.syntax, SyntaxKind::GetKw).is_some()
    }

    pub fn is_set(&self) -> bool {
        support::token(&self.syntax, SyntaxKind::SetKw).is_some()
    }

    pub fn body(&self) -> Option<Block> {
        support::child::<Block>(&self.syntax)
    }

    pub fn arrow_clause(&self) -> Option<ArrowExpressionClause> {
        support::child::<ArrowExpressionClause>(&self.syntax)
    }
}

impl ArrowExpressionClause {
    pub fn expression(&self) -> Option<SyntaxNode> {
        support::expr_child(&self.syntax)
    }

    pub fn arrow_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::Arrow)
    }
}

impl ParameterList {
    pub fn parameters(&self) -> impl Iterator<Item = Parameter> + '_ {
        support::children::<Parameter>(&self.syntax)
    }
}

impl Parameter {
    pub fn param_type(&self) -> Option<Type> {
        support::child::<Type>(&self.syntax)
    }

    pub fn name_token(&self) -> Option<SyntaxToken> {
        support::ident_token(&self.syntax)
    }
}

impl VariableDeclarator {
    pub fn name_token(&self) -> Option<SyntaxToken> {
        support::ident_token(&self.syntax)
    }

    pub fn initializer(&self) -> Option<SyntaxNode> {
        support::expr_child(&self.syntax)
    }
}

impl Name {
    pub fn text(&self) -> String {
        let mut out = String::new();
        for tok in self
            .syntax
            .children_with_tokens()
            .filter_map(|el| el.into_token())
            .filter(|tok| !tok.kind().is_trivia())
        {
            out.push_str(tok.text());
        }
        out
    }
}

impl Block {
    pub fn statements(&self) -> impl Iterator<Item = SyntaxNode> + '_ {
        support::stmt_children(&self.syntax)
    }

    pub fn lbrace_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::LBrace)
    }

    pub fn rbrace_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::RBrace)
    }
}

impl LocalDeclarationStatement {
    pub fn decl_type(&self) -> Option<Type> {
        support::child::<Type>(&self.syntax)
    }

    pub fn declarators(&self) -> impl Iterator<Item = VariableDeclarator> + '_ {
        support::children::<VariableDeclarator>(&self.syntax)
    }
}

impl ExpressionStatement {
    pub fn expression(&self) -> Option<SyntaxNode> {
        support::expr_child(&self.syntax)
    }
}

impl IfStatement {
    pub fn condition(&self) -> Option<SyntaxNode> {
        support::expr_child(&self.syntax)
    }

    pub fn then_branch(&self) -> Option<SyntaxNode> {
        support::stmt_child(&self.syntax)
    }

    pub fn else_clause(&self) -> Option<ElseClause> {
        support::child::<ElseClause>(&self.syntax)
    }
}

impl ElseClause {
    pub fn statement(&self) -> Option<SyntaxNode> {
        support::stmt_child(&self.syntax)
    }
}

impl WhileStatement {
    pub fn condition(&self) -> Option<SyntaxNode> {
        support::expr_child(&self.syntax)
    }

    pub fn body(&self) -> Option<SyntaxNode> {
        support::stmt_child(&self.syntax)
    }
}

impl SwitchStatement {
    pub fn governing_expression(&self) -> Option<SyntaxNode> {
        support::expr_child(&self.syntax)
    }

    pub fn sections(&self) -> impl Iterator<Item = SwitchSection> + '_ {
        support::children::<SwitchSection>(&self.syntax)
    }
}

impl SwitchSection {
    pub fn labels(&self) -> impl Iterator<Item = SwitchLabel> + '_ {
        support::children::<SwitchLabel>(&self.syntax)
    }

    pub fn statements(&self) -> impl Iterator<Item = SyntaxNode> + '_ {
        support::stmt_children(&self.syntax)
    }
}

impl SwitchLabel {
    pub fn is_default(&self) -> bool {
        support::token(&self.syntax, SyntaxKind::DefaultKw).is_some()
    }

    pub fn expression(&self) -> Option<SyntaxNode> {
        support::expr_child(&self.syntax)
    }
}

impl ReturnStatement {
    pub fn expression(&self) -> Option<SyntaxNode> {
        support::expr_child(&self.syntax)
    }
}

impl ThrowStatement {
    pub fn expression(&self) -> Option<SyntaxNode> {
        support::expr_child(&self.syntax)
    }
}

impl ArgumentList {
    pub fn arguments(&self) -> impl Iterator<Item = Argument> + '_ {
        support::children::<Argument>(&self.syntax)
    }
}

impl Argument {
    pub fn expression(&self) -> Option<SyntaxNode> {
        support::expr_child(&self.syntax)
    }
}

impl BinaryExpression {
    pub fn lhs(&self) -> Option<SyntaxNode> {
        support::expr_children(&self.syntax).next()
    }

    pub fn rhs(&self) -> Option<SyntaxNode> {
        support::expr_children(&self.syntax).nth(1)
    }

    pub fn operator_token(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|tok| !tok.kind().is_trivia())
    }
}

impl PrefixUnaryExpression {
    pub fn operator_token(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|tok| !tok.kind().is_trivia())
    }

    pub fn operand(&self) -> Option<SyntaxNode> {
        support::expr_child(&self.syntax)
    }
}

impl ParenthesizedExpression {
    pub fn expression(&self) -> Option<SyntaxNode> {
        support::expr_child(&self.syntax)
    }
}

impl InvocationExpression {
    pub fn callee(&self) -> Option<SyntaxNode> {
        support::expr_child(&self.syntax)
    }

    pub fn argument_list(&self) -> Option<ArgumentList> {
        support::child::<ArgumentList>(&self.syntax)
    }
}

impl MemberAccessExpression {
    pub fn receiver(&self) -> Option<SyntaxNode> {
        support::expr_child(&self.syntax)
    }

    pub fn name_token(&self) -> Option<SyntaxToken> {
        support::ident_tokens(&self.syntax).last()
    }
}

impl LiteralExpression {
    pub fn token(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|tok| !tok.kind().is_trivia())
    }
}

impl NameExpression {
    pub fn token(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|tok| !tok.kind().is_trivia())
    }
}

impl ConditionalExpression {
    pub fn condition(&self) -> Option<SyntaxNode> {
        support::expr_children(&self.syntax).next()
    }

    pub fn when_true(&self) -> Option<SyntaxNode> {
        support::expr_children(&self.syntax).nth(1)
    }

    pub fn when_false(&self) -> Option<SyntaxNode> {
        support::expr_children(&self.syntax).nth(2)
    }
}

impl AssignmentExpression {
    pub fn target(&self) -> Option<SyntaxNode> {
        support::expr_children(&self.syntax).next()
    }

    pub fn value(&self) -> Option<SyntaxNode> {
        support::expr_children(&self.syntax).nth(1)
    }
}

impl CastExpression {
    pub fn cast_type(&self) -> Option<Type> {
        support::child::<Type>(&self.syntax)
    }

    pub fn operand(&self) -> Option<SyntaxNode> {
        support::expr_child(&self.syntax)
    }
}

impl IsPatternExpression {
    pub fn expression(&self) -> Option<SyntaxNode> {
        support::expr_children(&self.syntax).next()
    }

    /// True for the `expr is null` shape.
    pub fn is_null_check(&self) -> bool {
        support::expr_children(&self.syntax)
            .nth(1)
            .and_then(|e| LiteralExpression::cast(e))
            .and_then(|lit| lit.token())
            .is_some_and(|tok| tok.kind() == SyntaxKind::NullKw)
    }
}

impl ObjectCreationExpression {
    pub fn created_type(&self) -> Option<Type> {
        support::child::<Type>(&self.syntax)
    }

    pub fn argument_list(&self) -> Option<ArgumentList> {
        support::child::<ArgumentList>(&self.syntax)
    }
}

impl PredefinedType {
    pub fn keyword(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|tok| tok.kind().is_predefined_type_keyword())
    }
}

impl NamedType {
    pub fn name(&self) -> Option<Name> {
        support::child::<Name>(&self.syntax)
    }
}

impl NullableType {
    pub fn element_type(&self) -> Option<Type> {
        support::child::<Type>(&self.syntax)
    }
}

impl ArrayType {
    pub fn element_type(&self) -> Option<Type> {
        support::child::<Type>(&self.syntax)
    }
}
