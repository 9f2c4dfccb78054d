use std::collections::VecDeque;

use rowan::{GreenNode, GreenNodeBuilder};
use text_size::TextSize;

use crate::lexer::{lex, Token};
use crate::syntax_kind::{CSharpLanguage, SyntaxKind};
use crate::{ParseError, TextRange};

pub type SyntaxNode = rowan::SyntaxNode<CSharpLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<CSharpLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<CSharpLanguage>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseResult {
    pub green: GreenNode,
    pub errors: Vec<ParseError>,
}

impl ParseResult {
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    pub fn token_at_offset(&self, offset: u32) -> rowan::TokenAtOffset<SyntaxToken> {
        self.syntax().token_at_offset(TextSize::from(offset))
    }

    pub fn covering_element(&self, range: TextRange) -> SyntaxElement {
        self.syntax().covering_element(range.into())
    }
}

/// Parse a full compilation unit.
pub fn parse(input: &str) -> ParseResult {
    let result = Parser::new(input).parse();
    tracing::trace!(
        len = input.len(),
        errors = result.errors.len(),
        "parsed compilation unit"
    );
    result
}

/// What a fragment parse is expected to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FragmentKind {
    Expression,
    Statement,
    Member,
}

/// Parse a snippet as a single construct of the given sort.
///
/// The returned tree is rooted at a `CompilationUnit` wrapper; leading and
/// trailing trivia of the snippet belong to the wrapper, not the construct.
/// `leftover` is true when non-trivia input remains after the construct.
pub(crate) fn parse_fragment(input: &str, kind: FragmentKind) -> (ParseResult, bool) {
    let mut parser = Parser::new(input);
    parser.builder.start_node(SyntaxKind::CompilationUnit.into());
    match kind {
        FragmentKind::Expression => parser.parse_expression(),
        FragmentKind::Statement => parser.parse_statement(),
        FragmentKind::Member => parser.parse_member(),
    }
    let leftover = !parser.at(SyntaxKind::Eof);
    parser.eat_trivia();
    parser.builder.finish_node();
    (
        ParseResult {
            green: parser.builder.finish(),
            errors: parser.errors,
        },
        leftover,
    )
}

struct Parser<'a> {
    input: &'a str,
    tokens: VecDeque<Token>,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            tokens: VecDeque::from(lex(input)),
            builder: GreenNodeBuilder::new(),
            errors: Vec::new(),
        }
    }

    fn parse(mut self) -> ParseResult {
        self.builder.start_node(SyntaxKind::CompilationUnit.into());

        while self.at(SyntaxKind::UsingKw) {
            self.parse_using_directive();
        }

        while !self.at(SyntaxKind::Eof) {
            if self.at(SyntaxKind::NamespaceKw) {
                self.parse_namespace_decl();
            } else if self.at_type_decl_start() {
                self.parse_type_declaration();
            } else {
                self.recover_top_level();
            }
        }

        self.eat_trivia();
        self.builder.finish_node();

        ParseResult {
            green: self.builder.finish(),
            errors: self.errors,
        }
    }

    fn parse_using_directive(&mut self) {
        self.builder.start_node(SyntaxKind::UsingDirective.into());
        self.expect(SyntaxKind::UsingKw, "expected `using`");
        if self.at(SyntaxKind::StaticKw) {
            self.bump();
        }
        self.parse_name();
        self.expect(SyntaxKind::Semicolon, "expected `;` after using directive");
        self.builder.finish_node();
    }

    fn parse_namespace_decl(&mut self) {
        self.builder
            .start_node(SyntaxKind::NamespaceDeclaration.into());
        self.expect(SyntaxKind::NamespaceKw, "expected `namespace`");
        self.parse_name();

        if self.at(SyntaxKind::Semicolon) {
            // File-scoped namespace: the rest of the file belongs to it.
            self.bump();
            while self.at(SyntaxKind::UsingKw) {
                self.parse_using_directive();
            }
            while !self.at(SyntaxKind::Eof) {
                if self.at_type_decl_start() {
                    self.parse_type_declaration();
                } else {
                    self.recover_top_level();
                }
            }
        } else {
            self.expect(SyntaxKind::LBrace, "expected `{` or `;` after namespace name");
            while !self.at(SyntaxKind::RBrace) && !self.at(SyntaxKind::Eof) {
                if self.at(SyntaxKind::UsingKw) {
                    self.parse_using_directive();
                } else if self.at_type_decl_start() {
                    self.parse_type_declaration();
                } else {
                    self.recover_top_level();
                }
            }
            self.expect(SyntaxKind::RBrace, "expected `}` to close namespace");
        }
        self.builder.finish_node();
    }

    fn at_type_decl_start(&mut self) -> bool {
        self.at_modifier()
            || matches!(
                self.current(),
                SyntaxKind::ClassKw
                    | SyntaxKind::InterfaceKw
                    | SyntaxKind::StructKw
                    | SyntaxKind::EnumKw
            )
    }

    fn parse_type_declaration(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_modifiers();
        match self.current() {
            SyntaxKind::ClassKw => self.parse_class_like(checkpoint, SyntaxKind::ClassDeclaration),
            SyntaxKind::InterfaceKw => {
                self.parse_class_like(checkpoint, SyntaxKind::InterfaceDeclaration)
            }
            SyntaxKind::StructKw => {
                self.parse_class_like(checkpoint, SyntaxKind::StructDeclaration)
            }
            SyntaxKind::EnumKw => self.parse_enum_decl(checkpoint),
            _ => {
                self.builder
                    .start_node_at(checkpoint, SyntaxKind::Error.into());
                self.error_here("expected type declaration");
                self.recover_to(&[
                    SyntaxKind::ClassKw,
                    SyntaxKind::InterfaceKw,
                    SyntaxKind::StructKw,
                    SyntaxKind::EnumKw,
                    SyntaxKind::RBrace,
                    SyntaxKind::Eof,
                ]);
                self.builder.finish_node();
            }
        }
    }

    fn parse_class_like(&mut self, checkpoint: rowan::Checkpoint, kind: SyntaxKind) {
        self.builder.start_node_at(checkpoint, kind.into());
        self.bump(); // class / interface / struct
        self.expect_ident_like("expected type name");
        if self.at(SyntaxKind::Less) {
            self.parse_type_argument_list();
        }
        if self.at(SyntaxKind::Colon) {
            self.parse_base_list();
        }
        self.expect(SyntaxKind::LBrace, "expected `{` for type body");
        while !self.at(SyntaxKind::RBrace) && !self.at(SyntaxKind::Eof) {
            self.parse_member();
        }
        self.expect(SyntaxKind::RBrace, "expected `}` to close type body");
        self.builder.finish_node();
    }

    fn parse_enum_decl(&mut self, checkpoint: rowan::Checkpoint) {
        self.builder
            .start_node_at(checkpoint, SyntaxKind::EnumDeclaration.into());
        self.expect(SyntaxKind::EnumKw, "expected `enum`");
        self.expect_ident_like("expected enum name");
        if self.at(SyntaxKind::Colon) {
            self.parse_base_list();
        }
        self.expect(SyntaxKind::LBrace, "expected `{` for enum body");
        while !self.at(SyntaxKind::RBrace) && !self.at(SyntaxKind::Eof) {
            if self.at_ident_like() {
                self.builder
                    .start_node(SyntaxKind::EnumMemberDeclaration.into());
                self.bump();
                if self.at(SyntaxKind::Eq) {
                    self.bump();
                    self.parse_expression();
                }
                self.builder.finish_node();
                if self.at(SyntaxKind::Comma) {
                    self.bump();
                }
            } else {
                self.error_here("expected enum member");
                self.bump_any_non_trivia();
            }
        }
        self.expect(SyntaxKind::RBrace, "expected `}` to close enum body");
        self.builder.finish_node();
    }

    fn parse_base_list(&mut self) {
        self.builder.start_node(SyntaxKind::BaseList.into());
        self.expect(SyntaxKind::Colon, "expected `:`");
        self.parse_type();
        while self.at(SyntaxKind::Comma) {
            self.bump();
            self.parse_type();
        }
        self.builder.finish_node();
    }

    // --- Members ---

    fn parse_member(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_modifiers();

        // A nested type declaration.
        if matches!(
            self.current(),
            SyntaxKind::ClassKw | SyntaxKind::InterfaceKw | SyntaxKind::StructKw
        ) {
            let kind = match self.current() {
                SyntaxKind::ClassKw => SyntaxKind::ClassDeclaration,
                SyntaxKind::InterfaceKw => SyntaxKind::InterfaceDeclaration,
                _ => SyntaxKind::StructDeclaration,
            };
            self.parse_class_like(checkpoint, kind);
            return;
        }
        if self.at(SyntaxKind::EnumKw) {
            self.parse_enum_decl(checkpoint);
            return;
        }

        // A constructor has no return type: `Name(...) { ... }`.
        if self.at_ident_like() && self.nth(1) == Some(SyntaxKind::LParen) {
            self.builder
                .start_node_at(checkpoint, SyntaxKind::ConstructorDeclaration.into());
            self.bump(); // name
            self.parse_parameter_list();
            if self.at(SyntaxKind::LBrace) {
                self.parse_block();
            } else {
                self.expect(SyntaxKind::Semicolon, "expected constructor body");
            }
            self.builder.finish_node();
            return;
        }

        if !self.at_type_start() {
            self.builder
                .start_node_at(checkpoint, SyntaxKind::Error.into());
            self.error_here("expected member declaration");
            self.recover_to(&[SyntaxKind::RBrace, SyntaxKind::Semicolon, SyntaxKind::Eof]);
            if self.at(SyntaxKind::Semicolon) {
                self.bump();
            }
            self.builder.finish_node();
            return;
        }

        self.parse_type();

        match (self.current(), self.nth(1)) {
            (k, Some(SyntaxKind::LParen)) if k.is_identifier_like() => {
                self.builder
                    .start_node_at(checkpoint, SyntaxKind::MethodDeclaration.into());
                self.bump(); // name
                self.parse_parameter_list();
                if self.at(SyntaxKind::LBrace) {
                    self.parse_block();
                } else if self.at(SyntaxKind::Arrow) {
                    self.parse_arrow_clause();
                    self.expect(SyntaxKind::Semicolon, "expected `;` after expression body");
                } else {
                    self.expect(SyntaxKind::Semicolon, "expected method body");
                }
                self.builder.finish_node();
            }
            (k, Some(SyntaxKind::LBrace | SyntaxKind::Arrow)) if k.is_identifier_like() => {
                self.builder
                    .start_node_at(checkpoint, SyntaxKind::PropertyDeclaration.into());
                self.bump(); // name
                if self.at(SyntaxKind::LBrace) {
                    self.parse_accessor_list();
                } else {
                    self.parse_arrow_clause();
                    self.expect(SyntaxKind::Semicolon, "expected `;` after expression body");
                }
                self.builder.finish_node();
            }
            _ => {
                self.builder
                    .start_node_at(checkpoint, SyntaxKind::FieldDeclaration.into());
                self.parse_variable_declarator();
                while self.at(SyntaxKind::Comma) {
                    self.bump();
                    self.parse_variable_declarator();
                }
                self.expect(SyntaxKind::Semicolon, "expected `;` after field declaration");
                self.builder.finish_node();
            }
        }
    }

    fn parse_variable_declarator(&mut self) {
        self.builder.start_node(SyntaxKind::VariableDeclarator.into());
        self.expect_ident_like("expected variable name");
        if self.at(SyntaxKind::Eq) {
            self.bump();
            self.parse_expression();
        }
        self.builder.finish_node();
    }

    fn parse_accessor_list(&mut self) {
        self.builder.start_node(SyntaxKind::AccessorList.into());
        self.expect(SyntaxKind::LBrace, "expected `{`");
        while !self.at(SyntaxKind::RBrace) && !self.at(SyntaxKind::Eof) {
            self.parse_accessor();
        }
        self.expect(SyntaxKind::RBrace, "expected `}` to close accessor list");
        self.builder.finish_node();
    }

    fn parse_accessor(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_modifiers();
        self.builder
            .start_node_at(checkpoint, SyntaxKind::AccessorDeclaration.into());
        if matches!(self.current(), SyntaxKind::GetKw | SyntaxKind::SetKw) {
            self.bump();
        } else {
            self.error_here("expected `get` or `set`");
            self.bump_any_non_trivia();
        }
        if self.at(SyntaxKind::LBrace) {
            self.parse_block();
        } else if self.at(SyntaxKind::Arrow) {
            self.parse_arrow_clause();
            self.expect(SyntaxKind::Semicolon, "expected `;` after expression body");
        } else {
            self.expect(SyntaxKind::Semicolon, "expected `;` after accessor");
        }
        self.builder.finish_node();
    }

    fn parse_arrow_clause(&mut self) {
        self.builder
            .start_node(SyntaxKind::ArrowExpressionClause.into());
        self.expect(SyntaxKind::Arrow, "expected `=>`");
        self.parse_expression();
        self.builder.finish_node();
    }

    fn parse_parameter_list(&mut self) {
        self.builder.start_node(SyntaxKind::ParameterList.into());
        self.expect(SyntaxKind::LParen, "expected `(`");
        if !self.at(SyntaxKind::RParen) && !self.at(SyntaxKind::Eof) {
            self.parse_parameter();
            while self.at(SyntaxKind::Comma) {
                self.bump();
                self.parse_parameter();
            }
        }
        self.expect(SyntaxKind::RParen, "expected `)` to close parameter list");
        self.builder.finish_node();
    }

    fn parse_parameter(&mut self) {
        self.builder.start_node(SyntaxKind::Parameter.into());
        while matches!(
            self.current(),
            SyntaxKind::RefKw | SyntaxKind::OutKw | SyntaxKind::InKw | SyntaxKind::ParamsKw
        ) {
            self.bump();
        }
        // Lambda parameters may omit the type.
        if self.at_ident_like()
            && matches!(self.nth(1), Some(SyntaxKind::Comma | SyntaxKind::RParen))
        {
            self.bump();
        } else {
            self.parse_type();
            self.expect_ident_like("expected parameter name");
            if self.at(SyntaxKind::Eq) {
                self.bump();
                self.parse_expression();
            }
        }
        self.builder.finish_node();
    }

    fn at_modifier(&mut self) -> bool {
        match self.current() {
            SyntaxKind::PublicKw
            | SyntaxKind::PrivateKw
            | SyntaxKind::ProtectedKw
            | SyntaxKind::InternalKw
            | SyntaxKind::StaticKw
            | SyntaxKind::AbstractKw
            | SyntaxKind::SealedKw
            | SyntaxKind::VirtualKw
            | SyntaxKind::OverrideKw
            | SyntaxKind::ReadonlyKw
            | SyntaxKind::ConstKw => true,
            // `partial` is contextual: only a modifier right before a type keyword.
            SyntaxKind::PartialKw => matches!(
                self.nth(1),
                Some(SyntaxKind::ClassKw | SyntaxKind::InterfaceKw | SyntaxKind::StructKw)
            ),
            _ => false,
        }
    }

    fn parse_modifiers(&mut self) {
        if !self.at_modifier() {
            return;
        }
        self.builder.start_node(SyntaxKind::Modifiers.into());
        while self.at_modifier() {
            self.bump();
        }
        self.builder.finish_node();
    }

    // --- Types ---

    fn at_type_start(&mut self) -> bool {
        self.current().is_predefined_type_keyword() || self.at_ident_like()
    }

    fn parse_type(&mut self) {
        let checkpoint = self.checkpoint();
        if self.current().is_predefined_type_keyword() {
            self.builder.start_node(SyntaxKind::PredefinedType.into());
            self.bump();
            self.builder.finish_node();
        } else if self.at_ident_like() {
            self.builder.start_node(SyntaxKind::NamedType.into());
            self.parse_name();
            if self.at(SyntaxKind::Less) {
                self.parse_type_argument_list();
            }
            self.builder.finish_node();
        } else {
            self.error_here("expected type");
            return;
        }

        loop {
            if self.at(SyntaxKind::Question) {
                self.builder
                    .start_node_at(checkpoint, SyntaxKind::NullableType.into());
                self.bump();
                self.builder.finish_node();
            } else if self.at(SyntaxKind::LBracket)
                && self.nth(1) == Some(SyntaxKind::RBracket)
            {
                self.builder
                    .start_node_at(checkpoint, SyntaxKind::ArrayType.into());
                self.bump();
                self.bump();
                self.builder.finish_node();
            } else {
                break;
            }
        }
    }

    fn parse_type_argument_list(&mut self) {
        self.builder.start_node(SyntaxKind::TypeArgumentList.into());
        self.expect(SyntaxKind::Less, "expected `<`");
        self.parse_type();
        while self.at(SyntaxKind::Comma) {
            self.bump();
            self.parse_type();
        }
        self.expect(SyntaxKind::Greater, "expected `>` to close type arguments");
        self.builder.finish_node();
    }

    fn parse_name(&mut self) {
        self.builder.start_node(SyntaxKind::Name.into());
        self.expect_ident_like("expected name");
        while self.at(SyntaxKind::Dot) && self.nth(1).is_some_and(|k| k.is_identifier_like()) {
            self.bump();
            self.bump();
        }
        self.builder.finish_node();
    }

    // --- Statements ---

    fn parse_block(&mut self) {
        self.builder.start_node(SyntaxKind::Block.into());
        self.expect(SyntaxKind::LBrace, "expected `{`");
        while !self.at(SyntaxKind::RBrace) && !self.at(SyntaxKind::Eof) {
            self.parse_statement();
        }
        self.expect(SyntaxKind::RBrace, "expected `}` to close block");
        self.builder.finish_node();
    }

    pub(crate) fn parse_statement(&mut self) {
        match self.current() {
            SyntaxKind::LBrace => self.parse_block(),
            SyntaxKind::IfKw => self.parse_if_statement(),
            SyntaxKind::WhileKw => self.parse_while_statement(),
            SyntaxKind::DoKw => self.parse_do_statement(),
            SyntaxKind::ForKw => self.parse_for_statement(),
            SyntaxKind::ForeachKw => self.parse_foreach_statement(),
            SyntaxKind::SwitchKw => self.parse_switch_statement(),
            SyntaxKind::ReturnKw => self.parse_return_statement(),
            SyntaxKind::ThrowKw => self.parse_throw_statement(),
            SyntaxKind::BreakKw => {
                self.builder.start_node(SyntaxKind::BreakStatement.into());
                self.bump();
                self.expect(SyntaxKind::Semicolon, "expected `;` after `break`");
                self.builder.finish_node();
            }
            SyntaxKind::ContinueKw => {
                self.builder
                    .start_node(SyntaxKind::ContinueStatement.into());
                self.bump();
                self.expect(SyntaxKind::Semicolon, "expected `;` after `continue`");
                self.builder.finish_node();
            }
            SyntaxKind::Semicolon => {
                self.builder.start_node(SyntaxKind::EmptyStatement.into());
                self.bump();
                self.builder.finish_node();
            }
            _ => {
                if self.at_local_declaration() {
                    self.parse_local_declaration();
                } else {
                    self.parse_expression_statement();
                }
            }
        }
    }

    fn parse_if_statement(&mut self) {
        self.builder.start_node(SyntaxKind::IfStatement.into());
        self.expect(SyntaxKind::IfKw, "expected `if`");
        self.expect(SyntaxKind::LParen, "expected `(` after `if`");
        self.parse_expression();
        self.expect(SyntaxKind::RParen, "expected `)` after condition");
        self.parse_statement();
        if self.at(SyntaxKind::ElseKw) {
            self.builder.start_node(SyntaxKind::ElseClause.into());
            self.bump();
            self.parse_statement();
            self.builder.finish_node();
        }
        self.builder.finish_node();
    }

    fn parse_while_statement(&mut self) {
        self.builder.start_node(SyntaxKind::WhileStatement.into());
        self.expect(SyntaxKind::WhileKw, "expected `while`");
        self.expect(SyntaxKind::LParen, "expected `(` after `while`");
        self.parse_expression();
        self.expect(SyntaxKind::RParen, "expected `)` after condition");
        self.parse_statement();
        self.builder.finish_node();
    }

    fn parse_do_statement(&mut self) {
        self.builder.start_node(SyntaxKind::DoStatement.into());
        self.expect(SyntaxKind::DoKw, "expected `do`");
        self.parse_statement();
        self.expect(SyntaxKind::WhileKw, "expected `while` after `do` body");
        self.expect(SyntaxKind::LParen, "expected `(`");
        self.parse_expression();
        self.expect(SyntaxKind::RParen, "expected `)`");
        self.expect(SyntaxKind::Semicolon, "expected `;`");
        self.builder.finish_node();
    }

    fn parse_for_statement(&mut self) {
        self.builder.start_node(SyntaxKind::ForStatement.into());
        self.expect(SyntaxKind::ForKw, "expected `for`");
        self.expect(SyntaxKind::LParen, "expected `(` after `for`");
        if self.at(SyntaxKind::Semicolon) {
            self.bump();
        } else if self.at_local_declaration() {
            self.parse_local_declaration();
        } else {
            self.parse_expression();
            self.expect(SyntaxKind::Semicolon, "expected `;` after for initializer");
        }
        if !self.at(SyntaxKind::Semicolon) {
            self.parse_expression();
        }
        self.expect(SyntaxKind::Semicolon, "expected `;` after for condition");
        if !self.at(SyntaxKind::RParen) {
            self.parse_expression();
            while self.at(SyntaxKind::Comma) {
                self.bump();
                self.parse_expression();
            }
        }
        self.expect(SyntaxKind::RParen, "expected `)`");
        self.parse_statement();
        self.builder.finish_node();
    }

    fn parse_foreach_statement(&mut self) {
        self.builder.start_node(SyntaxKind::ForEachStatement.into());
        self.expect(SyntaxKind::ForeachKw, "expected `foreach`");
        self.expect(SyntaxKind::LParen, "expected `(` after `foreach`");
        self.parse_type();
        self.expect_ident_like("expected iteration variable name");
        self.expect(SyntaxKind::InKw, "expected `in`");
        self.parse_expression();
        self.expect(SyntaxKind::RParen, "expected `)`");
        self.parse_statement();
        self.builder.finish_node();
    }

    fn parse_switch_statement(&mut self) {
        self.builder.start_node(SyntaxKind::SwitchStatement.into());
        self.expect(SyntaxKind::SwitchKw, "expected `switch`");
        self.expect(SyntaxKind::LParen, "expected `(` after `switch`");
        self.parse_expression();
        self.expect(SyntaxKind::RParen, "expected `)`");
        self.expect(SyntaxKind::LBrace, "expected `{` for switch body");
        while matches!(self.current(), SyntaxKind::CaseKw | SyntaxKind::DefaultKw) {
            self.parse_switch_section();
        }
        self.expect(SyntaxKind::RBrace, "expected `}` to close switch");
        self.builder.finish_node();
    }

    fn parse_switch_section(&mut self) {
        self.builder.start_node(SyntaxKind::SwitchSection.into());
        while matches!(self.current(), SyntaxKind::CaseKw | SyntaxKind::DefaultKw) {
            self.builder.start_node(SyntaxKind::SwitchLabel.into());
            if self.at(SyntaxKind::CaseKw) {
                self.bump();
                self.parse_expression();
            } else {
                self.bump();
            }
            self.expect(SyntaxKind::Colon, "expected `:` after switch label");
            self.builder.finish_node();
        }
        while !matches!(
            self.current(),
            SyntaxKind::CaseKw | SyntaxKind::DefaultKw | SyntaxKind::RBrace | SyntaxKind::Eof
        ) {
            self.parse_statement();
        }
        self.builder.finish_node();
    }

    fn parse_return_statement(&mut self) {
        self.builder.start_node(SyntaxKind::ReturnStatement.into());
        self.expect(SyntaxKind::ReturnKw, "expected `return`");
        if !self.at(SyntaxKind::Semicolon) {
            self.parse_expression();
        }
        self.expect(SyntaxKind::Semicolon, "expected `;` after return");
        self.builder.finish_node();
    }

    fn parse_throw_statement(&mut self) {
        self.builder.start_node(SyntaxKind::ThrowStatement.into());
        self.expect(SyntaxKind::ThrowKw, "expected `throw`");
        if !self.at(SyntaxKind::Semicolon) {
            self.parse_expression();
        }
        self.expect(SyntaxKind::Semicolon, "expected `;` after throw");
        self.builder.finish_node();
    }

    fn parse_local_declaration(&mut self) {
        self.builder
            .start_node(SyntaxKind::LocalDeclarationStatement.into());
        self.parse_type();
        self.parse_variable_declarator();
        while self.at(SyntaxKind::Comma) {
            self.bump();
            self.parse_variable_declarator();
        }
        self.expect(SyntaxKind::Semicolon, "expected `;` after declaration");
        self.builder.finish_node();
    }

    fn parse_expression_statement(&mut self) {
        self.builder
            .start_node(SyntaxKind::ExpressionStatement.into());
        self.parse_expression();
        self.expect(SyntaxKind::Semicolon, "expected `;` after expression");
        self.builder.finish_node();
    }

    /// Statement-start disambiguation between a local declaration and an
    /// expression statement, by bounded lookahead over the raw token stream.
    fn at_local_declaration(&mut self) -> bool {
        self.eat_trivia();
        let first = skip_trivia(&self.tokens, 0);
        let Some(tok) = self.tokens.get(first) else {
            return false;
        };

        // `var x ...`
        if tok.kind == SyntaxKind::VarKw {
            let next = skip_trivia(&self.tokens, first + 1);
            return self
                .tokens
                .get(next)
                .is_some_and(|t| t.kind.is_identifier_like());
        }

        // `int x ...` but not `int.Parse(...)`.
        if tok.kind.is_predefined_type_keyword() {
            let next = skip_trivia(&self.tokens, first + 1);
            return !self
                .tokens
                .get(next)
                .is_some_and(|t| t.kind == SyntaxKind::Dot);
        }

        if !tok.kind.is_identifier_like() {
            return false;
        }

        let Some(after_type) = scan_type(&self.tokens, first) else {
            return false;
        };
        let name = skip_trivia(&self.tokens, after_type);
        if !self
            .tokens
            .get(name)
            .is_some_and(|t| t.kind.is_identifier_like())
        {
            return false;
        }
        let after_name = skip_trivia(&self.tokens, name + 1);
        matches!(
            self.tokens.get(after_name).map(|t| t.kind),
            Some(SyntaxKind::Eq | SyntaxKind::Semicolon | SyntaxKind::Comma)
        )
    }

    // --- Expressions ---

    pub(crate) fn parse_expression(&mut self) {
        self.parse_assignment();
    }

    fn parse_assignment(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_conditional();
        if matches!(
            self.current(),
            SyntaxKind::Eq
                | SyntaxKind::PlusEq
                | SyntaxKind::MinusEq
                | SyntaxKind::StarEq
                | SyntaxKind::SlashEq
                | SyntaxKind::PercentEq
                | SyntaxKind::AmpEq
                | SyntaxKind::PipeEq
                | SyntaxKind::CaretEq
                | SyntaxKind::LeftShiftEq
        ) {
            self.builder
                .start_node_at(checkpoint, SyntaxKind::AssignmentExpression.into());
            self.bump();
            self.parse_assignment();
            self.builder.finish_node();
        }
    }

    fn parse_conditional(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_coalesce();
        if self.at(SyntaxKind::Question) {
            self.builder
                .start_node_at(checkpoint, SyntaxKind::ConditionalExpression.into());
            self.bump();
            self.parse_expression();
            self.expect(SyntaxKind::Colon, "expected `:` in conditional expression");
            self.parse_conditional();
            self.builder.finish_node();
        }
    }

    fn parse_coalesce(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_logical_or();
        if self.at(SyntaxKind::QuestionQuestion) {
            self.builder
                .start_node_at(checkpoint, SyntaxKind::BinaryExpression.into());
            self.bump();
            // `??` is right-associative.
            self.parse_coalesce();
            self.builder.finish_node();
        }
    }

    fn parse_logical_or(&mut self) {
        self.parse_binary_left(
            &[SyntaxKind::PipePipe],
            Self::parse_logical_and,
        );
    }

    fn parse_logical_and(&mut self) {
        self.parse_binary_left(&[SyntaxKind::AmpAmp], Self::parse_bit_or);
    }

    fn parse_bit_or(&mut self) {
        self.parse_binary_left(&[SyntaxKind::Pipe], Self::parse_bit_xor);
    }

    fn parse_bit_xor(&mut self) {
        self.parse_binary_left(&[SyntaxKind::Caret], Self::parse_bit_and);
    }

    fn parse_bit_and(&mut self) {
        self.parse_binary_left(&[SyntaxKind::Amp], Self::parse_equality);
    }

    fn parse_equality(&mut self) {
        self.parse_binary_left(
            &[SyntaxKind::EqEq, SyntaxKind::BangEq],
            Self::parse_relational,
        );
    }

    fn parse_relational(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_additive();
        loop {
            match self.current() {
                SyntaxKind::Less
                | SyntaxKind::LessEq
                | SyntaxKind::Greater
                | SyntaxKind::GreaterEq => {
                    self.builder
                        .start_node_at(checkpoint, SyntaxKind::BinaryExpression.into());
                    self.bump();
                    self.parse_additive();
                    self.builder.finish_node();
                }
                SyntaxKind::IsKw => {
                    self.builder
                        .start_node_at(checkpoint, SyntaxKind::IsPatternExpression.into());
                    self.bump();
                    if self.at(SyntaxKind::NullKw) {
                        self.builder.start_node(SyntaxKind::LiteralExpression.into());
                        self.bump();
                        self.builder.finish_node();
                    } else {
                        self.parse_type();
                        // Declaration pattern: `expr is Type name`.
                        if self.at_ident_like() {
                            self.bump();
                        }
                    }
                    self.builder.finish_node();
                }
                SyntaxKind::AsKw => {
                    self.builder
                        .start_node_at(checkpoint, SyntaxKind::BinaryExpression.into());
                    self.bump();
                    self.parse_type();
                    self.builder.finish_node();
                }
                _ => break,
            }
        }
    }

    fn parse_additive(&mut self) {
        self.parse_binary_left(
            &[SyntaxKind::Plus, SyntaxKind::Minus],
            Self::parse_multiplicative,
        );
    }

    fn parse_multiplicative(&mut self) {
        self.parse_binary_left(
            &[SyntaxKind::Star, SyntaxKind::Slash, SyntaxKind::Percent],
            Self::parse_unary,
        );
    }

    fn parse_binary_left(&mut self, ops: &[SyntaxKind], mut next: impl FnMut(&mut Self)) {
        let checkpoint = self.checkpoint();
        next(self);
        while ops.contains(&self.current()) {
            self.builder
                .start_node_at(checkpoint, SyntaxKind::BinaryExpression.into());
            self.bump();
            next(self);
            self.builder.finish_node();
        }
    }

    fn parse_unary(&mut self) {
        match self.current() {
            SyntaxKind::Plus
            | SyntaxKind::Minus
            | SyntaxKind::Bang
            | SyntaxKind::Tilde
            | SyntaxKind::PlusPlus
            | SyntaxKind::MinusMinus => {
                self.builder
                    .start_node(SyntaxKind::PrefixUnaryExpression.into());
                self.bump();
                self.parse_unary();
                self.builder.finish_node();
            }
            SyntaxKind::LParen if self.at_cast() => {
                self.builder.start_node(SyntaxKind::CastExpression.into());
                self.bump(); // (
                self.parse_type();
                self.expect(SyntaxKind::RParen, "expected `)` after cast type");
                self.parse_unary();
                self.builder.finish_node();
            }
            _ => self.parse_postfix(),
        }
    }

    fn parse_postfix(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_primary();
        loop {
            match self.current() {
                SyntaxKind::Dot => {
                    self.builder
                        .start_node_at(checkpoint, SyntaxKind::MemberAccessExpression.into());
                    self.bump();
                    self.expect_ident_like("expected member name after `.`");
                    self.builder.finish_node();
                }
                SyntaxKind::LParen => {
                    self.builder
                        .start_node_at(checkpoint, SyntaxKind::InvocationExpression.into());
                    self.parse_argument_list();
                    self.builder.finish_node();
                }
                SyntaxKind::LBracket => {
                    self.builder
                        .start_node_at(checkpoint, SyntaxKind::ElementAccessExpression.into());
                    self.bump();
                    self.parse_expression();
                    while self.at(SyntaxKind::Comma) {
                        self.bump();
                        self.parse_expression();
                    }
                    self.expect(SyntaxKind::RBracket, "expected `]`");
                    self.builder.finish_node();
                }
                SyntaxKind::PlusPlus | SyntaxKind::MinusMinus => {
                    self.builder
                        .start_node_at(checkpoint, SyntaxKind::PostfixUnaryExpression.into());
                    self.bump();
                    self.builder.finish_node();
                }
                _ => break,
            }
        }
    }

    fn parse_argument_list(&mut self) {
        self.builder.start_node(SyntaxKind::ArgumentList.into());
        self.expect(SyntaxKind::LParen, "expected `(`");
        if !self.at(SyntaxKind::RParen) && !self.at(SyntaxKind::Eof) {
            self.parse_argument();
            while self.at(SyntaxKind::Comma) {
                self.bump();
                self.parse_argument();
            }
        }
        self.expect(SyntaxKind::RParen, "expected `)` to close argument list");
        self.builder.finish_node();
    }

    fn parse_argument(&mut self) {
        self.builder.start_node(SyntaxKind::Argument.into());
        if matches!(self.current(), SyntaxKind::RefKw | SyntaxKind::OutKw) {
            self.bump();
        }
        self.parse_expression();
        self.builder.finish_node();
    }

    fn parse_primary(&mut self) {
        match self.current() {
            SyntaxKind::IntLiteral
            | SyntaxKind::RealLiteral
            | SyntaxKind::StringLiteral
            | SyntaxKind::CharLiteral
            | SyntaxKind::TrueKw
            | SyntaxKind::FalseKw
            | SyntaxKind::NullKw => {
                self.builder.start_node(SyntaxKind::LiteralExpression.into());
                self.bump();
                self.builder.finish_node();
            }
            SyntaxKind::ThisKw => {
                self.builder.start_node(SyntaxKind::ThisExpression.into());
                self.bump();
                self.builder.finish_node();
            }
            SyntaxKind::BaseKw => {
                self.builder.start_node(SyntaxKind::BaseExpression.into());
                self.bump();
                self.builder.finish_node();
            }
            SyntaxKind::NewKw => {
                self.builder
                    .start_node(SyntaxKind::ObjectCreationExpression.into());
                self.bump();
                self.parse_type();
                if self.at(SyntaxKind::LParen) {
                    self.parse_argument_list();
                }
                self.builder.finish_node();
            }
            SyntaxKind::LParen => {
                if self.at_parenthesized_lambda() {
                    self.builder.start_node(SyntaxKind::LambdaExpression.into());
                    self.parse_parameter_list();
                    self.expect(SyntaxKind::Arrow, "expected `=>`");
                    if self.at(SyntaxKind::LBrace) {
                        self.parse_block();
                    } else {
                        self.parse_expression();
                    }
                    self.builder.finish_node();
                } else {
                    self.builder
                        .start_node(SyntaxKind::ParenthesizedExpression.into());
                    self.bump();
                    self.parse_expression();
                    self.expect(SyntaxKind::RParen, "expected `)`");
                    self.builder.finish_node();
                }
            }
            kind if kind.is_identifier_like() => {
                if self.nth(1) == Some(SyntaxKind::Arrow) {
                    self.builder.start_node(SyntaxKind::LambdaExpression.into());
                    self.builder.start_node(SyntaxKind::Parameter.into());
                    self.bump();
                    self.builder.finish_node();
                    self.bump(); // =>
                    if self.at(SyntaxKind::LBrace) {
                        self.parse_block();
                    } else {
                        self.parse_expression();
                    }
                    self.builder.finish_node();
                } else {
                    self.builder.start_node(SyntaxKind::NameExpression.into());
                    self.bump();
                    self.builder.finish_node();
                }
            }
            kind if kind.is_predefined_type_keyword() => {
                // `int.Parse(...)`, `string.Empty`: a predefined type used as
                // a member access receiver.
                self.builder.start_node(SyntaxKind::NameExpression.into());
                self.bump();
                self.builder.finish_node();
            }
            _ => {
                self.builder.start_node(SyntaxKind::Error.into());
                self.error_here("expected expression");
                self.bump_any_non_trivia();
                self.builder.finish_node();
            }
        }
    }

    /// `(` starts a cast when balanced content forms a type and the token
    /// after `)` can begin a cast operand. A bare identifier type additionally
    /// requires an operand that cannot continue a parenthesized expression.
    fn at_cast(&mut self) -> bool {
        self.eat_trivia();
        let open = skip_trivia(&self.tokens, 0);
        if self.tokens.get(open).map(|t| t.kind) != Some(SyntaxKind::LParen) {
            return false;
        }
        let inner = skip_trivia(&self.tokens, open + 1);
        let Some(after_type) = scan_type(&self.tokens, inner) else {
            return false;
        };
        let close = skip_trivia(&self.tokens, after_type);
        if self.tokens.get(close).map(|t| t.kind) != Some(SyntaxKind::RParen) {
            return false;
        }
        let operand = skip_trivia(&self.tokens, close + 1);
        let Some(tok) = self.tokens.get(operand) else {
            return false;
        };
        matches!(
            tok.kind,
            SyntaxKind::Identifier
                | SyntaxKind::IntLiteral
                | SyntaxKind::RealLiteral
                | SyntaxKind::StringLiteral
                | SyntaxKind::CharLiteral
                | SyntaxKind::TrueKw
                | SyntaxKind::FalseKw
                | SyntaxKind::NullKw
                | SyntaxKind::ThisKw
                | SyntaxKind::BaseKw
                | SyntaxKind::NewKw
                | SyntaxKind::LParen
        ) || tok.kind.is_contextual_keyword()
    }

    fn at_parenthesized_lambda(&mut self) -> bool {
        self.eat_trivia();
        let open = skip_trivia(&self.tokens, 0);
        if self.tokens.get(open).map(|t| t.kind) != Some(SyntaxKind::LParen) {
            return false;
        }
        let close = skip_balanced_parens(&self.tokens, open);
        let after = skip_trivia(&self.tokens, close);
        self.tokens.get(after).map(|t| t.kind) == Some(SyntaxKind::Arrow)
    }

    // --- Plumbing ---

    fn current(&mut self) -> SyntaxKind {
        self.eat_trivia();
        self.tokens
            .front()
            .map(|t| t.kind)
            .unwrap_or(SyntaxKind::Eof)
    }

    fn nth(&mut self, n: usize) -> Option<SyntaxKind> {
        self.eat_trivia();
        let mut idx = 0usize;
        let mut remaining = n;
        while let Some(tok) = self.tokens.get(idx) {
            if tok.kind.is_trivia() {
                idx += 1;
                continue;
            }
            if remaining == 0 {
                return Some(tok.kind);
            }
            remaining -= 1;
            idx += 1;
        }
        None
    }

    fn at(&mut self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    fn at_ident_like(&mut self) -> bool {
        self.current().is_identifier_like()
    }

    fn eat_trivia(&mut self) {
        while self.tokens.front().is_some_and(|t| t.kind.is_trivia()) {
            self.bump_raw();
        }
    }

    /// Eats trivia first so the checkpoint never captures the preceding
    /// trivia into the wrapped node.
    fn checkpoint(&mut self) -> rowan::Checkpoint {
        self.eat_trivia();
        self.builder.checkpoint()
    }

    fn bump(&mut self) {
        self.eat_trivia();
        self.bump_raw();
    }

    fn bump_any_non_trivia(&mut self) {
        self.eat_trivia();
        if !self.at(SyntaxKind::Eof) {
            self.bump_raw();
        }
    }

    fn bump_raw(&mut self) {
        if let Some(tok) = self.tokens.pop_front() {
            if tok.kind == SyntaxKind::Eof {
                self.tokens.push_front(tok);
                return;
            }
            let text = tok.text(self.input);
            self.builder.token(tok.kind.into(), text);
        }
    }

    fn expect(&mut self, kind: SyntaxKind, message: &str) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            self.error_here(message);
            false
        }
    }

    fn expect_ident_like(&mut self, message: &str) {
        if self.at_ident_like() {
            self.bump();
        } else {
            self.error_here(message);
        }
    }

    fn error_here(&mut self, message: &str) {
        let range = self.current_range();
        self.errors.push(ParseError {
            message: message.to_string(),
            range,
        });
    }

    fn current_range(&mut self) -> TextRange {
        self.eat_trivia();
        self.tokens.front().map(|t| t.range).unwrap_or_else(|| {
            let end = self.input.len();
            TextRange::new(end, end)
        })
    }

    fn recover_top_level(&mut self) {
        self.builder.start_node(SyntaxKind::Error.into());
        self.error_here("expected namespace or type declaration");
        self.recover_to(&[
            SyntaxKind::NamespaceKw,
            SyntaxKind::ClassKw,
            SyntaxKind::InterfaceKw,
            SyntaxKind::StructKw,
            SyntaxKind::EnumKw,
            SyntaxKind::UsingKw,
            SyntaxKind::Eof,
        ]);
        self.builder.finish_node();
    }

    fn recover_to(&mut self, kinds: &[SyntaxKind]) {
        while !kinds.contains(&self.current()) && !self.at(SyntaxKind::Eof) {
            self.bump();
        }
    }
}

fn skip_trivia(tokens: &VecDeque<Token>, mut idx: usize) -> usize {
    while tokens.get(idx).is_some_and(|t| t.kind.is_trivia()) {
        idx += 1;
    }
    idx
}

fn skip_balanced_parens(tokens: &VecDeque<Token>, mut idx: usize) -> usize {
    // Assumes `tokens[idx]` is `(`. Returns the index just past the matching `)`.
    let mut depth = 0usize;
    while let Some(tok) = tokens.get(idx) {
        if tok.kind.is_trivia() {
            idx += 1;
            continue;
        }
        match tok.kind {
            SyntaxKind::LParen => depth += 1,
            SyntaxKind::RParen => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    idx += 1;
                    break;
                }
            }
            SyntaxKind::Eof => break,
            _ => {}
        }
        idx += 1;
    }
    idx
}

/// Scan a type at `idx` (no trivia allowed at `idx`), returning the index
/// just past it. Handles predefined types, dotted names, balanced type
/// argument lists, and `?`/`[]` suffixes.
fn scan_type(tokens: &VecDeque<Token>, idx: usize) -> Option<usize> {
    let mut i = idx;
    let first = tokens.get(i)?;
    if first.kind.is_predefined_type_keyword() {
        i += 1;
    } else if first.kind.is_identifier_like() {
        i += 1;
        loop {
            let dot = skip_trivia(tokens, i);
            if tokens.get(dot).map(|t| t.kind) != Some(SyntaxKind::Dot) {
                break;
            }
            let seg = skip_trivia(tokens, dot + 1);
            if !tokens.get(seg).is_some_and(|t| t.kind.is_identifier_like()) {
                return None;
            }
            i = seg + 1;
        }
        // Balanced `<...>` containing only type-ish tokens.
        let lt = skip_trivia(tokens, i);
        if tokens.get(lt).map(|t| t.kind) == Some(SyntaxKind::Less) {
            let mut depth = 0usize;
            let mut j = lt;
            loop {
                let Some(tok) = tokens.get(j) else {
                    return None;
                };
                if tok.kind.is_trivia() {
                    j += 1;
                    continue;
                }
                match tok.kind {
                    SyntaxKind::Less => depth += 1,
                    SyntaxKind::Greater => {
                        depth -= 1;
                        if depth == 0 {
                            j += 1;
                            break;
                        }
                    }
                    SyntaxKind::Comma
                    | SyntaxKind::Dot
                    | SyntaxKind::Question
                    | SyntaxKind::LBracket
                    | SyntaxKind::RBracket => {}
                    k if k.is_identifier_like() || k.is_predefined_type_keyword() => {}
                    _ => return None,
                }
                j += 1;
            }
            i = j;
        }
    } else {
        return None;
    }

    // `?` and `[]` suffixes.
    loop {
        let next = skip_trivia(tokens, i);
        match tokens.get(next).map(|t| t.kind) {
            Some(SyntaxKind::Question) => i = next + 1,
            Some(SyntaxKind::LBracket) => {
                let close = skip_trivia(tokens, next + 1);
                if tokens.get(close).map(|t| t.kind) == Some(SyntaxKind::RBracket) {
                    i = close + 1;
                } else {
                    break;
                }
            }
            _ => break,
        }
    }
    Some(i)
}
