use super::support;
use crate::ast::AstNode;
use crate::SyntaxKind;

impl super::MethodDeclaration {
    pub fn parameters(&self) -> impl Iterator<Item = super::Parameter> + '_ {
        // `flat_map(|list| list.parameters())` does not compile because the
        // iterator borrows the moved `list`. Collect into a small buffer.
        self.parameter_list()
            .into_iter()
            .flat_map(|list| list.parameters().collect::<Vec<_>>())
    }

    /// Whether the declared return type is `void`, judged from syntax alone.
    ///
    /// Semantic consumers should prefer the semantic model, which also
    /// understands members this syntax-level check cannot classify.
    pub fn returns_void(&self) -> bool {
        self.return_type().is_some_and(|ty| ty.is_void())
    }

    pub fn is_static(&self) -> bool {
        self.modifiers()
            .is_some_and(|m| m.keywords().any(|k| k.kind() == SyntaxKind::StaticKw))
    }
}

impl super::PropertyDeclaration {
    /// An auto-property has accessors without bodies: `int X { get; set; }`.
    pub fn is_auto(&self) -> bool {
        match self.accessor_list() {
            Some(list) => list
                .accessors()
                .all(|acc| acc.body().is_none() && acc.arrow_clause().is_none()),
            None => false,
        }
    }

    pub fn getter(&self) -> Option<super::AccessorDeclaration> {
        self.accessor_list()?.accessors().find(|a| a.is_get())
    }

    pub fn setter(&self) -> Option<super::AccessorDeclaration> {
        self.accessor_list()?.accessors().find(|a| a.is_set())
    }
}

impl super::Type {
    pub fn is_void(&self) -> bool {
        self.syntax().kind() == SyntaxKind::PredefinedType
            && support::token(self.syntax(), SyntaxKind::VoidKw).is_some()
    }

    pub fn is_nullable(&self) -> bool {
        self.syntax().kind() == SyntaxKind::NullableType
    }

    /// The type's source text with trivia stripped.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for tok in self
            .syntax()
            .descendants_with_tokens()
            .filter_map(|el| el.into_token())
            .filter(|tok| !tok.kind().is_trivia())
        {
            out.push_str(tok.text());
        }
        out
    }
}

impl super::SwitchSection {
    pub fn is_default(&self) -> bool {
        self.labels().any(|label| label.is_default())
    }
}

impl super::MemberDeclaration {
    pub fn name_token(&self) -> Option<crate::SyntaxToken> {
        match self.syntax().kind() {
            SyntaxKind::FieldDeclaration => {
                let field = super::FieldDeclaration::cast(self.syntax().clone())?;
                let token = field.declarators().next()?.name_token();
                token
            }
            _ => support::ident_token(self.syntax()),
        }
    }
}

impl super::Parameter {
    /// `ref` / `out` / `in` / `params` keywords on the parameter.
    pub fn modifier_tokens(&self) -> impl Iterator<Item = crate::SyntaxToken> + '_ {
        self.syntax()
            .children_with_tokens()
            .filter_map(|el| el.into_token())
            .filter(|tok| {
                matches!(
                    tok.kind(),
                    SyntaxKind::RefKw | SyntaxKind::OutKw | SyntaxKind::InKw | SyntaxKind::ParamsKw
                )
            })
    }
}
