//! Semantic queries over an immutable snapshot.
//!
//! The [`SemanticModel`] trait is the oracle rules consult for type and
//! symbol questions. Queries are pure reads over the request's snapshot and
//! are memoized per request by the context.
//!
//! [`DocumentSemanticModel`] is a lightweight, syntax-backed implementation
//! scoped to a single file: enough for single-document hosts and fixture
//! tests. A project-wide host can substitute a richer model behind the same
//! trait.

use onyx_syntax::ast::{self, AstNode};
use onyx_syntax::{SyntaxKind, SyntaxNode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeInfo {
    /// Display text of the type, trivia stripped (`List<int>`, `string`).
    pub display: String,
    pub is_void: bool,
    pub is_value_type: bool,
    pub is_nullable: bool,
}

impl TypeInfo {
    /// Whether `null` is a legal value of this type.
    pub fn accepts_null(&self) -> bool {
        !self.is_void && (self.is_nullable || !self.is_value_type)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Type,
    Method,
    Constructor,
    Property,
    Accessor,
    Field,
    Parameter,
    Local,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolInfo {
    pub name: String,
    pub kind: SymbolKind,
}

/// Oracle mapping syntax nodes to type/symbol information.
pub trait SemanticModel {
    /// Type of a type reference or of an expression, when known.
    fn type_info(&self, node: &SyntaxNode) -> Option<TypeInfo>;

    /// The symbol a declaration node introduces.
    fn declared_symbol(&self, node: &SyntaxNode) -> Option<SymbolInfo>;

    /// The symbol an identifier expression refers to.
    fn symbol_info(&self, node: &SyntaxNode) -> Option<SymbolInfo>;
}

/// Syntax-backed semantic model for a single document.
///
/// Named (non-predefined) types are classified as reference types; a
/// single-file model cannot see struct declarations from other files, and
/// for the rules shipped here that bias is the safe direction.
pub struct DocumentSemanticModel {
    #[allow(dead_code)]
    root: SyntaxNode,
}

impl DocumentSemanticModel {
    pub fn new(root: SyntaxNode) -> Self {
        Self { root }
    }

    fn resolve_name(&self, node: &SyntaxNode) -> Option<(SymbolInfo, Option<ast::Type>)> {
        let name = ast::NameExpression::cast(node.clone())?.token()?;
        let name_text = name.text().to_string();

        for ancestor in node.ancestors() {
            match ancestor.kind() {
                SyntaxKind::MethodDeclaration | SyntaxKind::ConstructorDeclaration => {
                    let params = ancestor
                        .children()
                        .find_map(ast::ParameterList::cast)
                        .into_iter()
                        .flat_map(|list| list.parameters().collect::<Vec<_>>());
                    for param in params {
                        if param
                            .name_token()
                            .is_some_and(|tok| tok.text() == name_text)
                        {
                            return Some((
                                SymbolInfo {
                                    name: name_text,
                                    kind: SymbolKind::Parameter,
                                },
                                param.param_type(),
                            ));
                        }
                    }
                }
                SyntaxKind::Block => {
                    for stmt in ancestor.children() {
                        let Some(decl) = ast::LocalDeclarationStatement::cast(stmt) else {
                            continue;
                        };
                        for declarator in decl.declarators() {
                            if declarator
                                .name_token()
                                .is_some_and(|tok| tok.text() == name_text)
                            {
                                return Some((
                                    SymbolInfo {
                                        name: name_text,
                                        kind: SymbolKind::Local,
                                    },
                                    decl.decl_type(),
                                ));
                            }
                        }
                    }
                }
                _ => {}
            }
        }
        None
    }
}

impl SemanticModel for DocumentSemanticModel {
    fn type_info(&self, node: &SyntaxNode) -> Option<TypeInfo> {
        if let Some(ty) = ast::Type::cast(node.clone()) {
            return Some(classify_type(&ty));
        }

        match node.kind() {
            SyntaxKind::LiteralExpression => {
                let token = ast::LiteralExpression::cast(node.clone())?.token()?;
                let info = match token.kind() {
                    SyntaxKind::IntLiteral => TypeInfo {
                        display: "int".to_string(),
                        is_void: false,
                        is_value_type: true,
                        is_nullable: false,
                    },
                    SyntaxKind::RealLiteral => TypeInfo {
                        display: "double".to_string(),
                        is_void: false,
                        is_value_type: true,
                        is_nullable: false,
                    },
                    SyntaxKind::StringLiteral => TypeInfo {
                        display: "string".to_string(),
                        is_void: false,
                        is_value_type: false,
                        is_nullable: false,
                    },
                    SyntaxKind::CharLiteral => TypeInfo {
                        display: "char".to_string(),
                        is_void: false,
                        is_value_type: true,
                        is_nullable: false,
                    },
                    SyntaxKind::TrueKw | SyntaxKind::FalseKw => TypeInfo {
                        display: "bool".to_string(),
                        is_void: false,
                        is_value_type: true,
                        is_nullable: false,
                    },
                    SyntaxKind::NullKw => TypeInfo {
                        display: "null".to_string(),
                        is_void: false,
                        is_value_type: false,
                        is_nullable: true,
                    },
                    _ => return None,
                };
                Some(info)
            }
            SyntaxKind::NameExpression => {
                let (_, ty) = self.resolve_name(node)?;
                Some(classify_type(&ty?))
            }
            _ => None,
        }
    }

    fn declared_symbol(&self, node: &SyntaxNode) -> Option<SymbolInfo> {
        let kind = match node.kind() {
            k if k.is_type_declaration() => SymbolKind::Type,
            SyntaxKind::MethodDeclaration => SymbolKind::Method,
            SyntaxKind::ConstructorDeclaration => SymbolKind::Constructor,
            SyntaxKind::PropertyDeclaration => SymbolKind::Property,
            SyntaxKind::AccessorDeclaration => SymbolKind::Accessor,
            SyntaxKind::Parameter => SymbolKind::Parameter,
            SyntaxKind::VariableDeclarator => {
                match node.parent().map(|p| p.kind()) {
                    Some(SyntaxKind::FieldDeclaration) => SymbolKind::Field,
                    _ => SymbolKind::Local,
                }
            }
            _ => return None,
        };

        let name = match node.kind() {
            SyntaxKind::AccessorDeclaration => {
                let acc = ast::AccessorDeclaration::cast(node.clone())?;
                if acc.is_get() { "get" } else { "set" }.to_string()
            }
            _ => onyx_syntax::ast::support::ident_token(node)?.text().to_string(),
        };

        Some(SymbolInfo { name, kind })
    }

    fn symbol_info(&self, node: &SyntaxNode) -> Option<SymbolInfo> {
        self.resolve_name(node).map(|(symbol, _)| symbol)
    }
}

fn classify_type(ty: &ast::Type) -> TypeInfo {
    let display = ty.text();
    match ty.syntax().kind() {
        SyntaxKind::PredefinedType => {
            let is_void = ty.is_void();
            let is_reference = matches!(display.as_str(), "string" | "object");
            TypeInfo {
                display,
                is_void,
                is_value_type: !is_void && !is_reference,
                is_nullable: false,
            }
        }
        SyntaxKind::NullableType => {
            let inner = ast::NullableType::cast(ty.syntax().clone())
                .and_then(|n| n.element_type())
                .map(|inner| classify_type(&inner));
            TypeInfo {
                display,
                is_void: false,
                is_value_type: inner.map(|i| i.is_value_type).unwrap_or(false),
                is_nullable: true,
            }
        }
        SyntaxKind::ArrayType => TypeInfo {
            display,
            is_void: false,
            is_value_type: false,
            is_nullable: false,
        },
        // Named types resolve as reference types in the single-file model.
        _ => TypeInfo {
            display,
            is_void: false,
            is_value_type: false,
            is_nullable: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use onyx_syntax::parse;

    fn model(text: &str) -> (DocumentSemanticModel, SyntaxNode) {
        let root = parse(text).syntax();
        (DocumentSemanticModel::new(root.clone()), root)
    }

    #[test]
    fn parameter_resolution_and_type() {
        let (model, root) = model("class C { void M(string name) { Use(name); } }");
        let name_use = root
            .descendants()
            .filter(|n| n.kind() == SyntaxKind::NameExpression)
            .find(|n| n.to_string() == "name")
            .unwrap();

        let symbol = model.symbol_info(&name_use).unwrap();
        assert_eq!(symbol.kind, SymbolKind::Parameter);

        let info = model.type_info(&name_use).unwrap();
        assert_eq!(info.display, "string");
        assert!(info.accepts_null());
    }

    #[test]
    fn value_types_do_not_accept_null() {
        let (model, root) = model("class C { void M(int count) { } }");
        let ty = root
            .descendants()
            .find(|n| n.kind() == SyntaxKind::PredefinedType && n.to_string() == "int")
            .unwrap();
        let info = model.type_info(&ty).unwrap();
        assert!(info.is_value_type);
        assert!(!info.accepts_null());
    }

    #[test]
    fn nullable_value_type_accepts_null() {
        let (model, root) = model("class C { void M(int? maybe) { } }");
        let ty = root
            .descendants()
            .find(|n| n.kind() == SyntaxKind::NullableType)
            .unwrap();
        let info = model.type_info(&ty).unwrap();
        assert!(info.is_nullable);
        assert!(info.accepts_null());
    }

    #[test]
    fn declared_symbols() {
        let (model, root) = model("class C { int F() { return 1; } }");
        let method = root
            .descendants()
            .find(|n| n.kind() == SyntaxKind::MethodDeclaration)
            .unwrap();
        let symbol = model.declared_symbol(&method).unwrap();
        assert_eq!(symbol.kind, SymbolKind::Method);
        assert_eq!(symbol.name, "F");
    }
}
