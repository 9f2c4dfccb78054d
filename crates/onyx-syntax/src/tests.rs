use pretty_assertions::assert_eq;

use crate::ast::{self, covering_node, AstNode};
use crate::{parse, SyntaxKind, TextRange};

fn parse_ok(text: &str) -> crate::SyntaxNode {
    let result = parse(text);
    assert_eq!(result.errors, vec![], "unexpected parse errors in:\n{text}");
    result.syntax()
}

#[test]
fn parse_is_lossless() {
    let text = r#"using System;

namespace App
{
    // A greeter.
    public class Greeter
    {
        private readonly string name;

        public Greeter(string name)
        {
            this.name = name;
        }

        public string Name => name;

        public void Greet(int times)
        {
            for (int i = 0; i < times; i++)
            {
                Console.WriteLine("hi " + name); /* inline */
            }
        }
    }
}
"#;
    let root = parse_ok(text);
    assert_eq!(root.to_string(), text);
}

#[test]
fn error_recovery_is_lossless_too() {
    let text = "class C { void M() { int 1x ??? } }";
    let result = parse(text);
    assert!(!result.errors.is_empty());
    assert_eq!(result.syntax().to_string(), text);
}

#[test]
fn compilation_unit_structure() {
    let root = parse_ok(
        "using System;\nnamespace N { class A { } enum E { One, Two } interface I { } }\n",
    );
    let unit = ast::CompilationUnit::cast(root).unwrap();
    assert_eq!(unit.usings().count(), 1);
    let ns = unit.namespace().unwrap();
    assert_eq!(ns.name().unwrap().text(), "N");
    let kinds: Vec<SyntaxKind> = ns
        .type_declarations()
        .map(|t| t.syntax().kind())
        .collect();
    assert_eq!(
        kinds,
        vec![
            SyntaxKind::ClassDeclaration,
            SyntaxKind::EnumDeclaration,
            SyntaxKind::InterfaceDeclaration
        ]
    );
}

#[test]
fn file_scoped_namespace() {
    let root = parse_ok("namespace N;\n\nclass C { }\n");
    let unit = ast::CompilationUnit::cast(root).unwrap();
    let ns = unit.namespace().unwrap();
    assert_eq!(ns.type_declarations().count(), 1);
}

#[test]
fn member_shapes() {
    let root = parse_ok(
        r#"class C
{
    int count = 0, total;
    public int Count { get; set; }
    public int Doubled => count * 2;
    C(int seed) { count = seed; }
    public static void Reset() { }
    private int Half() => count / 2;
}
"#,
    );
    let class = root
        .descendants()
        .find_map(ast::ClassDeclaration::cast)
        .unwrap();
    let kinds: Vec<SyntaxKind> = class.members().map(|m| m.syntax().kind()).collect();
    assert_eq!(
        kinds,
        vec![
            SyntaxKind::FieldDeclaration,
            SyntaxKind::PropertyDeclaration,
            SyntaxKind::PropertyDeclaration,
            SyntaxKind::ConstructorDeclaration,
            SyntaxKind::MethodDeclaration,
            SyntaxKind::MethodDeclaration,
        ]
    );

    let field = class
        .members()
        .find_map(|m| ast::FieldDeclaration::cast(m.syntax().clone()))
        .unwrap();
    assert_eq!(field.declarators().count(), 2);

    let auto = root
        .descendants()
        .find_map(ast::PropertyDeclaration::cast)
        .unwrap();
    assert!(auto.is_auto());

    let arrow_prop = root
        .descendants()
        .filter_map(ast::PropertyDeclaration::cast)
        .nth(1)
        .unwrap();
    assert!(!arrow_prop.is_auto() || arrow_prop.accessor_list().is_none());
    assert!(arrow_prop.arrow_clause().is_some());

    let methods: Vec<ast::MethodDeclaration> = root
        .descendants()
        .filter_map(ast::MethodDeclaration::cast)
        .collect();
    assert!(methods[0].returns_void());
    assert!(methods[0].is_static());
    assert!(!methods[1].returns_void());
    assert!(methods[1].arrow_clause().is_some());
}

#[test]
fn statement_shapes() {
    let root = parse_ok(
        r#"class C
{
    void M(int x)
    {
        var y = x + 1;
        int? z = null;
        if (x > 0) { y++; } else { y--; }
        while (x < 10) x++;
        do { x--; } while (x > 0);
        foreach (int item in items) Use(item);
        switch (x) { case 1: A(); break; default: B(); break; }
        string s = obj.ToString();
        int parsed = int.Parse(s);
        throw new InvalidOperationException();
    }
}
"#,
    );
    let body = root.descendants().find_map(ast::Block::cast).unwrap();
    let kinds: Vec<SyntaxKind> = body.statements().map(|s| s.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            SyntaxKind::LocalDeclarationStatement,
            SyntaxKind::LocalDeclarationStatement,
            SyntaxKind::IfStatement,
            SyntaxKind::WhileStatement,
            SyntaxKind::DoStatement,
            SyntaxKind::ForEachStatement,
            SyntaxKind::SwitchStatement,
            SyntaxKind::LocalDeclarationStatement,
            SyntaxKind::LocalDeclarationStatement,
            SyntaxKind::ThrowStatement,
        ]
    );
}

#[test]
fn expression_precedence() {
    let root = parse_ok("class C { int M() { return a + b * c; } }");
    let ret = root
        .descendants()
        .find_map(ast::ReturnStatement::cast)
        .unwrap();
    let top = ast::BinaryExpression::cast(ret.expression().unwrap()).unwrap();
    assert_eq!(top.operator_token().unwrap().kind(), SyntaxKind::Plus);
    let rhs = ast::BinaryExpression::cast(top.rhs().unwrap()).unwrap();
    assert_eq!(rhs.operator_token().unwrap().kind(), SyntaxKind::Star);
}

#[test]
fn is_null_pattern() {
    let root = parse_ok("class C { void M(string s) { if (s is null) { } } }");
    let pat = root
        .descendants()
        .find_map(ast::IsPatternExpression::cast)
        .unwrap();
    assert!(pat.is_null_check());
}

#[test]
fn nested_generics_close_properly() {
    let root = parse_ok("class C { List<List<int>> xs; }");
    let field = root
        .descendants()
        .find_map(ast::FieldDeclaration::cast)
        .unwrap();
    assert_eq!(field.field_type().unwrap().text(), "List<List<int>>");
}

#[test]
fn cast_vs_parenthesized() {
    let root = parse_ok("class C { void M() { var a = (int)x; var b = (x) + 1; } }");
    let kinds: Vec<SyntaxKind> = root
        .descendants()
        .filter(|n| {
            matches!(
                n.kind(),
                SyntaxKind::CastExpression | SyntaxKind::ParenthesizedExpression
            )
        })
        .map(|n| n.kind())
        .collect();
    assert_eq!(
        kinds,
        vec![SyntaxKind::CastExpression, SyntaxKind::ParenthesizedExpression]
    );
}

#[test]
fn covering_node_prefers_deepest() {
    let text = "class C { void M() { F(a + b); } }";
    let root = parse_ok(text);
    let offset = text.find("a +").unwrap();
    let node = covering_node(&root, TextRange::new(offset, offset + 1));
    assert_eq!(node.kind(), SyntaxKind::NameExpression);

    // A selection spanning both operands covers the whole binary expression.
    let a = text.find('a').unwrap();
    let b = text.find('b').unwrap();
    let node = covering_node(&root, TextRange::new(a, b + 1));
    assert_eq!(node.kind(), SyntaxKind::BinaryExpression);
}

#[test]
fn covering_node_empty_span_biases_right() {
    let text = "class C { void M() { F(a); } }";
    let root = parse_ok(text);
    // Cursor exactly before `a`: between `(` and `a`, the right token wins.
    let offset = text.find("a)").unwrap();
    let node = covering_node(&root, TextRange::empty(offset));
    assert_eq!(node.kind(), SyntaxKind::NameExpression);
}

#[test]
fn lambda_expressions() {
    let root = parse_ok("class C { void M() { items.Where(x => x > 0).Select((a, b) => a); } }");
    let lambdas: Vec<_> = root
        .descendants()
        .filter(|n| n.kind() == SyntaxKind::LambdaExpression)
        .collect();
    assert_eq!(lambdas.len(), 2);
}
