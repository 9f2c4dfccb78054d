//! End-to-end behavior of the individual rules: dispatch at a position,
//! pick the action by id, apply it, compare the resulting text.

use onyx_refactor::{
    compute_refactorings, execute, CancellationToken, Document, FileId, RefactoringAction,
    RefactoringId, RefactoringSettings, TextRange,
};
use onyx_syntax::CSharpLanguageLevel;
use pretty_assertions::assert_eq;

fn strip_caret_marker(src: &str) -> (String, TextRange) {
    let marker = "/*caret*/";
    let pos = src.find(marker).expect("caret marker");
    let mut cleaned = String::new();
    cleaned.push_str(&src[..pos]);
    cleaned.push_str(&src[pos + marker.len()..]);
    (cleaned, TextRange::new(pos, pos))
}

fn strip_selection_markers(src: &str) -> (String, TextRange) {
    let start_marker = "/*select*/";
    let end_marker = "/*end*/";
    let start = src.find(start_marker).expect("start marker");
    let end = src.find(end_marker).expect("end marker");
    assert!(start < end, "expected start marker before end marker");

    let selection_start = start;
    let selection_end = selection_start + (end - (start + start_marker.len()));

    let mut cleaned = String::new();
    cleaned.push_str(&src[..start]);
    cleaned.push_str(&src[start + start_marker.len()..end]);
    cleaned.push_str(&src[end + end_marker.len()..]);

    (cleaned, TextRange::new(selection_start, selection_end))
}

fn dispatch(document: &Document, span: TextRange) -> Vec<RefactoringAction> {
    compute_refactorings(
        document,
        span,
        &RefactoringSettings::new(),
        &CancellationToken::new(),
    )
    .unwrap()
}

fn find_action(actions: &[RefactoringAction], id: RefactoringId) -> &RefactoringAction {
    actions
        .iter()
        .find(|a| a.id() == id)
        .unwrap_or_else(|| panic!("no action {id}"))
}

fn apply_at(src_with_caret: &str, id: RefactoringId) -> String {
    let (src, span) = strip_caret_marker(src_with_caret);
    let document = Document::new(FileId::new("Test.cs"), &src);
    let actions = dispatch(&document, span);
    let action = find_action(&actions, id);
    execute(action, &document, &CancellationToken::new())
        .unwrap()
        .text()
}

#[test]
fn convert_switch_to_if_else_chain() {
    let after = apply_at(
        r#"class C
{
    void M(int x)
    {
        /*caret*/switch (x)
        {
            case 1:
                A();
                break;
            case 2:
                B();
                break;
            default:
                C();
                break;
        }
    }
}
"#,
        RefactoringId::ConvertSwitchToIf,
    );
    assert_eq!(
        after,
        r#"class C
{
    void M(int x)
    {
        if (x == 1)
        {
            A();
        }
        else if (x == 2)
        {
            B();
        }
        else
        {
            C();
        }
    }
}
"#
    );
}

#[test]
fn switch_with_multiple_case_labels_joins_conditions() {
    let after = apply_at(
        r#"class C
{
    void M(int x)
    {
        /*caret*/switch (x)
        {
            case 1:
            case 2:
                A();
                break;
        }
    }
}
"#,
        RefactoringId::ConvertSwitchToIf,
    );
    assert!(after.contains("if (x == 1 || x == 2)"), "got:\n{after}");
}

#[test]
fn switch_with_fall_through_is_not_offered() {
    // A section without a terminal `break` cannot be converted.
    let (src, span) = strip_caret_marker(
        r#"class C
{
    void M(int x)
    {
        /*caret*/switch (x)
        {
            case 1:
                A();
            case 2:
                B();
                break;
        }
    }
}
"#,
    );
    let document = Document::new(FileId::new("Test.cs"), &src);
    let actions = dispatch(&document, span);
    assert!(actions
        .iter()
        .all(|a| a.id() != RefactoringId::ConvertSwitchToIf));
}

#[test]
fn add_null_check_inserts_before_existing_statements() {
    let after = apply_at(
        r#"class C
{
    void M(string /*caret*/name)
    {
        Use(name);
    }
}
"#,
        RefactoringId::AddParameterNullCheck,
    );
    assert_eq!(
        after,
        r#"class C
{
    void M(string name)
    {
        if (name is null)
        {
            throw new ArgumentNullException(nameof(name));
        }

        Use(name);
    }
}
"#
    );
}

#[test]
fn add_null_check_is_idempotent() {
    let (src, span) = strip_caret_marker(
        r#"class C
{
    void M(string /*caret*/name)
    {
        Use(name);
    }
}
"#,
    );
    let document = Document::new(FileId::new("Test.cs"), &src);
    let actions = dispatch(&document, span);
    let action = find_action(&actions, RefactoringId::AddParameterNullCheck);
    let after = execute(action, &document, &CancellationToken::new()).unwrap();

    // Re-running dispatch against the rewritten document must detect the
    // existing check and not offer the action again.
    let pos = after.text().find("string name").unwrap() + "string ".len() + 1;
    let actions = dispatch(&after, TextRange::new(pos, pos));
    assert!(
        actions
            .iter()
            .all(|a| a.id() != RefactoringId::AddParameterNullCheck),
        "null check must not be offered twice"
    );
}

#[test]
fn add_null_check_respects_language_level() {
    let (src, span) = strip_caret_marker(
        "class C { void M(string /*caret*/name) { Use(name); } }",
    );
    let document = Document::new(FileId::new("Test.cs"), &src);
    let settings =
        RefactoringSettings::with_language_level(CSharpLanguageLevel::CSHARP_6);
    let actions =
        compute_refactorings(&document, span, &settings, &CancellationToken::new()).unwrap();
    let action = find_action(&actions, RefactoringId::AddParameterNullCheck);
    let after = execute(action, &document, &CancellationToken::new())
        .unwrap()
        .text();
    assert!(after.contains("if (name == null)"), "got:\n{after}");
    assert!(!after.contains("is null"));
}

#[test]
fn add_null_check_not_offered_for_value_types() {
    let (src, span) =
        strip_caret_marker("class C { void M(int /*caret*/count) { Use(count); } }");
    let document = Document::new(FileId::new("Test.cs"), &src);
    let actions = dispatch(&document, span);
    assert!(actions
        .iter()
        .all(|a| a.id() != RefactoringId::AddParameterNullCheck));
}

#[test]
fn uncomment_strips_markers_of_the_contiguous_group_only() {
    // Trivia layout around the cursor: [WS, "// a", NL, "// b", NL]. Both
    // markers go; whitespace and line endings stay exactly as they were.
    let after = apply_at(
        "class C { }  // a\n/*caret*/// b\nclass D { }",
        RefactoringId::Uncomment,
    );
    assert_eq!(after, "class C { }   a\n b\nclass D { }");
}

#[test]
fn uncomment_block_comment() {
    let after = apply_at(
        "class C { void M() { /*caret*//* x(); */ } }",
        RefactoringId::Uncomment,
    );
    assert_eq!(after, "class C { void M() {  x();  } }");
}

#[test]
fn remove_comment_takes_preceding_whitespace() {
    let after = apply_at(
        "class C { void M() { int x = 1; /*caret*/// note\n} }",
        RefactoringId::RemoveComment,
    );
    assert_eq!(after, "class C { void M() { int x = 1;\n} }");
}

#[test]
fn remove_comment_does_not_absorb_doc_comments() {
    // The doc comment bounds the group; only "// gone" is deleted, and the
    // line break that belonged to the doc comment's line stays.
    let after = apply_at(
        "class C { }  /// doc\n/*caret*/// gone\nclass D { }",
        RefactoringId::RemoveComment,
    );
    assert_eq!(after, "class C { }  /// doc\n\nclass D { }");
}

#[test]
fn remove_all_comments_preserves_code_and_layout() {
    let after = apply_at(
        r#"class C
{
    /*caret*/// leading
    void M()
    {
        x(); // trailing
        /* block */ y();
    }
}
"#,
        RefactoringId::RemoveAllComments,
    );
    assert_eq!(
        after,
        r#"class C
{
    void M()
    {
        x();
        y();
    }
}
"#
    );
}

#[test]
fn negate_operator_flips_comparisons() {
    let after = apply_at(
        "class C { void M() { if (a /*caret*/== b) { } else { } } }",
        RefactoringId::NegateOperator,
    );
    assert!(after.contains("a != b"), "got:\n{after}");

    let after = apply_at(
        "class C { void M() { bool r = x /*caret*/&& y; } }",
        RefactoringId::NegateOperator,
    );
    assert!(after.contains("x || y"), "got:\n{after}");
}

#[test]
fn swap_operands_preserves_interior_trivia() {
    // The comment travels with its slot, not with an operand: trivia
    // ownership changes, the trivia itself is conserved.
    let after = apply_at(
        "class C { void M() { int r = a /* k */ /*caret*/+ b; } }",
        RefactoringId::SwapBinaryOperands,
    );
    assert_eq!(after, "class C { void M() { int r = b /* k */ + a; } }");
}

#[test]
fn swap_operands_flips_relational_operators() {
    let after = apply_at(
        "class C { void M() { bool r = a /*caret*/< b; } }",
        RefactoringId::SwapBinaryOperands,
    );
    assert!(after.contains("b > a"), "got:\n{after}");
}

#[test]
fn expand_expression_body_value_returning_method() {
    let after = apply_at(
        r#"class C
{
    int Doubled() /*caret*/=> x * 2;
}
"#,
        RefactoringId::ExpandExpressionBody,
    );
    assert_eq!(
        after,
        r#"class C
{
    int Doubled()
    {
        return x * 2;
    }
}
"#
    );
}

#[test]
fn expand_expression_body_void_method_has_no_return() {
    // Whether the body is a `return` statement is decided by the member's
    // result type, not by the expression's shape.
    let after = apply_at(
        r#"class C
{
    void Log() /*caret*/=> Console.WriteLine(x);
}
"#,
        RefactoringId::ExpandExpressionBody,
    );
    assert_eq!(
        after,
        r#"class C
{
    void Log()
    {
        Console.WriteLine(x);
    }
}
"#
    );
}

#[test]
fn expand_expression_body_property() {
    let after = apply_at(
        r#"class C
{
    int Total /*caret*/=> x + y;
}
"#,
        RefactoringId::ExpandExpressionBody,
    );
    assert_eq!(
        after,
        r#"class C
{
    int Total
    {
        get { return x + y; }
    }
}
"#
    );
}

#[test]
fn use_expression_body_on_single_return_method() {
    let after = apply_at(
        r#"class C
{
    int /*caret*/Doubled()
    {
        return x * 2;
    }
}
"#,
        RefactoringId::UseExpressionBody,
    );
    assert_eq!(
        after,
        r#"class C
{
    int Doubled() => x * 2;
}
"#
    );
}

#[test]
fn use_expression_body_refuses_blocks_with_comments() {
    let (src, span) = strip_caret_marker(
        r#"class C
{
    int /*caret*/Doubled()
    {
        // precomputed
        return x * 2;
    }
}
"#,
    );
    let document = Document::new(FileId::new("Test.cs"), &src);
    let actions = dispatch(&document, span);
    assert!(actions
        .iter()
        .all(|a| a.id() != RefactoringId::UseExpressionBody));
}

#[test]
fn expand_property_adds_backing_field() {
    let after = apply_at(
        r#"class C
{
    public int /*caret*/Count { get; set; }
}
"#,
        RefactoringId::ExpandProperty,
    );
    assert_eq!(
        after,
        r#"class C
{
    private int _count;

    public int Count
    {
        get { return _count; }
        set { _count = value; }
    }
}
"#
    );
}

#[test]
fn expand_property_getter_only() {
    let after = apply_at(
        r#"class C
{
    public string /*caret*/Name { get; }
}
"#,
        RefactoringId::ExpandProperty,
    );
    assert!(after.contains("private string _name;"), "got:\n{after}");
    assert!(after.contains("get { return _name; }"));
    assert!(!after.contains("set {"));
}

#[test]
fn add_braces_wraps_embedded_statement() {
    let (src, span) = strip_caret_marker(
        "class C { void M() { while (x > 0) /*caret*/x--; } }",
    );
    let document = Document::new(FileId::new("Test.cs"), &src);
    let actions = dispatch(&document, span);
    let action = find_action(&actions, RefactoringId::AddBraces);
    let after = execute(action, &document, &CancellationToken::new()).unwrap();

    assert_eq!(
        after.text(),
        "class C { void M() { while (x > 0) { x--; } } }"
    );
    // The replacement changed layout, so it is tagged for the external
    // formatter instead of being hand-formatted.
    assert_eq!(after.reformat_ranges().len(), 1);
}

#[test]
fn remove_braces_unwraps_single_statement_block() {
    let after = apply_at(
        "class C { void M() { if (c) /*caret*/{ x++; } } }",
        RefactoringId::RemoveBraces,
    );
    assert_eq!(after, "class C { void M() { if (c) x++; } }");
}

#[test]
fn remove_braces_refuses_blocks_containing_comments() {
    // The rewrite strips whitespace and line breaks by kind; a comment in
    // the block must block the action rather than vanish.
    let (src, span) = strip_caret_marker(
        "class C { void M() { if (c) /*caret*/{ /* keep */ x++; } } }",
    );
    let document = Document::new(FileId::new("Test.cs"), &src);
    let actions = dispatch(&document, span);
    assert!(actions
        .iter()
        .all(|a| a.id() != RefactoringId::RemoveBraces));
}

#[test]
fn invert_if_negates_condition_and_swaps_branches() {
    let after = apply_at(
        r#"class C
{
    void M(int x)
    {
        /*caret*/if (x < 10)
        {
            A();
        }
        else
        {
            B();
        }
    }
}
"#,
        RefactoringId::InvertIf,
    );
    assert_eq!(
        after,
        r#"class C
{
    void M(int x)
    {
        if (x >= 10)
        {
            B();
        }
        else
        {
            A();
        }
    }
}
"#
    );
}

#[test]
fn parenthesize_selected_expression() {
    let (src, span) = strip_selection_markers(
        "class C { void M() { int r = a + /*select*/b * c/*end*/; } }",
    );
    let document = Document::new(FileId::new("Test.cs"), &src);
    let actions = dispatch(&document, span);
    let action = find_action(&actions, RefactoringId::ParenthesizeExpression);
    let after = execute(action, &document, &CancellationToken::new())
        .unwrap()
        .text();
    assert_eq!(after, "class C { void M() { int r = a + (b * c); } }");
}

#[test]
fn preview_renders_a_unified_diff() {
    let (src, span) = strip_caret_marker(
        "class C { void M() { if (a /*caret*/== b) { } else { } } }",
    );
    let document = Document::new(FileId::new("Test.cs"), &src);
    let actions = dispatch(&document, span);
    let action = find_action(&actions, RefactoringId::NegateOperator);

    let diff =
        onyx_refactor::preview_action(&document, action, &CancellationToken::new()).unwrap();
    assert!(diff.contains("-class C { void M() { if (a == b) { } else { } } }"));
    assert!(diff.contains("+class C { void M() { if (a != b) { } else { } } }"));
}

#[test]
fn lsp_unresolved_actions_resolve_lazily() {
    let (src, span) = strip_caret_marker(
        "class C { void M() { if (a /*caret*/== b) { } else { } } }",
    );
    let document = Document::new(FileId::new("file:///Test.cs"), &src);
    let actions = dispatch(&document, span);

    let mut code_actions = onyx_refactor::lsp::unresolved_actions_to_lsp(span, &actions);
    let negate = code_actions
        .iter_mut()
        .find(|a| a.title == "Negate operator")
        .unwrap();
    assert!(negate.edit.is_none(), "unresolved actions carry no edit");
    assert!(negate.data.is_some());

    onyx_refactor::lsp::resolve_code_action(
        &document,
        &RefactoringSettings::new(),
        negate,
        &CancellationToken::new(),
    )
    .unwrap();
    let edit = negate.edit.as_ref().unwrap();
    let changes = edit.changes.as_ref().unwrap();
    let (_, edits) = changes.iter().next().unwrap();
    assert!(edits[0].new_text.contains("a != b"));
}

#[test]
fn lsp_actions_carry_full_document_edits() {
    let (src, span) = strip_caret_marker(
        "class C { void M() { if (a /*caret*/== b) { } else { } } }",
    );
    let document = Document::new(FileId::new("file:///Test.cs"), &src);
    let actions = dispatch(&document, span);

    let code_actions =
        onyx_refactor::lsp::actions_to_lsp(&document, &actions, &CancellationToken::new());
    assert!(!code_actions.is_empty());
    let negate = code_actions
        .iter()
        .find(|a| a.title == "Negate operator")
        .unwrap();
    let edit = negate.edit.as_ref().unwrap();
    let changes = edit.changes.as_ref().unwrap();
    let (_, edits) = changes.iter().next().unwrap();
    assert!(edits[0].new_text.contains("a != b"));
}
