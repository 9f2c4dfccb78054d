//! Dispatch engine behavior: pass ordering, category dedup, degradation,
//! settings, and failure surfaces.

use onyx_refactor::{
    compute_refactorings, CancellationToken, Document, FileId, RefactoringAction, RefactoringId,
    RefactoringSettings, TextRange,
};
use pretty_assertions::assert_eq;

fn strip_caret_marker(src: &str) -> (String, TextRange) {
    let marker = "/*caret*/";
    let pos = src.find(marker).expect("caret marker");
    let mut cleaned = String::new();
    cleaned.push_str(&src[..pos]);
    cleaned.push_str(&src[pos + marker.len()..]);
    (cleaned, TextRange::new(pos, pos))
}

fn actions_at(document: &Document, span: TextRange) -> Vec<RefactoringAction> {
    compute_refactorings(
        document,
        span,
        &RefactoringSettings::new(),
        &CancellationToken::new(),
    )
    .expect("dispatch must not fail")
}

fn titles(actions: &[RefactoringAction]) -> Vec<&str> {
    actions.iter().map(|a| a.title()).collect()
}

#[test]
fn no_matching_rule_yields_empty_list() {
    let (src, span) = strip_caret_marker("class C { /*caret*/ }");
    let document = Document::new(FileId::new("Test.cs"), &src);
    assert_eq!(actions_at(&document, span).len(), 0);
}

#[test]
fn whole_file_selection_yields_empty_list() {
    let src = "class C { void M() { } }";
    let document = Document::new(FileId::new("Test.cs"), src);
    let span = TextRange::new(0, src.len());
    assert_eq!(actions_at(&document, span).len(), 0);
}

#[test]
fn general_category_fires_once_on_the_innermost_match() {
    // `b` sits inside two nested binary expressions; the Expression and
    // BinaryExpression categories each fire exactly once, on the nearest
    // matching ancestor.
    let (src, span) = strip_caret_marker(
        "class C { void M() { int r = a + /*caret*/b * c; } }",
    );
    let document = Document::new(FileId::new("Test.cs"), &src);
    let actions = actions_at(&document, span);

    let swaps: Vec<&RefactoringAction> = actions
        .iter()
        .filter(|a| a.id() == RefactoringId::SwapBinaryOperands)
        .collect();
    assert_eq!(swaps.len(), 1, "swap must fire once: {:?}", titles(&actions));

    // The innermost binary expression (`b * c`) is the one that fired.
    let after = onyx_refactor::execute(swaps[0], &document, &CancellationToken::new())
        .unwrap()
        .text();
    assert_eq!(after, "class C { void M() { int r = a + c * b; } }");
}

#[test]
fn action_order_is_token_pass_then_node_pass_in_ancestor_order() {
    let (src, span) = strip_caret_marker(
        r#"class C
{
    void M(int x)
    {
        if (x /*caret*/== 1)
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
    );
    let document = Document::new(FileId::new("Test.cs"), &src);
    let actions = actions_at(&document, span);

    assert_eq!(
        titles(&actions),
        vec!["Negate operator", "Swap operands", "Invert if"]
    );
}

#[test]
fn semantic_rules_are_skipped_without_a_semantic_model() {
    let (src, span) =
        strip_caret_marker("class C { void M(string /*caret*/name) { Use(name); } }");

    let with_model = Document::new(FileId::new("Test.cs"), &src);
    let actions = actions_at(&with_model, span);
    assert!(
        actions
            .iter()
            .any(|a| a.id() == RefactoringId::AddParameterNullCheck),
        "expected a null-check action: {:?}",
        titles(&actions)
    );

    // Degradation is graceful: the semantic rule is skipped, nothing fails.
    let without_model = Document::new(FileId::new("Test.cs"), &src).without_semantic_model();
    let actions = actions_at(&without_model, span);
    assert!(actions
        .iter()
        .all(|a| a.id() != RefactoringId::AddParameterNullCheck));
}

#[test]
fn disabled_rules_do_not_fire() {
    let (src, span) =
        strip_caret_marker("class C { void M() { int r = a /*caret*/+ b; } }");
    let document = Document::new(FileId::new("Test.cs"), &src);

    let mut settings = RefactoringSettings::new();
    settings.disable(RefactoringId::SwapBinaryOperands);
    let actions = compute_refactorings(
        &document,
        span,
        &settings,
        &CancellationToken::new(),
    )
    .unwrap();
    assert!(actions
        .iter()
        .all(|a| a.id() != RefactoringId::SwapBinaryOperands));
}

#[test]
fn dispatch_is_repeatable_with_identical_results() {
    // Predicate evaluation has no observable side effects: running the same
    // request twice yields the same actions in the same order.
    let (src, span) = strip_caret_marker(
        "class C { void M(int x) { if (x /*caret*/== 1) { A(); } else { B(); } } }",
    );
    let document = Document::new(FileId::new("Test.cs"), &src);

    let first = actions_at(&document, span);
    let second = actions_at(&document, span);
    assert_eq!(titles(&first), titles(&second));
}

#[test]
fn equivalence_keys_are_stable_identifiers() {
    let (src, span) =
        strip_caret_marker("class C { void M() { int r = a /*caret*/== b; } }");
    let document = Document::new(FileId::new("Test.cs"), &src);
    let actions = actions_at(&document, span);

    let negate = actions
        .iter()
        .find(|a| a.id() == RefactoringId::NegateOperator)
        .unwrap();
    assert_eq!(negate.equivalence_key(), Some("onyx.negateOperator"));
}

#[test]
fn stale_snapshot_fails_only_the_applied_action() {
    let (src, span) =
        strip_caret_marker("class C { void M() { int r = a /*caret*/== b; } }");
    let document = Document::new(FileId::new("Test.cs"), &src);
    let actions = actions_at(&document, span);
    let negate = actions
        .iter()
        .find(|a| a.id() == RefactoringId::NegateOperator)
        .unwrap();

    // Applying against a different snapshot surfaces a stale failure and
    // leaves the snapshot untouched.
    let other = Document::new(FileId::new("Test.cs"), "class D { }");
    let result = onyx_refactor::execute(negate, &other, &CancellationToken::new());
    assert!(matches!(result, Err(onyx_refactor::ApplyError::Stale)));
    assert_eq!(other.text(), "class D { }");
}
