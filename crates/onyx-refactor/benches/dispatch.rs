use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use onyx_refactor::{
    compute_refactorings, execute, CancellationToken, Document, FileId, RefactoringId,
    RefactoringSettings, TextRange,
};

fn dispatch_fixture() -> String {
    let mut out = String::from("class DispatchFixture\n{\n");
    for i in 0..40u32 {
        out.push_str(&format!(
            "    int Method{i}(int x)\n    {{\n        switch (x)\n        {{\n            case 1:\n                A();\n                break;\n            default:\n                B();\n                break;\n        }}\n        return x + {i};\n    }}\n\n"
        ));
    }
    out.push_str("}\n");
    out
}

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");
    group.measurement_time(Duration::from_secs(2));
    group.warm_up_time(Duration::from_secs(1));
    group.sample_size(20);

    let fixture = dispatch_fixture();
    let settings = RefactoringSettings::new();

    group.bench_function("parse_document", |b| {
        b.iter(|| {
            let document = Document::new(FileId::new("Fixture.cs"), black_box(&fixture));
            black_box(document.root());
        });
    });

    group.bench_function("compute_refactorings_on_switch", |b| {
        let document = Document::new(FileId::new("Fixture.cs"), &fixture);
        let offset = fixture.find("switch").expect("fixture has a switch") + 1;
        let span = TextRange::new(offset, offset);

        b.iter(|| {
            let actions = compute_refactorings(
                black_box(&document),
                span,
                &settings,
                &CancellationToken::new(),
            )
            .expect("dispatch must not fail");
            black_box(actions.len());
        });
    });

    group.bench_function("apply_convert_switch_to_if", |b| {
        let document = Document::new(FileId::new("Fixture.cs"), &fixture);
        let offset = fixture.find("switch").expect("fixture has a switch") + 1;
        let span = TextRange::new(offset, offset);
        let actions = compute_refactorings(
            &document,
            span,
            &settings,
            &CancellationToken::new(),
        )
        .expect("dispatch must not fail");
        let action = actions
            .iter()
            .find(|a| a.id() == RefactoringId::ConvertSwitchToIf)
            .expect("fixture offers the switch conversion");

        b.iter(|| {
            let after = execute(action, &document, &CancellationToken::new())
                .expect("apply must succeed");
            black_box(after.text().len());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_dispatch);
criterion_main!(benches);
