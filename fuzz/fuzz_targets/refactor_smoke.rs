#![no_main]

use libfuzzer_sys::fuzz_target;
use onyx_refactor::{
    compute_refactorings, execute, CancellationToken, Document, FileId, RefactoringSettings,
    TextRange,
};

mod utils;

fuzz_target!(|data: &[u8]| {
    let Some(text) = utils::truncate_utf8(data) else {
        return;
    };

    let document = Document::new(FileId::new("Fuzz.cs"), text);
    let settings = RefactoringSettings::new();
    let cancellation = CancellationToken::new();

    // Dispatch at every line start: cheap coverage of cursor positions.
    // Refactoring errors are expected; panics and hangs are not.
    let offsets = std::iter::once(0).chain(
        text.char_indices()
            .filter(|(_, c)| *c == '\n')
            .map(|(i, _)| (i + 1).min(text.len())),
    );
    for offset in offsets {
        let Ok(actions) = compute_refactorings(
            &document,
            TextRange::new(offset, offset),
            &settings,
            &cancellation,
        ) else {
            continue;
        };

        for action in &actions {
            // Applying an action must either succeed with a parseable
            // successor snapshot or fail cleanly.
            if let Ok(after) = execute(action, &document, &cancellation) {
                let _ = after.text();
            }
        }
    }
});
