use criterion::{criterion_group, criterion_main};

mod editor;
mod system;

criterion_group!(
    benches,
    system::bench_tokenize,
    system::bench_shell_lines,
    editor::bench_substitute_all,
    editor::bench_delete_and_undo
);
criterion_main!(benches);
