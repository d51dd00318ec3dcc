use std::hint::black_box;

use criterion::{Criterion, Throughput};
use tasksh::editor::Session;
use tasksh::storage::ram::RamFs;
use tasksh::system::io::CharStream;
use tasksh::system::tokenizer::tokenize;

struct Discard;

impl CharStream for Discard {
    fn try_read_byte(&mut self) -> Option<u8> {
        None
    }

    fn write_bytes(&mut self, _bytes: &[u8]) {}
}

const LINES: usize = 200;

fn session() -> (Session, RamFs) {
    let mut fs = RamFs::new();
    let body: String = (0..LINES)
        .map(|n| format!("line {n}: foo bar foo baz foo\n"))
        .collect();
    fs.insert("/doc", body.as_bytes());
    let mut session = Session::new();
    session.load(&mut fs, "doc").expect("Failed to load document");
    (session, fs)
}

pub fn bench_substitute_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("substitute_all");
    group.throughput(Throughput::Elements(LINES as u64));
    let argv = tokenize("sa foo quux");
    group.bench_function("whole_document", |b| {
        b.iter_batched_ref(
            session,
            |(session, fs)| {
                let _ = session.execute(black_box(&argv), &mut Discard, fs);
            },
            criterion::BatchSize::SmallInput,
        )
    });
    group.finish();
}

pub fn bench_delete_and_undo(c: &mut Criterion) {
    let mut group = c.benchmark_group("delete_and_undo");
    group.throughput(Throughput::Elements(LINES as u64));
    let delete = tokenize("d 10 150");
    let undo = tokenize("u");
    group.bench_function("snapshot_restore", |b| {
        b.iter_batched_ref(
            session,
            |(session, fs)| {
                let _ = session.execute(&delete, &mut Discard, fs);
                let _ = session.execute(&undo, &mut Discard, fs);
            },
            criterion::BatchSize::SmallInput,
        )
    });
    group.finish();
}
