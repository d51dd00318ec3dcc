use std::collections::VecDeque;
use std::hint::black_box;

use criterion::{Criterion, Throughput};
use tasksh::storage::ram::RamFs;
use tasksh::system::io::CharStream;
use tasksh::system::shell::Shell;
use tasksh::system::tokenizer::tokenize;

struct Loopback {
    input: VecDeque<u8>,
    written: usize,
}

impl CharStream for Loopback {
    fn try_read_byte(&mut self) -> Option<u8> {
        self.input.pop_front()
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        self.written += bytes.len();
    }
}

pub fn bench_tokenize(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenize");
    let line = r#"sa "old \"quoted\" text" replacement 1 200"#;
    group.throughput(Throughput::Bytes(line.len() as u64));
    group.bench_function("quoted_line", |b| b.iter(|| tokenize(black_box(line))));
    group.finish();
}

pub fn bench_shell_lines(c: &mut Criterion) {
    let mut group = c.benchmark_group("shell");
    let script = "echoTo notes one two three\r\nappendTo notes four\r\ncat notes\r\nls\r\nrm notes\r\n";
    group.throughput(Throughput::Bytes(script.len() as u64));
    group.bench_function("builtin_script", |b| {
        b.iter_batched_ref(
            || {
                let mut shell = Shell::new().with_store(RamFs::new());
                shell.set_echo(false);
                let io = Loopback {
                    input: script.bytes().collect(),
                    written: 0,
                };
                (shell, io)
            },
            |(shell, io)| {
                shell.tick(io);
                black_box(io.written);
            },
            criterion::BatchSize::SmallInput,
        )
    });
    group.finish();
}
