mod common;

use core::task::Poll;

use common::Console;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tasksh::editor::document::{Cursor, Document};
use tasksh::editor::{Editor, Session};
use tasksh::storage::ram::RamFs;
use tasksh::system::readline::LineReader;
use tasksh::system::tokenizer::tokenize;

/// Editor plus everything it borrows while running.
struct Bench {
    editor: Editor,
    reader: LineReader,
    fs: RamFs,
}

impl Bench {
    fn empty() -> Self {
        Self::open(RamFs::new(), &[])
    }

    fn with_file(lines: &[String]) -> Self {
        let mut fs = RamFs::new();
        let mut body = String::new();
        for line in lines {
            body.push_str(line);
            body.push('\n');
        }
        fs.insert("/doc", body.as_bytes());
        Self::open(fs, &[String::from("doc")])
    }

    fn open(mut fs: RamFs, argv: &[String]) -> Self {
        let mut editor = Editor::new();
        let mut io = Console::default();
        editor.open(argv, &mut io, &mut fs);

        let mut reader = LineReader::new();
        reader.set_echo(false);
        Self { editor, reader, fs }
    }

    fn send(&mut self, input: &str) -> (Poll<()>, String) {
        let mut io = Console::new(input);
        let poll = self.editor.poll(&mut self.reader, &mut io, &mut self.fs);
        (poll, io.take_output())
    }

    fn session(&self) -> &Session {
        self.editor.session()
    }

    fn lines(&self) -> Vec<&str> {
        self.session()
            .document()
            .lines()
            .iter()
            .map(String::as_str)
            .collect()
    }
}

fn random_lines(rng: &mut StdRng, count: usize) -> Vec<String> {
    let words = ["foo", "bar", "baz", "foo foo", "qux", ""];
    (0..count)
        .map(|n| format!("{} {}", words[rng.gen_range(0..words.len())], n))
        .collect()
}

#[test]
fn test_insert_list_delete() {
    let mut bench = Bench::empty();

    let (poll, _) = bench.send("ib\r\none\r\ntwo\r\n.\r\n");
    assert_eq!(poll, Poll::Pending);
    assert_eq!(bench.lines(), ["one", "two"]);
    assert_eq!(bench.session().document().cursor(), Cursor::Line(1));

    let (_, output) = bench.send("ta\r\n");
    assert_eq!(output, "*001: one\n 002: two\ned: ");

    bench.send("d 1 1\r\n");
    assert_eq!(bench.lines(), ["two"]);
    assert_eq!(bench.session().paste_buffer().lines(), ["one"]);
    assert_eq!(bench.session().document().cursor(), Cursor::Line(1));
}

#[test]
fn test_acquisition_spans_ticks() {
    let mut bench = Bench::with_file(&[String::from("a")]);
    bench.send("ia\r\nhalf");
    assert_eq!(bench.lines(), ["a"]);

    bench.send(" line\r\n..dot\r\n.\r\n");
    assert_eq!(bench.lines(), ["a", "half line", ".dot"]);
    assert_eq!(bench.session().document().cursor(), Cursor::Line(2));
    assert!(bench.session().is_modified());
}

#[test]
fn test_substitute_first_or_all() {
    let mut bench = Bench::with_file(&[String::from("foo foo")]);
    bench.send("s foo bar 1 1\r\n");
    assert_eq!(bench.lines(), ["bar foo"]);

    bench.send("u\r\nsa foo bar 1 1\r\n");
    assert_eq!(bench.lines(), ["bar bar"]);
}

#[test]
fn test_write_then_quit() {
    let mut bench = Bench::with_file(&[String::from("keep")]);
    bench.send("ia 1\r\nmore\r\n.\r\n");
    let (poll, _) = bench.send("w\r\nq\r\n");
    assert_eq!(poll, Poll::Ready(()));
    assert_eq!(bench.fs.contents("/doc"), Some(&b"keep\nmore\n"[..]));

    // Quitting clears the session for the next `ed`.
    assert!(bench.session().document().is_empty());
    assert_eq!(bench.session().filename(), "");
}

#[test]
fn test_failed_read_keeps_document() {
    let mut bench = Bench::with_file(&[String::from("original")]);
    let (_, output) = bench.send("r missing\r\n");
    assert!(output.contains("Can't read file"));
    assert_eq!(bench.lines(), ["original"]);
    assert_eq!(bench.session().filename(), "doc");
}

#[test]
fn test_undo_restores_any_mutation() {
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for _ in 0..200 {
        let count = rng.gen_range(1..=8);
        let lines = random_lines(&mut rng, count);
        let mut session = Session::new();
        let mut fs = RamFs::new();
        let mut io = Console::default();

        let mut body = lines.join("\n");
        body.push('\n');
        fs.insert("/doc", body.as_bytes());
        session.load(&mut fs, "doc").unwrap();

        let a = rng.gen_range(1..=count);
        let b = rng.gen_range(1..=count);
        let setup = [format!("g {a}"), format!("c {a} {b}")];
        for line in &setup {
            session.execute(&tokenize(line), &mut io, &mut fs).unwrap();
        }

        let command = match rng.gen_range(0..5) {
            0 => format!("d {a} {b}"),
            1 => format!("s foo X {a} {b}"),
            2 => format!("sa o 00 {a} {b}"),
            3 => format!("pa {a}"),
            _ => format!("pb {b}"),
        };
        let before: Document = session.document().clone();
        let paste_before = session.paste_buffer().lines().to_vec();

        // A miss on `s` reports an error after its snapshot; either way `u` must restore.
        let _ = session.execute(&tokenize(&command), &mut io, &mut fs);
        session.execute(&tokenize("u"), &mut io, &mut fs).unwrap();
        assert_eq!(*session.document(), before, "after `{command}`");
        assert_eq!(session.paste_buffer().lines(), paste_before.as_slice());

        session.execute(&tokenize("u"), &mut io, &mut fs).unwrap();
        assert_eq!(*session.document(), before, "second undo after `{command}`");
    }
}

#[test]
fn test_insert_before_then_delete_is_identity() {
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..100 {
        let count = rng.gen_range(1..=6);
        let original = random_lines(&mut rng, count);
        let mut bench = Bench::with_file(&original);

        let at = rng.gen_range(1..=count + 1);
        let inserted = rng.gen_range(1..=4);
        let mut script = format!("ib {at}\r\n");
        for n in 0..inserted {
            script.push_str(&format!("new {n}\r\n"));
        }
        script.push_str(".\r\n");
        script.push_str(&format!("d {} {}\r\n", at, at + inserted - 1));
        bench.send(&script);

        assert_eq!(bench.session().document().lines(), original.as_slice());
    }
}
