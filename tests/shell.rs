mod common;

use core::sync::atomic::{AtomicBool, Ordering};
use core::task::Poll;

use common::Console;
use tasksh::config::{MAX_COMMAND_LEN, MAX_COMMANDS};
use tasksh::network::transfer::{Error as TransferError, Transfer};
use tasksh::ota::Image;
use tasksh::storage::ram::RamFs;
use tasksh::storage::{self, FileStore};
use tasksh::system::io::CharStream;
use tasksh::system::registry::{CommandTask, ShellResult};
use tasksh::system::shell::{Shell, Unconfigured};

fn hello(argv: &[String], io: &mut dyn CharStream) -> Poll<()> {
    writeln!(io, "Hello, {}!", argv.get(1).map_or("World", String::as_str));
    Poll::Ready(())
}

fn goodbye(_argv: &[String], io: &mut dyn CharStream) -> Poll<()> {
    io.write_str("Goodbye\n");
    Poll::Ready(())
}

fn args(argv: &[String], io: &mut dyn CharStream) -> Poll<()> {
    writeln!(io, "{}", argv.join("|"));
    Poll::Ready(())
}

/// Finishes on its third poll.
struct Countdown {
    left: u8,
}

impl CommandTask for Countdown {
    fn poll(&mut self, _argv: &[String], io: &mut dyn CharStream) -> Poll<()> {
        if self.left > 0 {
            self.left -= 1;
            return Poll::Pending;
        }
        self.left = 2;
        io.write_str("done\n");
        Poll::Ready(())
    }
}

fn shell_with(files: &[(&str, &str)]) -> Shell<RamFs> {
    let mut fs = RamFs::new();
    for (path, body) in files {
        fs.insert(path, body.as_bytes());
    }
    let mut shell = Shell::new().with_store(fs);
    shell.set_echo(false);
    shell
}

fn run<F: FileStore, N: Transfer>(shell: &mut Shell<F, N>, input: &str) -> String {
    let mut io = Console::new(input);
    shell.tick(&mut io);
    io.take_output()
}

fn contents(shell: &Shell<RamFs>, path: &str) -> Option<String> {
    shell
        .store()
        .and_then(|fs| fs.contents(path))
        .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
}

#[test]
fn test_registered_command() {
    let mut shell = shell_with(&[]);
    assert_eq!(shell.register(1, "hello", hello), ShellResult::Ok);

    let output = run(&mut shell, "hello\r\nhello rust\r\n");
    assert_eq!(output, "cmd: Hello, World!\ncmd: Hello, rust!\ncmd: ");
}

#[test]
fn test_arguments_are_tokenized() {
    let mut shell = shell_with(&[]);
    shell.register(1, "args", args);

    let output = run(&mut shell, "args  one \"two three\"\r\n");
    assert_eq!(output, "cmd: args|one|two three\ncmd: ");
}

#[test]
fn test_empty_line_reprompts() {
    let mut shell = shell_with(&[]);
    assert_eq!(run(&mut shell, "\r\n   \r\n"), "cmd: cmd: cmd: ");
}

#[test]
fn test_invalid_command() {
    let mut shell = shell_with(&[]);
    assert_eq!(run(&mut shell, "bogus\r\n"), "cmd: Invalid command.\ncmd: ");
}

#[test]
fn test_lookup_is_exact() {
    let mut shell = shell_with(&[]);
    shell.register(1, "hello", hello);
    assert_eq!(
        run(&mut shell, "Hello\r\nhell\r\n"),
        "cmd: Invalid command.\ncmd: Invalid command.\ncmd: "
    );
}

#[test]
fn test_first_registration_wins() {
    let mut shell = shell_with(&[]);
    assert_eq!(shell.register(1, "greet", hello), ShellResult::Ok);
    assert_eq!(shell.register(2, "greet", goodbye), ShellResult::Ok);
    assert_eq!(run(&mut shell, "greet\r\n"), "cmd: Hello, World!\ncmd: ");
}

#[test]
fn test_registered_command_shadows_builtin() {
    let mut shell = shell_with(&[]);
    shell.register(1, "ls", goodbye);
    assert_eq!(run(&mut shell, "ls\r\n"), "cmd: Goodbye\ncmd: ");
}

#[test]
fn test_registration_limits() {
    let mut shell = Shell::new();
    assert_eq!(shell.register(1, "", hello), ShellResult::InvalidParameter);

    let too_long = "n".repeat(MAX_COMMAND_LEN + 1);
    assert_eq!(shell.register(1, &too_long, hello), ShellResult::NameTooLong);
    let longest = "n".repeat(MAX_COMMAND_LEN);
    assert_eq!(shell.register(1, &longest, hello), ShellResult::Ok);

    for n in 1..MAX_COMMANDS {
        assert_eq!(shell.register(n as u8, &format!("c{n}"), hello), ShellResult::Ok);
    }
    assert_eq!(shell.registry().len(), MAX_COMMANDS);
    assert_eq!(shell.register(99, "extra", hello), ShellResult::Full);
}

#[test]
fn test_pending_command_holds_the_console() {
    let mut shell = shell_with(&[]);
    shell.register(7, "wait", Countdown { left: 2 });

    let mut io = Console::new("wait\r\nbogus\r\n");
    shell.tick(&mut io);
    assert_eq!(io.take_output(), "cmd: ");
    assert!(io.has_input());

    shell.tick(&mut io);
    assert_eq!(io.take_output(), "");

    shell.tick(&mut io);
    assert_eq!(io.take_output(), "done\ncmd: Invalid command.\ncmd: ");
}

#[test]
fn test_poll_never_completes() {
    let mut shell = shell_with(&[]);
    let mut io = Console::new("ls\r\n");
    assert_eq!(shell.poll(&mut io), Poll::Pending);
    assert_eq!(shell.poll(&mut io), Poll::Pending);
}

#[test]
fn test_help_lists_commands() {
    let mut shell = shell_with(&[]);
    shell.register(1, "hello", hello);

    let output = run(&mut shell, "help\r\n");
    assert!(output.starts_with("cmd:   hello\n  help\n  reboot\n"));
    assert!(output.contains("  cat fn\n"));
    assert!(output.contains("  ed [filename]\n"));
    assert!(!output.contains("reflash"));
}

static REBOOTED: AtomicBool = AtomicBool::new(false);

fn reboot() {
    REBOOTED.store(true, Ordering::SeqCst);
}

#[test]
fn test_reboot_calls_hook() {
    let mut shell = shell_with(&[]);
    shell.set_reboot_function(reboot);

    assert_eq!(run(&mut shell, "reboot now\r\n"), "cmd: Syntax: reboot\ncmd: ");
    assert!(!REBOOTED.load(Ordering::SeqCst));

    assert_eq!(run(&mut shell, "reboot\r\n"), "Rebooting...\ncmd: ");
    assert!(REBOOTED.load(Ordering::SeqCst));
}

#[test]
fn test_echo() {
    let mut shell = shell_with(&[]);
    shell.set_echo(true);
    assert_eq!(run(&mut shell, "bogus\r\n"), "cmd: bogus\nInvalid command.\ncmd: ");
}

#[test]
fn test_store_builtins_need_a_store() {
    let mut shell: Shell<Unconfigured, Unconfigured> = Shell::new();
    shell.set_echo(false);
    let output = run(&mut shell, "ls\r\ned notes\r\n");
    assert_eq!(output, "cmd: Invalid command.\ncmd: Invalid command.\ncmd: ");
}

#[test]
fn test_ls() {
    let mut shell = shell_with(&[("/a.txt", "12"), ("/b.txt", "")]);
    assert_eq!(run(&mut shell, "ls\r\n"), "cmd: / (DIR)\n  a.txt  2\n  b.txt  0\ncmd: ");
}

#[test]
fn test_cat() {
    let mut shell = shell_with(&[("/notes", "one\ntwo\n")]);
    assert_eq!(run(&mut shell, "cat notes\r\n"), "cmd: one\ntwo\ncmd: ");
    assert_eq!(run(&mut shell, "cat /notes\r\n"), "one\ntwo\ncmd: ");
    assert_eq!(run(&mut shell, "cat missing\r\n"), "Can't open [/missing]\ncmd: ");
    assert_eq!(run(&mut shell, "cat\r\n"), "Syntax: cat fn\ncmd: ");
}

#[test]
fn test_echo_to_replaces_and_append_to_extends() {
    let mut shell = shell_with(&[("/notes", "old\n")]);

    run(&mut shell, "echoTo notes \"hello world\" second\r\n");
    assert_eq!(contents(&shell, "/notes").as_deref(), Some("hello world\nsecond\n"));

    run(&mut shell, "appendTo notes third\r\n");
    assert_eq!(contents(&shell, "/notes").as_deref(), Some("hello world\nsecond\nthird\n"));

    run(&mut shell, "appendTo fresh only\r\n");
    assert_eq!(contents(&shell, "/fresh").as_deref(), Some("only\n"));

    assert_eq!(
        run(&mut shell, "echoTo\r\n"),
        "Syntax: echoTo fn text text text...\ncmd: "
    );
}

#[test]
fn test_echo_to_without_text_truncates() {
    let mut shell = shell_with(&[("/notes", "old\n")]);
    run(&mut shell, "echoTo notes\r\n");
    assert_eq!(contents(&shell, "/notes").as_deref(), Some(""));
}

#[test]
fn test_cp_concatenates_sources() {
    let mut shell = shell_with(&[("/a", "1\n"), ("/b", "2\n")]);
    let output = run(&mut shell, "cp a zz b c\r\n");
    assert_eq!(output, "cmd: Can't open [/zz]\ncmd: ");
    assert_eq!(contents(&shell, "/c").as_deref(), Some("1\n2\n"));
    assert_eq!(run(&mut shell, "cp a\r\n"), "Syntax: cp f f... fdest\ncmd: ");
}

#[test]
fn test_mv() {
    let mut shell = shell_with(&[("/a", "1\n")]);
    assert_eq!(run(&mut shell, "mv a z\r\n"), "cmd: cmd: ");
    assert_eq!(contents(&shell, "/a"), None);
    assert_eq!(contents(&shell, "/z").as_deref(), Some("1\n"));

    assert_eq!(run(&mut shell, "mv q r\r\n"), "Can't rename [/q] to [/r]\ncmd: ");
    assert_eq!(run(&mut shell, "mv a\r\n"), "Syntax: mv fold fnew\ncmd: ");
}

#[test]
fn test_rm_and_format() {
    let mut shell = shell_with(&[("/a", "1"), ("/b", "2"), ("/c", "3")]);
    assert_eq!(run(&mut shell, "rm a nope\r\n"), "cmd: Can't remove [/nope]\ncmd: ");
    assert_eq!(contents(&shell, "/a"), None);
    assert_eq!(run(&mut shell, "rm\r\n"), "Syntax: rm fil fil...\ncmd: ");

    run(&mut shell, "format\r\n");
    assert!(shell.store().is_some_and(RamFs::is_empty));
}

#[test]
fn test_ed_edits_and_returns_to_shell() {
    let mut shell = shell_with(&[]);
    let output = run(
        &mut shell,
        "ed notes\r\nia\r\nline one\r\n.\r\nw notes\r\nq\r\ncat notes\r\n",
    );
    assert!(output.contains("Can't read file"));
    assert!(output.ends_with("cmd: line one\ncmd: "));
    assert!(!shell.is_editing());
    assert_eq!(contents(&shell, "/notes").as_deref(), Some("line one\n"));
}

#[test]
fn test_ed_loads_existing_file() {
    let mut shell = shell_with(&[("/todo", "a\nb\n")]);
    let output = run(&mut shell, "ed todo\r\nt 1 2\r\n");
    assert_eq!(output, "cmd: ed: *001: a\n 002: b\ned: ");
    assert!(shell.is_editing());
    assert_eq!(shell.editor().session().filename(), "todo");
}

#[test]
fn test_ed_syntax() {
    let mut shell = shell_with(&[]);
    assert_eq!(run(&mut shell, "ed a b\r\n"), "cmd: Syntax: ed [filename]\ncmd: ");
    assert_eq!(run(&mut shell, "ed \"\"\r\n"), "Syntax: ed [filename]\ncmd: ");
    assert!(!shell.is_editing());
}

#[test]
fn test_crlf_split_between_shell_and_editor() {
    let mut shell = shell_with(&[]);
    let mut io = Console::new("ed\r");
    shell.tick(&mut io);
    assert_eq!(io.take_output(), "cmd: ed: ");
    assert!(shell.is_editing());

    io.feed("\nq\r\n");
    shell.tick(&mut io);
    assert_eq!(io.take_output(), "cmd: ");
    assert!(!shell.is_editing());
}

/// Transfer double that serves fixed bytes and records uploads.
#[derive(Default)]
struct FakeTransfer {
    body: Vec<u8>,
    uploads: Vec<(String, String)>,
    fail: bool,
}

impl Transfer for FakeTransfer {
    fn get<F: FileStore>(
        &mut self,
        store: &mut F,
        _remote: &str,
        local: &str,
    ) -> Result<usize, TransferError> {
        if self.fail {
            return Err(TransferError::Status(404));
        }
        let mut handle = store.open_write(&storage::absolute(local))?;
        store.write(&mut handle, &self.body)?;
        store.close(handle);
        Ok(self.body.len())
    }

    fn put<F: FileStore>(
        &mut self,
        _store: &mut F,
        local: &str,
        remote: &str,
    ) -> Result<usize, TransferError> {
        self.uploads.push((local.to_string(), remote.to_string()));
        Ok(3)
    }

    fn reflash(&mut self, _remote: &str) -> Result<Image, TransferError> {
        if self.fail {
            return Err(TransferError::Connect);
        }
        Ok(Image {
            size: 4,
            checksum: 0xabcd,
        })
    }
}

fn networked(fail: bool) -> Shell<RamFs, FakeTransfer> {
    let transfer = FakeTransfer {
        body: b"fetched".to_vec(),
        fail,
        ..FakeTransfer::default()
    };
    let mut shell = Shell::new().with_store(RamFs::new()).with_transfer(transfer);
    shell.set_echo(false);
    shell
}

#[test]
fn test_get() {
    let mut shell = networked(false);
    let output = run(&mut shell, "get remote.txt local.txt\r\n");
    assert_eq!(
        output,
        "cmd: Fetching file [/remote.txt]\nSaved 7 bytes to [/local.txt]\ncmd: "
    );
    assert_eq!(contents_of(&shell, "/local.txt").as_deref(), Some("fetched"));
    assert_eq!(run(&mut shell, "get one\r\n"), "Syntax: get remotefn localfn\ncmd: ");
}

#[test]
fn test_get_failure_is_reported() {
    let mut shell = networked(true);
    let output = run(&mut shell, "get remote.txt local.txt\r\n");
    assert_eq!(output, "cmd: Fetching file [/remote.txt]\nServer replied 404.\ncmd: ");
}

#[test]
fn test_put() {
    let mut shell = networked(false);
    let output = run(&mut shell, "put notes up.txt\r\n");
    assert_eq!(
        output,
        "cmd: Putting [notes] to remote file: [/up.txt]\nSent 3 bytes.\ncmd: "
    );
}

#[test]
fn test_reflash_uses_configured_image() {
    let mut shell = networked(false);
    let output = run(&mut shell, "reflash\r\n");
    assert_eq!(
        output,
        "cmd: Loading image [/firmware.bin]\nImage loaded successfully. 4 bytes, CRC32 0000abcd.\ncmd: "
    );
    let output = run(&mut shell, "reflash other.bin\r\n");
    assert!(output.starts_with("Loading image [/other.bin]\n"));
    assert_eq!(run(&mut shell, "reflash a b\r\n"), "Syntax: reflash [fn]\ncmd: ");
}

#[test]
fn test_reflash_failure_is_reported() {
    let mut shell = networked(true);
    let output = run(&mut shell, "reflash\r\n");
    assert_eq!(
        output,
        "cmd: Loading image [/firmware.bin]\nImage load failed. Connect failure.\ncmd: "
    );
}

#[test]
fn test_help_lists_transfer_builtins() {
    let mut shell = networked(false);
    let output = run(&mut shell, "help\r\n");
    assert!(output.contains("  reboot\n  appendTo fn text text text...\n"));
    assert!(output.contains("  rm fil fil...\n  get remotefn localfn\n"));
    assert!(output.contains("  reflash [fn]\n"));
}

#[test]
fn test_get_and_put_need_a_store() {
    let mut shell = Shell::new().with_transfer(FakeTransfer::default());
    shell.set_echo(false);
    let output = run(&mut shell, "get a b\r\nput a b\r\n");
    assert_eq!(output, "cmd: Invalid command.\ncmd: Invalid command.\ncmd: ");
}

fn contents_of(shell: &Shell<RamFs, FakeTransfer>, path: &str) -> Option<String> {
    shell
        .store()
        .and_then(|fs| fs.contents(path))
        .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
}
