//! Shell builtins that work on the file store and the transfer collaborator.
//!
//! Each function validates its own argument count, prints a single `Syntax:` line on
//! mismatch and returns without touching anything. Store and network failures are
//! reported on the console with the path involved and never abort the shell.

use alloc::string::String;

use super::io::CharStream;
use crate::config::Config;
use crate::network::transfer::Transfer;
use crate::storage::{self, FileStore};

const CHUNK: usize = 64;

/// Usage lines for the store builtins, as listed by `help`.
pub(crate) const STORE_USAGE: &str = "  appendTo fn text text text...
  cat fn
  echoTo fn text text text...
  cp f f... fdest
  ed [filename]
  mv fold fnew
  format
  ls
  rm fil fil...
";

/// Usage lines for the network builtins, as listed by `help`.
pub(crate) const TRANSFER_USAGE: &str = "  get remotefn localfn
  put localfn remotefn
  reflash [fn]
";

/// Run a store builtin. Returns `false` if `argv[0]` is not one.
pub(crate) fn run_store_command<F, S>(store: &mut F, argv: &[String], io: &mut S) -> bool
where
    F: FileStore,
    S: CharStream + ?Sized,
{
    let Some((command, args)) = argv.split_first() else {
        return false;
    };
    match command.as_str() {
        "ls" => ls(store, io),
        "cat" => match args {
            [path] => cat(store, path, io),
            _ => io.write_str("Syntax: cat fn\n"),
        },
        "echoTo" => match args {
            [path, texts @ ..] => echo_to(store, path, texts, io),
            [] => io.write_str("Syntax: echoTo fn text text text...\n"),
        },
        "appendTo" => match args {
            [path, texts @ ..] => append_to(store, path, texts, io),
            [] => io.write_str("Syntax: appendTo fn text text text...\n"),
        },
        "cp" => match args {
            [sources @ .., dest] if !sources.is_empty() => cp(store, sources, dest, io),
            _ => io.write_str("Syntax: cp f f... fdest\n"),
        },
        "mv" => match args {
            [from, to] => mv(store, from, to, io),
            _ => io.write_str("Syntax: mv fold fnew\n"),
        },
        "rm" => {
            if args.is_empty() {
                io.write_str("Syntax: rm fil fil...\n");
            }
            for path in args {
                rm(store, path, io);
            }
        }
        "format" => {
            if store.format().is_err() {
                io.write_str("Format failed.\n");
            }
        }
        _ => return false,
    }
    true
}

/// Run a network builtin. Returns `false` if `argv[0]` is not one that can run with
/// the collaborators at hand (`get` and `put` need a store).
pub(crate) fn run_transfer_command<N, F, S>(
    transfer: &mut N,
    store: Option<&mut F>,
    config: &Config,
    argv: &[String],
    io: &mut S,
) -> bool
where
    N: Transfer,
    F: FileStore,
    S: CharStream + ?Sized,
{
    let Some((command, args)) = argv.split_first() else {
        return false;
    };
    match (command.as_str(), store) {
        ("get", Some(store)) => match args {
            [remote, local] => {
                let remote = storage::absolute(remote);
                writeln!(io, "Fetching file [{}]", remote);
                match transfer.get(store, &remote, local) {
                    Ok(bytes) => writeln!(io, "Saved {} bytes to [{}]", bytes, storage::absolute(local)),
                    Err(err) => writeln!(io, "{}", err),
                }
            }
            _ => io.write_str("Syntax: get remotefn localfn\n"),
        },
        ("put", Some(store)) => match args {
            [local, remote] => {
                let remote = storage::absolute(remote);
                writeln!(io, "Putting [{}] to remote file: [{}]", local, remote);
                match transfer.put(store, local, &remote) {
                    Ok(bytes) => writeln!(io, "Sent {} bytes.", bytes),
                    Err(err) => writeln!(io, "{}", err),
                }
            }
            _ => io.write_str("Syntax: put localfn remotefn\n"),
        },
        ("reflash", _) => {
            let remote = match args {
                [] => storage::absolute(&config.firmware_path),
                [remote] => storage::absolute(remote),
                _ => {
                    io.write_str("Syntax: reflash [fn]\n");
                    return true;
                }
            };
            writeln!(io, "Loading image [{}]", remote);
            match transfer.reflash(&remote) {
                Ok(image) => writeln!(
                    io,
                    "Image loaded successfully. {} bytes, CRC32 {:08x}.",
                    image.size, image.checksum
                ),
                Err(err) => writeln!(io, "Image load failed. {}", err),
            }
        }
        _ => return false,
    }
    true
}

fn ls<F: FileStore, S: CharStream + ?Sized>(store: &mut F, io: &mut S) {
    io.write_str("/ (DIR)\n");
    let listed = store.list(&mut |path, size| {
        writeln!(io, "  {}  {}", path.trim_start_matches('/'), size);
    });
    if listed.is_err() {
        io.write_str("Can't list [/]\n");
    }
}

fn cat<F: FileStore, S: CharStream + ?Sized>(store: &mut F, path: &str, io: &mut S) {
    let path = storage::absolute(path);
    let Ok(mut handle) = store.open_read(&path) else {
        writeln!(io, "Can't open [{}]", path);
        return;
    };
    let mut chunk = [0u8; CHUNK];
    loop {
        let mut n = 0;
        while n < CHUNK {
            let Some(byte) = store.read_byte(&mut handle) else {
                break;
            };
            chunk[n] = byte;
            n += 1;
        }
        if n == 0 {
            break;
        }
        io.write_bytes(&chunk[..n]);
    }
    store.close(handle);
}

fn echo_to<F, S>(store: &mut F, path: &str, texts: &[String], io: &mut S)
where
    F: FileStore,
    S: CharStream + ?Sized,
{
    let path = storage::absolute(path);
    // A missing file is fine here; it is about to be created.
    let _ = store.remove(&path);
    match store.open_write(&path) {
        Ok(handle) => write_lines(store, handle, &path, texts, io),
        Err(_) => writeln!(io, "Can't open [{}]", path),
    }
}

fn append_to<F, S>(store: &mut F, path: &str, texts: &[String], io: &mut S)
where
    F: FileStore,
    S: CharStream + ?Sized,
{
    let path = storage::absolute(path);
    match store.open_append(&path) {
        Ok(handle) => write_lines(store, handle, &path, texts, io),
        Err(_) => writeln!(io, "Can't open [{}]", path),
    }
}

fn write_lines<F, S>(store: &mut F, mut handle: F::Handle, path: &str, texts: &[String], io: &mut S)
where
    F: FileStore,
    S: CharStream + ?Sized,
{
    let written = texts
        .iter()
        .try_for_each(|text| store.write_line(&mut handle, text));
    store.close(handle);
    if written.is_err() {
        writeln!(io, "Can't write [{}]", path);
    }
}

fn cp<F, S>(store: &mut F, sources: &[String], dest: &str, io: &mut S)
where
    F: FileStore,
    S: CharStream + ?Sized,
{
    let dest = storage::absolute(dest);
    let Ok(mut out) = store.open_write(&dest) else {
        writeln!(io, "Can't open [{}]", dest);
        return;
    };
    for source in sources {
        let source = storage::absolute(source);
        let Ok(mut input) = store.open_read(&source) else {
            writeln!(io, "Can't open [{}]", source);
            continue;
        };
        let mut chunk = [0u8; CHUNK];
        let mut failed = false;
        loop {
            let mut n = 0;
            while n < CHUNK {
                let Some(byte) = store.read_byte(&mut input) else {
                    break;
                };
                chunk[n] = byte;
                n += 1;
            }
            if n == 0 {
                break;
            }
            if store.write(&mut out, &chunk[..n]).is_err() {
                failed = true;
                break;
            }
        }
        store.close(input);
        if failed {
            writeln!(io, "Can't write [{}]", dest);
            break;
        }
    }
    store.close(out);
}

fn mv<F: FileStore, S: CharStream + ?Sized>(store: &mut F, from: &str, to: &str, io: &mut S) {
    let from = storage::absolute(from);
    let to = storage::absolute(to);
    if store.rename(&from, &to).is_err() {
        writeln!(io, "Can't rename [{}] to [{}]", from, to);
    }
}

fn rm<F: FileStore, S: CharStream + ?Sized>(store: &mut F, path: &str, io: &mut S) {
    let path = storage::absolute(path);
    if store.remove(&path).is_err() {
        writeln!(io, "Can't remove [{}]", path);
    }
}
