//! Text I/O - `print` and `input`
//!
//! Design: Output goes through the `Output` trait so callers can redirect
//! it (tests capture into a buffer). The default streams are per-thread
//! and replaceable; a `file` argument bypasses them and receives `write`
//! calls like any other runtime object.

use std::cell::RefCell;
use std::io::{self, BufRead, BufReader, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::errors::{Exception, RtResult};
use crate::logging::trace;
use crate::objects::{as_str, is_none, new_str, none, FuncArgs, ObjRef};
use crate::protocol;

/// Output target abstraction
pub trait Output {
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()>;

    #[inline]
    fn write_str(&mut self, s: &str) -> io::Result<()> {
        self.write_bytes(s.as_bytes())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<W: Write> Output for W {
    #[inline]
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.write_all(bytes)
    }

    fn flush(&mut self) -> io::Result<()> {
        Write::flush(self)
    }
}

thread_local! {
    static STDOUT: RefCell<Box<dyn Output>> = RefCell::new(Box::new(io::stdout()));
    static STDIN: RefCell<Box<dyn BufRead>> = RefCell::new(Box::new(BufReader::new(io::stdin())));
}

static STRIP_INPUT: AtomicBool = AtomicBool::new(true);

/// Replace this thread's default output, returning the previous one
pub fn set_output(output: Box<dyn Output>) -> Box<dyn Output> {
    trace!(event = "set_output", "default output replaced");
    STDOUT.with(|out| std::mem::replace(&mut *out.borrow_mut(), output))
}

/// Replace this thread's default input, returning the previous one
pub fn set_input(input: Box<dyn BufRead>) -> Box<dyn BufRead> {
    trace!(event = "set_input", "default input replaced");
    STDIN.with(|stdin| std::mem::replace(&mut *stdin.borrow_mut(), input))
}

/// Whether `input()` strips all trailing whitespace or only the line break
pub fn set_strip_input(strip: bool) {
    STRIP_INPUT.store(strip, Ordering::Relaxed);
}

fn separator(value: Option<ObjRef>, name: &str, default: &str) -> RtResult<String> {
    match value {
        None => Ok(default.to_string()),
        Some(v) if is_none(&v) => Ok(default.to_string()),
        Some(v) => as_str(&v).map(str::to_string).ok_or_else(|| {
            Exception::type_error(format!(
                "{} must be None or a string, not {}",
                name,
                v.type_name()
            ))
        }),
    }
}

/// The `str()` of each object joined by `sep`, followed by `end`
pub fn format_print(objects: &[ObjRef], sep: &str, end: &str) -> RtResult<String> {
    let parts = objects
        .iter()
        .map(protocol::to_str)
        .collect::<RtResult<Vec<_>>>()?;
    let mut text = parts.join(sep);
    text.push_str(end);
    Ok(text)
}

/// Print to an explicit output
pub fn print_to(out: &mut dyn Output, objects: &[ObjRef], sep: &str, end: &str) -> RtResult<()> {
    let text = format_print(objects, sep, end)?;
    out.write_str(&text)?;
    Ok(())
}

/// Print to this thread's default output
pub fn print(objects: &[ObjRef], sep: &str, end: &str) -> RtResult<()> {
    let text = format_print(objects, sep, end)?;
    STDOUT.with(|out| out.borrow_mut().write_str(&text))?;
    Ok(())
}

/// Drop the line break, or all trailing whitespace when `strip` is set
fn trim_line(mut line: String, strip: bool) -> String {
    if strip {
        line.truncate(line.trim_end().len());
    } else {
        if line.ends_with('\n') {
            line.pop();
        }
        if line.ends_with('\r') {
            line.pop();
        }
    }
    line
}

/// Write `prompt`, then read one line
pub fn input_from(
    reader: &mut dyn BufRead,
    out: &mut dyn Output,
    prompt: Option<&ObjRef>,
) -> RtResult<String> {
    if let Some(prompt) = prompt {
        out.write_str(&protocol::to_str(prompt)?)?;
        out.flush()?;
    }
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Err(Exception::eof("EOF when reading a line"));
    }
    Ok(trim_line(line, STRIP_INPUT.load(Ordering::Relaxed)))
}

/// Read one line from this thread's default input
pub fn input(prompt: Option<&ObjRef>) -> RtResult<String> {
    let prompt = prompt.map(protocol::to_str).transpose()?;
    if let Some(prompt) = prompt {
        STDOUT.with(|out| {
            let mut out = out.borrow_mut();
            out.write_str(&prompt)?;
            out.flush()
        })?;
    }
    let mut line = String::new();
    let read = STDIN.with(|stdin| stdin.borrow_mut().read_line(&mut line))?;
    if read == 0 {
        return Err(Exception::eof("EOF when reading a line"));
    }
    Ok(trim_line(line, STRIP_INPUT.load(Ordering::Relaxed)))
}

/// `print(*objects, sep=' ', end='\n', file=None, flush=False)`
pub(super) fn builtin_print(mut args: FuncArgs) -> RtResult<ObjRef> {
    let sep = separator(args.take_keyword("sep"), "sep", " ")?;
    let end = separator(args.take_keyword("end"), "end", "\n")?;
    let file = args.take_keyword("file").filter(|f| !is_none(f));
    let flush = match args.take_keyword("flush") {
        Some(flag) => protocol::is_truthy(&flag)?,
        None => false,
    };
    args.check_kwargs_empty("print")?;

    match file {
        None => {
            print(&args.args, &sep, &end)?;
            if flush {
                STDOUT.with(|out| out.borrow_mut().flush())?;
            }
        }
        Some(file) => {
            let text = format_print(&args.args, &sep, &end)?;
            protocol::call_method(&file, "write", &[new_str(text)])?;
            if flush {
                protocol::call_method(&file, "flush", &[])?;
            }
        }
    }
    Ok(none())
}

pub(super) fn builtin_input(args: FuncArgs) -> RtResult<ObjRef> {
    args.check_kwargs_empty("input")?;
    args.check_arity("input", 0, 1)?;
    input(args.args.first()).map(new_str)
}
