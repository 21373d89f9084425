//! Console error reporter
//!
//! Writes `ERROR! (<file>[<line><caller>]) Type: message` to a color-aware
//! stream; the caller segment appears only when a frame name is known. The
//! reporter never terminates the process; it tells the caller whether the
//! exception was fatal and leaves the exit decision at the binary boundary.

use std::io::{self, Write};

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::exception::Exception;

/// Where a failure surfaced, for the report prefix
#[derive(Clone, Copy, Debug)]
pub struct SourceContext<'a> {
    /// Source file or input label (e.g. `<repl>`)
    pub file: &'a str,
    /// One-based line number
    pub line: usize,
    /// Name of the frame the failure surfaced in, when known
    pub caller: Option<&'a str>,
}

impl<'a> SourceContext<'a> {
    /// Create a source context
    pub fn new(file: &'a str, line: usize) -> Self {
        Self {
            file,
            line,
            caller: None,
        }
    }

    /// Attach the name of the frame the failure surfaced in
    pub fn with_caller(mut self, caller: &'a str) -> Self {
        self.caller = Some(caller);
        self
    }
}

/// Write an exception report to a color-aware stream
///
/// # Errors
///
/// Propagates stream write failures.
pub fn write_report<W: WriteColor>(
    stream: &mut W,
    context: SourceContext<'_>,
    exception: &Exception,
) -> io::Result<()> {
    stream.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
    write!(stream, "ERROR!")?;
    stream.reset()?;
    match context.caller {
        Some(caller) => writeln!(
            stream,
            " ({}[{}<{}>]) {}",
            context.file, context.line, caller, exception
        ),
        None => writeln!(stream, " ({}[{}]) {}", context.file, context.line, exception),
    }
}

/// Color-aware exception reporter
pub struct Reporter {
    stream: StandardStream,
}

impl Reporter {
    /// Reporter writing to stderr, coloring when attached to a terminal
    pub fn stderr() -> Self {
        Self {
            stream: StandardStream::stderr(ColorChoice::Auto),
        }
    }

    /// Print an exception report
    ///
    /// Returns `true` when the exception is fatal, so the caller can decide
    /// to stop.
    ///
    /// # Errors
    ///
    /// Propagates stream write failures.
    pub fn report(
        &mut self,
        context: SourceContext<'_>,
        exception: &Exception,
    ) -> io::Result<bool> {
        write_report(&mut self.stream, context, exception)?;
        Ok(!exception.is_recoverable())
    }
}
