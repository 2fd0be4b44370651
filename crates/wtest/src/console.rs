//! Console sink shared by the runner and the assertion recorder

use colored::*;
use std::cell::RefCell;
use std::io::{self, Write};
use std::path::Path;
use std::rc::Rc;

/// Colours used on the console
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tone {
    Red,
    Green,
    Blue,
}

impl Tone {
    fn rgb(self) -> (u8, u8, u8) {
        match self {
            Tone::Red => (215, 50, 50),
            Tone::Green => (0, 155, 0),
            Tone::Blue => (52, 91, 151),
        }
    }
}

#[derive(Debug, Clone)]
enum Sink {
    Stdout,
    Buffer(Rc<RefCell<Vec<u8>>>),
}

/// Where progress dots, failure lines and the summary go.
///
/// Cloning a `Console` yields a handle to the same sink, so a buffered console
/// handed to a runner can be read back afterwards.
#[derive(Debug, Clone)]
pub struct Console {
    sink: Sink,
    color: bool,
}

impl Default for Console {
    fn default() -> Self {
        Self::stdout()
    }
}

impl Console {
    /// Write to standard output with colour enabled
    pub fn stdout() -> Self {
        Self {
            sink: Sink::Stdout,
            color: true,
        }
    }

    /// Capture output in memory; colour starts disabled
    pub fn buffered() -> Self {
        Self {
            sink: Sink::Buffer(Rc::new(RefCell::new(Vec::new()))),
            color: false,
        }
    }

    /// Disable (or re-enable) colour segments
    pub fn with_no_color(mut self, no_color: bool) -> Self {
        self.color = !no_color;
        self
    }

    pub fn color_enabled(&self) -> bool {
        self.color
    }

    /// Everything written so far, for a buffered console
    pub fn contents(&self) -> Option<String> {
        match &self.sink {
            Sink::Stdout => None,
            Sink::Buffer(buf) => Some(String::from_utf8_lossy(&buf.borrow()).into_owned()),
        }
    }

    /// Write text as-is and flush. Output is best-effort.
    pub(crate) fn write(&self, text: &str) {
        match &self.sink {
            Sink::Stdout => {
                print!("{}", text);
                let _ = io::stdout().flush();
            }
            Sink::Buffer(buf) => {
                let _ = buf.borrow_mut().write_all(text.as_bytes());
            }
        }
    }

    pub(crate) fn writeln(&self, text: &str) {
        self.write(text);
        self.write("\n");
    }

    pub(crate) fn paint(&self, text: &str, tone: Tone) -> String {
        if !self.color {
            return text.to_string();
        }
        let (r, g, b) = tone.rgb();
        text.truecolor(r, g, b).to_string()
    }

    /// Print `<file> #<line> <function> <text>` on its own line.
    pub(crate) fn log_at(&self, file: &str, line: u32, function: &str, text: &str) {
        let location = format!("{} #{} ", short_file_name(file), line);
        self.write(&self.paint(&location, Tone::Blue));
        self.write(&self.paint(&format!("{} ", function), Tone::Green));
        self.writeln(text);
    }
}

/// Last path component of a source file path
pub(crate) fn short_file_name(file: &str) -> &str {
    Path::new(file)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(file)
}
