//! Menu input parsing and prompting.
//!
//! One prompting primitive drives every menu level of the session: print a
//! prompt, read a line, and either return a parsed [`Choice`] or report the
//! problem and ask again. The reader and writer are injected so the loop is
//! exercised in tests with in-memory buffers.

use std::io::{self, BufRead, Write};

/// A parsed menu selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    /// A valid option, as a zero-based index into the listed options.
    Index(usize),
    /// `a` — select every listed option.
    All,
    /// `b` — return to the previous menu.
    Back,
    /// `q` — leave the session.
    Quit,
}

/// Prompts until the user enters a valid selection.
///
/// `len` is the number of listed options; on screen they are numbered from
/// one, and the returned [`Choice::Index`] is zero-based. `a` and `b` are
/// accepted only when the caller allows them, otherwise they fall through to
/// the invalid-input report. Out-of-range numbers report "Invalid choice.",
/// everything unparsable reports "Invalid input.", and both re-prompt.
///
/// End of input on the reader behaves as quit, so piped sessions terminate
/// cleanly.
///
/// # Errors
///
/// Only I/O errors from the underlying reader or writer.
pub fn prompt_choice<R, W>(
    input: &mut R,
    out: &mut W,
    prompt: &str,
    len: usize,
    allow_all: bool,
    allow_back: bool,
) -> io::Result<Choice>
where
    R: BufRead + ?Sized,
    W: Write + ?Sized,
{
    loop {
        write!(out, "{prompt} (q to quit): ")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(Choice::Quit);
        }
        let entry = line.trim();

        match entry.to_ascii_lowercase().as_str() {
            "q" => return Ok(Choice::Quit),
            "a" if allow_all => return Ok(Choice::All),
            "b" if allow_back => return Ok(Choice::Back),
            _ => {}
        }

        match entry.parse::<usize>() {
            Ok(n) if (1..=len).contains(&n) => return Ok(Choice::Index(n - 1)),
            Ok(_) => writeln!(out, "Invalid choice. Please enter a valid number.")?,
            Err(_) => writeln!(out, "Invalid input. Please enter a number.")?,
        }
    }
}
