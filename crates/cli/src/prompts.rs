use std::io::{self, BufRead, IsTerminal, Write};
use std::str::FromStr;

use anyhow::{Result, bail};

pub fn confirm(message: &str, force: bool) -> Result<bool> {
  if force {
    return Ok(true);
  }

  if !io::stdin().is_terminal() || !io::stderr().is_terminal() {
    bail!("Cannot prompt for confirmation in non-interactive mode. Use --force to proceed.");
  }

  write!(io::stderr(), "{} [y/N] ", message)?;
  io::stderr().flush()?;

  let mut input = String::new();
  io::stdin().read_line(&mut input)?;

  Ok(matches!(input.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

/// Blocking line prompts over a reader/writer pair.
///
/// Malformed numbers are rejected and asked for again.
pub struct Prompter<R, W> {
  input: R,
  output: W,
}

impl Prompter<io::StdinLock<'static>, io::Stderr> {
  pub fn stdio() -> Self {
    Self::new(io::stdin().lock(), io::stderr())
  }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
  pub fn new(input: R, output: W) -> Self {
    Self { input, output }
  }

  /// Write text followed by a newline.
  pub fn say(&mut self, text: &str) -> Result<()> {
    writeln!(self.output, "{}", text)?;
    Ok(())
  }

  /// Ask for one line. Returns `None` once input is exhausted.
  pub fn line(&mut self, message: &str) -> Result<Option<String>> {
    write!(self.output, "{}: ", message)?;
    self.output.flush()?;

    let mut buf = String::new();
    if self.input.read_line(&mut buf)? == 0 {
      return Ok(None);
    }
    Ok(Some(buf.trim_end_matches(['\r', '\n']).to_string()))
  }

  /// Ask for one line, failing if input is exhausted.
  pub fn text(&mut self, message: &str) -> Result<String> {
    match self.line(message)? {
      Some(line) => Ok(line.trim().to_string()),
      None => bail!("Input closed while waiting for '{}'", message),
    }
  }

  /// Ask until the answer parses as `T`.
  pub fn parse<T: FromStr>(&mut self, message: &str) -> Result<T> {
    loop {
      let answer = self.text(message)?;
      match answer.parse() {
        Ok(value) => return Ok(value),
        Err(_) => self.say(&format!("'{}' is not a valid number, try again.", answer))?,
      }
    }
  }

  /// Like [`Prompter::parse`], but a blank answer means "no value".
  pub fn optional<T: FromStr>(&mut self, message: &str) -> Result<Option<T>> {
    loop {
      let answer = self.text(message)?;
      if answer.is_empty() {
        return Ok(None);
      }
      match answer.parse() {
        Ok(value) => return Ok(Some(value)),
        Err(_) => self.say(&format!("'{}' is not a valid number, try again.", answer))?,
      }
    }
  }

  /// Like [`Prompter::text`], but a blank answer means "no value".
  pub fn optional_text(&mut self, message: &str) -> Result<Option<String>> {
    let answer = self.text(message)?;
    Ok((!answer.is_empty()).then_some(answer))
  }

  #[cfg(test)]
  pub(crate) fn into_output(self) -> W {
    self.output
  }
}
