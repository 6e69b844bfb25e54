use crate::ui::styles::{error_style, hint_style, success_style, title_style, warning_style};
use crossterm::style::ContentStyle;
use std::io::{self, BufRead, Write};

/// Line-based prompt over any reader and writer
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn out(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Print a prompt and read one trimmed line. None at end of input.
    /// Bytes that are not UTF-8 are replaced rather than failing the read
    pub fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;

        let mut line = Vec::new();
        if self.input.read_until(b'\n', &mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&line).trim().to_string()))
    }

    pub fn line(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output, "{}", text)
    }

    fn styled(&mut self, style: ContentStyle, text: &str) -> io::Result<()> {
        writeln!(self.output, "{}", style.apply(text))
    }

    pub fn heading(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output)?;
        self.styled(title_style(), text)
    }

    pub fn success(&mut self, text: &str) -> io::Result<()> {
        self.styled(success_style(), text)
    }

    pub fn warning(&mut self, text: &str) -> io::Result<()> {
        self.styled(warning_style(), text)
    }

    pub fn error(&mut self, text: &str) -> io::Result<()> {
        self.styled(error_style(), text)
    }

    pub fn info(&mut self, text: &str) -> io::Result<()> {
        self.styled(hint_style(), text)
    }
}
