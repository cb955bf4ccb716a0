use crossterm::{
    ExecutableCommand,
    cursor,
    terminal::{self, ClearType},
};
use std::io::{Write, stdout};

pub struct TerminalRenderer {
    raw_mode: bool,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self { raw_mode: false }
    }

    pub fn print_message(&self, message: &str) {
        if self.raw_mode {
            // Raw mode needs an explicit carriage return
            print!("\r\n{}\r\n", message);
            let _ = stdout().flush();
        } else {
            println!("{}", message);
        }
    }

    pub fn print_error(&self, message: &str) {
        if self.raw_mode {
            eprint!("\r\nError: {}\r\n", message);
        } else {
            eprintln!("Error: {}", message);
        }
    }

    /// Aligned `label: value` lines
    pub fn print_fields(&self, fields: &[(&str, String)]) {
        let width = fields.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
        for (label, value) in fields {
            self.print_message(&format!("  {:<width$}  {}", format!("{}:", label), value, width = width + 1));
        }
    }

    /// Switch to raw keyboard input for interactive commands
    pub fn enter_raw_mode(&mut self) -> anyhow::Result<()> {
        terminal::enable_raw_mode()?;
        self.raw_mode = true;
        Ok(())
    }

    pub fn leave_raw_mode(&mut self) -> anyhow::Result<()> {
        if self.raw_mode {
            terminal::disable_raw_mode()?;
            self.raw_mode = false;
            println!();
        }
        Ok(())
    }

    /// Redraw the single status line in place
    pub fn render_status(&self, status: &str, hint: &str) -> anyhow::Result<()> {
        let mut stdout = stdout();
        stdout.execute(cursor::MoveToColumn(0))?;
        stdout.execute(terminal::Clear(ClearType::CurrentLine))?;
        print!("{} | {}", status, hint);
        stdout.flush()?;
        Ok(())
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TerminalRenderer {
    fn drop(&mut self) {
        let _ = self.leave_raw_mode();
    }
}
