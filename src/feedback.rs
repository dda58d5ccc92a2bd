use std::io::Write;

/// Receives one call per accepted keystroke.
pub trait KeystrokeFeedback {
    fn keystroke(&mut self, is_error: bool);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl KeystrokeFeedback for Silent {
    fn keystroke(&mut self, _is_error: bool) {}
}

/// Rings the terminal bell on mistyped characters.
#[derive(Debug)]
pub struct TerminalBell<W: Write> {
    out: W,
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl TerminalBell<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> KeystrokeFeedback for TerminalBell<W> {
    fn keystroke(&mut self, is_error: bool) {
        if !is_error {
            return;
        }
        if let Err(err) = self.out.write_all(b"\x07").and_then(|_| self.out.flush()) {
            log::debug!("terminal bell failed: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bell_only_on_errors() {
        let mut bell = TerminalBell::new(Vec::new());
        bell.keystroke(false);
        bell.keystroke(true);
        bell.keystroke(false);
        bell.keystroke(true);

        assert_eq!(bell.into_inner(), b"\x07\x07".to_vec());
    }
}
