use std::io::{BufRead, Write};
use std::sync::Mutex;

/// Asks the operator whether a mutating pass may go ahead.
pub trait Confirmer: Send + Sync {
    /// Present `prompt` and block until a yes/no answer is available.
    ///
    /// # Errors
    ///
    /// Returns an IO error when the answer cannot be read.
    fn confirm(&self, prompt: &str) -> std::io::Result<bool>;
}

/// `y` or `yes` in any case is consent; anything else, including an empty
/// line, declines.
#[must_use]
pub fn parse_answer(line: &str) -> bool {
    matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Prompts on stderr and reads one line from stdin. End of input declines.
#[derive(Default)]
pub struct ConsoleConfirmer;

impl Confirmer for ConsoleConfirmer {
    fn confirm(&self, prompt: &str) -> std::io::Result<bool> {
        let mut err = std::io::stderr().lock();
        err.write_all(prompt.as_bytes())?;
        err.flush()?;
        let mut line = String::new();
        let n = std::io::stdin().lock().read_line(&mut line)?;
        Ok(n > 0 && parse_answer(&line))
    }
}

/// Reads answers from any buffered reader, echoing prompts to a writer.
pub struct ReaderConfirmer<R: BufRead + Send, W: Write + Send> {
    io: Mutex<(R, W)>,
}

impl<R: BufRead + Send, W: Write + Send> ReaderConfirmer<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            io: Mutex::new((reader, writer)),
        }
    }
}

impl<R: BufRead + Send, W: Write + Send> Confirmer for ReaderConfirmer<R, W> {
    fn confirm(&self, prompt: &str) -> std::io::Result<bool> {
        let mut guard = self
            .io
            .lock()
            .map_err(|_| std::io::Error::other("confirmer poisoned"))?;
        let (reader, writer) = &mut *guard;
        writer.write_all(prompt.as_bytes())?;
        writer.flush()?;
        let mut line = String::new();
        let n = reader.read_line(&mut line)?;
        Ok(n > 0 && parse_answer(&line))
    }
}

/// Scripted answer for tests and non-interactive callers. Records every
/// prompt it was shown.
#[derive(Default)]
pub struct FixedConfirmer {
    answer: bool,
    prompts: Mutex<Vec<String>>,
}

impl FixedConfirmer {
    #[must_use]
    pub fn new(answer: bool) -> Self {
        Self {
            answer,
            prompts: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

impl Confirmer for FixedConfirmer {
    fn confirm(&self, prompt: &str) -> std::io::Result<bool> {
        if let Ok(mut p) = self.prompts.lock() {
            p.push(prompt.to_string());
        }
        Ok(self.answer)
    }
}

impl<T: Confirmer + ?Sized> Confirmer for std::sync::Arc<T> {
    fn confirm(&self, prompt: &str) -> std::io::Result<bool> {
        (**self).confirm(prompt)
    }
}
