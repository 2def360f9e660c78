use crate::types::Value;
use std::collections::VecDeque;
use std::io::BufRead;

/// Where `input` statements take their values from.
pub trait InputSource: Send {
    /// Next value, or `None` once the source is exhausted.
    fn read(&mut self) -> Option<Value>;
}

impl InputSource for VecDeque<Value> {
    fn read(&mut self) -> Option<Value> {
        self.pop_front()
    }
}

/// Reads one integer per line from standard input.
#[derive(Debug, Default)]
pub struct StdinSource;

impl InputSource for StdinSource {
    fn read(&mut self) -> Option<Value> {
        let mut line = String::new();
        match std::io::stdin().lock().read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => match line.trim().parse::<Value>() {
                Ok(value) => Some(value),
                Err(e) => {
                    log::warn!("Ignoring non-integer input `{}`: {}", line.trim(), e);
                    None
                }
            },
            Err(e) => {
                log::warn!("Failed to read standard input: {}", e);
                None
            }
        }
    }
}
