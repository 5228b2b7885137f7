use std::io::{self, BufRead, Write};

use tracing::warn;

const ESCAPE: char = '\u{1b}';

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Key {
    Advance,
    Quit,
}

/// Source of operator key events driving the sweep loop.
pub trait KeyInput {
    fn wait_key(&mut self) -> Key;
}

/// Line-buffered stdin input. Any entered line advances to the next
/// position; `q`, a leading Escape character or end of input quits.
pub struct StdinKeys;

impl KeyInput for StdinKeys {
    fn wait_key(&mut self) -> Key {
        print!("Press Enter to move to the next position (q + Enter to quit): ");
        if let Err(e) = io::stdout().flush() {
            warn!("prompt flush failed: {e}");
        }
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => Key::Quit,
            Ok(_) => classify(&line),
        }
    }
}

fn classify(line: &str) -> Key {
    let trimmed = line.trim();
    if trimmed == "q" || trimmed.starts_with(ESCAPE) {
        Key::Quit
    } else {
        Key::Advance
    }
}
