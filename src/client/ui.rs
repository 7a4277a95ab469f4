//! Terminal prompt helpers.

use std::io::Write;

/// Redraw the input prompt after printing an incoming event.
pub fn redisplay_prompt(username: &str) {
    print!("{}> ", username);
    let _ = std::io::stdout().flush();
}
