// Screen expectations - the public surface used by UI tests.
// Captures frames from a remote screen, searches templates in them and
// polls until exactly one instance is visible.

pub mod session;

#[cfg(test)]
mod tests;

pub use session::{ScreenMatch, load_template};
