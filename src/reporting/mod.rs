pub mod console;
pub mod prompt;
pub mod reporter;

pub use console::ConsoleReporter;
pub use prompt::ConsolePrompt;
pub use reporter::{RecordingReporter, ResultReporter};
