//! UI modules - terminal presentation
//!
//! The install pipeline talks to a [`Reporter`]; the CLI hands it a
//! [`ConsoleReporter`], tests hand it a [`NullReporter`].

pub mod output;
pub mod reporter;

pub use output::ConsoleReporter;
pub use reporter::{NullReporter, Reporter};
