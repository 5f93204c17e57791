pub mod formatter;
pub mod progress;

pub use formatter::Formatter;
