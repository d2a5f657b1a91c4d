pub mod input;
pub mod options;
pub mod progress;
