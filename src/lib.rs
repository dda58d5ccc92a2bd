// Library surface: the typing-test engine plus its local collaborators.
// Terminal rendering stays in the binary.
pub mod app_dirs;
pub mod classifier;
pub mod config;
pub mod controller;
pub mod error;
pub mod feedback;
pub mod language;
pub mod runtime;
pub mod session;
pub mod stats;
pub mod store;
pub mod time_series;
pub mod timer;
pub mod util;
pub mod word_generator;

pub use controller::{CompletedTest, Controller, KeyOutcome, Snapshot};
pub use session::{Phase, TestDuration};
