// Library surface shared by the binary and the integration tests.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod error;
pub mod flashcard;
pub mod learn;
pub mod progress;
pub mod quiz;
pub mod runtime;
pub mod speech;
pub mod storage;
pub mod summary;
pub mod telemetry;
pub mod tutor;
pub mod ui;
pub mod util;
pub mod vocabulary;

pub use error::{Error, Result};
