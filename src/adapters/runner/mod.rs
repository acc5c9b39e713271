//! Background job runner adapters.

mod tokio_runner;

pub use tokio_runner::TokioJobRunner;
