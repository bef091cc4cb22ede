//! Presentation layer for the net-pay engine: form state, text rendering,
//! CSV batches, rate schedule files and logging setup.

pub mod batch;
pub mod config;
pub mod form;
pub mod logging;
pub mod receipt;
pub mod utils;
