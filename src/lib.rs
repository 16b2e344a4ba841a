pub mod app_state;
pub mod artifacts;
pub mod classifier;
pub mod config;
pub mod encoder;
pub mod error;
pub mod io_struct;
pub mod logging;
pub mod predictor;
pub mod server;
