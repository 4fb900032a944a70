#![allow(clippy::type_complexity)]

pub mod error;
pub mod validation;
pub mod model;
pub mod db;
pub mod ops;
pub mod queries;
pub mod store;
pub mod band;
pub mod sorts;
pub mod view;
pub mod hints;
pub mod dmr;
pub mod codec;
pub mod config;
pub mod logging;
pub mod cli;

pub use config::Config;
pub use error::{RolodexError, RolodexResult};
pub use logging::init_logging;
