//! CLI command implementations.

mod config;
mod doctor;
mod generate;
mod package;

pub use config::run_config;
pub use doctor::run_doctor;
pub use generate::run_generate;
pub use package::{run_package, PublishingPackage};
