pub mod config;
pub mod quiet;
pub mod run;
pub mod status;
