pub mod api;
pub mod asset;
pub mod cli;
pub mod config;
pub mod run;
pub mod scheduler;
pub mod sensor;
pub mod shutdown;
