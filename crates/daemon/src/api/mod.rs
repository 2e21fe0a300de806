mod alerts;
mod health;
mod metrics;
mod readings;
mod router;
mod rules;

pub use router::{router, serve, AppState};
