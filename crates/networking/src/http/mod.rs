mod client;

pub use client::{browse_query_params, DealVistaClient};
