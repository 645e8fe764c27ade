//! DealVista Engine - Session lifecycle, catalog browsing, and redemption flows

pub mod config;
pub mod context;
pub mod flows;

pub use config::AppConfig;
pub use context::AppContext;
pub use flows::{apply_local_refinements, BrowseController, RedemptionFlow, RevealState};
