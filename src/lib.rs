pub mod batch;
pub mod config;
pub mod error;
pub mod h2h;
pub mod h2h_store;
pub mod metrics;
pub mod odds;
pub mod prediction;
pub mod report_export;
pub mod scoreline;
pub mod state;
pub mod win_prob;
