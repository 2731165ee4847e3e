pub mod configuration;
pub mod current_tab;
pub mod domain;
pub mod navigation;
pub mod routes;
pub mod startup;
pub mod submission;
pub mod tabs;
pub mod telemetry;
pub mod utils;
pub mod waitlist_client;
