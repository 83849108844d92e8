pub mod config;
pub mod export;
pub mod fetch;
pub mod fixture_fetch;
pub mod html;
pub mod http_client;
pub mod logging;
pub mod reconcile;
pub mod season;
pub mod sports_reference;
pub mod stats;
pub mod team_list;
pub mod team_query;
