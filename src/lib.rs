pub mod batch;
pub mod browser;
pub mod config;
pub mod input;
pub mod output;
pub mod rank;
pub mod riot_id;
pub mod row;
pub mod schema;
pub mod xdx;
