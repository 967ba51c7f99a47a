pub mod bind;
pub mod manager;
pub mod models;
pub mod repositories;
pub mod search;
pub mod update;
