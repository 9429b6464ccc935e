pub mod chat;
pub mod cli;
pub mod config;
pub mod cuisine;
pub mod errors;
pub mod filters;
pub mod images;
pub mod logging;
pub mod planner;
pub mod pricing;
pub mod profile;
pub mod recipe;
pub mod recommendations;
pub mod search;
pub mod shopping_list;
