pub mod config;
pub mod db;
pub mod llm;
pub mod nlq;
pub mod notify;
pub mod util;
pub mod web;
