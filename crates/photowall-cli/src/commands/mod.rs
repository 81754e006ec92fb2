pub mod config;
pub mod ids;
pub mod list;
pub mod run;
pub mod show;
