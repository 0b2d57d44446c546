pub mod config;
pub mod run;
pub mod spy;
pub mod timeline;
