pub mod config;
pub mod content_filter;
pub mod engine;
pub mod settings;
pub mod url_bar;
pub mod webview;
