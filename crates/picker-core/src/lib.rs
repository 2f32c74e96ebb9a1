pub mod config;
pub mod debounce;
pub mod merge;
pub mod model;
pub mod picker;
pub mod query;
pub mod search;
pub mod selection;
pub mod served_app;
