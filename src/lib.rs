pub mod config;
pub mod drafts;
pub mod errors;
pub mod github;
pub mod logging;
pub mod repos;
pub mod session;
pub mod store;
pub mod submit;
pub mod target;
pub mod ui;
