pub mod api;
pub mod download;
pub mod gallery;
pub mod logging;
pub mod registration;
pub mod results;
pub mod scoreboard;
