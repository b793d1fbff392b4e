pub mod gallery;
pub mod registration;
pub mod results;
pub mod scoreboard;
