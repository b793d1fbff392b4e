/// Sahityotsav - festival registration, results and scoreboard client (TUI Edition)
///
/// Core library providing the festival REST client, the contestant
/// registration wizard, results posters, the live scoreboard and the
/// photo gallery.

pub mod config;
pub mod core;
pub mod tui;

#[cfg(test)]
mod tests;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
