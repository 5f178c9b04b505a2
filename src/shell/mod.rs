// Composition root.
//
// Responsibilities
// - Read settings from the environment.
// - Build the one sync dispatcher of the process and the backend adapters.
// - Expose the HTTP surface: manual sync trigger, change webhook, watcher status.

pub mod config;
pub mod http;
pub mod state;
