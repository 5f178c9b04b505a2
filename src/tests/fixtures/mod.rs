pub mod callbacks;
pub mod resources;
pub mod state;
