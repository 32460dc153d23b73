//! Interactive full-screen mode: refresh loop, events, keybindings.

mod app;
mod event;
mod input;

pub use app::App;
