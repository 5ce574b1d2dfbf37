pub mod chat;
pub mod content;
pub mod desktop;
pub mod easter_eggs;
pub mod effects;
pub mod route;
pub mod scroll_stack;
pub mod sequence;
pub mod terminal;
pub mod vision;

#[cfg(target_arch = "wasm32")]
pub mod frontend;

#[cfg(not(target_arch = "wasm32"))]
pub mod backend;
