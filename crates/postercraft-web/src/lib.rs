//! PosterCraft Web
//!
//! Browser bindings: a [`wasm_bindgen`]-exported editor handle over the
//! core editing session, plus the view state handed to the page on every
//! change.

mod state;

pub use state::EditorState;

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::{WebEditor, start};
