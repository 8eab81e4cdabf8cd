//! tagkit Application
//!
//! Hosts the `intl-date` and `code-editor` elements: an in-process showcase
//! for native builds and browser bindings for WASM.

mod showcase;

pub use showcase::{run_showcase, AppError, SHOWCASE_LOCALES};

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::run_wasm;
