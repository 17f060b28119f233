//! Travel Chat — WASM entry point.
//!
//! This crate is the composition root (DI wiring layer).
//! It assembles the platform adapters into a `ChatSessionController` and
//! hands it to the JavaScript presentation layer as the `TravelChat` class.

mod app;

pub use app::TravelChat;

use wasm_bindgen::prelude::*;

/// WASM entry point — runs once when the module is instantiated
#[wasm_bindgen(start)]
pub fn start() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("Travel chat WASM starting...");
}
