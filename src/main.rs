#![cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]

mod card;
mod catalog;
mod consent;
mod gallery;
mod overlay;
mod scheduler;
mod scroll;
mod scroll_contain;
mod viewport;

#[cfg(target_arch = "wasm32")]
mod frontend;

#[cfg(not(target_arch = "wasm32"))]
mod server;

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() {
    if let Err(error) = server::run().await {
        eprintln!("static host failed: {error}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    frontend::run();
}
