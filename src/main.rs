mod components;
mod config;
mod error;
mod model;
mod scene;
mod state;
mod theme;

use components::{App, AppProps};
use config::ViewerConfig;
use tracing_wasm::WASMLayerConfigBuilder;

fn main() {
    console_error_panic_hook::set_once();
    let config = web_sys::window()
        .and_then(|w| w.document())
        .map(|doc| ViewerConfig::from_page(&doc))
        .unwrap_or_default();
    tracing_wasm::set_as_global_default_with_config(
        WASMLayerConfigBuilder::new()
            .set_max_level(config.max_log_level())
            .build(),
    );
    tracing::info!(model = %config.model_url, "starting map viewer");
    yew::Renderer::<App>::with_props(AppProps { config }).render();
}
