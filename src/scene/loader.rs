use gloo_net::http::Request;

use super::gltf::{collect_geometry, parse, plan_buffers, BufferData};
use super::ModelGeometry;
use crate::error::ViewerError;

async fn fetch_bytes(url: &str) -> Result<Vec<u8>, ViewerError> {
    let fetch_err = |source: gloo_net::Error| ViewerError::Fetch {
        url: url.to_string(),
        source,
    };
    let resp = Request::get(url).send().await.map_err(fetch_err)?;
    if !resp.ok() {
        return Err(ViewerError::Status {
            url: url.to_string(),
            status: resp.status(),
        });
    }
    resp.binary().await.map_err(fetch_err)
}

/// Fetches a `.gltf`/`.glb` plus any external buffers and bakes it into triangles.
pub async fn load_model(url: &str) -> Result<ModelGeometry, ViewerError> {
    tracing::info!(url = %url, "loading model");
    let started = js_sys::Date::now();
    let bytes = fetch_bytes(url).await?;
    let gltf = parse(&bytes)?;
    let mut buffers = Vec::new();
    for data in plan_buffers(&gltf, url)? {
        buffers.push(match data {
            BufferData::Ready(b) => b,
            BufferData::Fetch(buffer_url) => fetch_bytes(&buffer_url).await?,
        });
    }
    let geometry = collect_geometry(&gltf.document, &buffers)?;
    tracing::debug!(
        bytes = bytes.len(),
        elapsed_ms = js_sys::Date::now() - started,
        "model fetched and parsed"
    );
    Ok(geometry)
}
