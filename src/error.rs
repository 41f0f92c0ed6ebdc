use thiserror::Error;

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("request for {url} failed")]
    Fetch {
        url: String,
        #[source]
        source: gloo_net::Error,
    },
    #[error("{url} responded with HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("invalid glTF document")]
    Gltf(#[from] gltf::Error),
    #[error("buffer {0} refers to a GLB binary chunk that is missing")]
    MissingBlob(usize),
    #[error("buffer {index} uses an unsupported data URI")]
    DataUri { index: usize },
    #[error("base64 payload of buffer {index} is malformed")]
    Base64 {
        index: usize,
        #[source]
        source: base64::DecodeError,
    },
    #[error("buffer {index} holds {actual} bytes, document declares {declared}")]
    ShortBuffer {
        index: usize,
        declared: usize,
        actual: usize,
    },
    #[error("model contains no drawable geometry")]
    EmptyModel,
}

/// Renders an error and its `source()` chain on one line for console output.
pub fn display_chain(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut cur = err.source();
    while let Some(e) = cur {
        out.push_str(": ");
        out.push_str(&e.to_string());
        cur = e.source();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;

    #[test]
    fn chain_includes_sources() {
        let source = base64::engine::general_purpose::STANDARD
            .decode("@@@")
            .unwrap_err();
        let err = ViewerError::Base64 { index: 2, source };
        let text = display_chain(&err);
        assert!(text.starts_with("base64 payload of buffer 2 is malformed: "));
        assert!(text.len() > "base64 payload of buffer 2 is malformed: ".len());
    }

    #[test]
    fn leaf_error_has_no_suffix() {
        assert_eq!(
            display_chain(&ViewerError::EmptyModel),
            "model contains no drawable geometry"
        );
    }
}
