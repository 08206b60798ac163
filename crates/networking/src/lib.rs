//! GameLayer Networking - HTTP client and API wrappers

pub mod api;
pub mod http;

pub use api::GameLayerApi;
pub use http::GameLayerClient;
