//! HTTP transport for the GameLayer REST API

mod client;

pub use client::{decode_claim, decode_response, GameLayerClient};
