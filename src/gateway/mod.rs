// Content retrieval through public gateways
// The resolver hides the failure of any single gateway from its callers

mod fetcher;
mod resolver;

pub use fetcher::{GatewayFetcher, HttpGatewayFetcher};
pub use resolver::{GatewayEndpoint, GatewayResolver, Retrieved};
