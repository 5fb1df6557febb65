//! HTTP clients for the external ranking (DataForSEO) and content
//! (Firecrawl) providers.

pub mod dataforseo;
pub mod error;
pub mod firecrawl;
pub mod http;
pub(crate) mod rate_limit;

pub use dataforseo::DataForSeoClient;
pub use error::ClientError;
pub use firecrawl::FirecrawlClient;
pub use http::HttpSettings;
