pub mod apt;
pub mod client;
pub mod download;
pub mod fetcher;
pub mod manifest;

pub use apt::{IndexResponse, fetch_index};
pub use client::{ClientOptions, build_client};
pub use download::fetch_file;
pub use fetcher::HttpFetcher;
pub use manifest::{load_manifest, manifest_url};
