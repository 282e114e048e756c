//! HTTP adapters built on `reqwest`.

mod describer;
mod fetcher;
mod tls;

pub use describer::ChatCompletionsDescriber;
pub use fetcher::HttpImageFetcher;
