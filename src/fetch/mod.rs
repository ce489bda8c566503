pub mod decode;
pub mod quotes;
pub mod request;

pub use decode::{parse_quote_line, QuoteRecord};
pub use quotes::{select_record_line, QuoteFetcher, QuoteSource, RawLine, RawLines};
pub use request::{build_quote_url, RequestContext, DEFAULT_URL_TEMPLATE};

/// Default bound on a single upstream request, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
