pub mod cache;
pub mod quota;
pub mod ranking;
pub mod search;

pub use cache::ResponseCache;
pub use quota::{QuotaCheck, QuotaService};
pub use search::{SearchError, SearchMeta, SearchResponse, SearchService};
