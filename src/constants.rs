pub mod quota {

    pub const DEFAULT_MAX_SEARCHES: i32 = 3;
}

pub mod cache {

    pub const TTL_SECONDS: i64 = 60 * 60;

    pub const MAX_ENTRIES: usize = 50;

    pub const EVICT_BATCH: usize = 10;
}

pub mod limits {
    /// Hard cap on jobs returned per search. Tied to the JSearch free-tier
    /// call budget, not a presentation choice.
    pub const RESULTS_PER_SEARCH: usize = 4;

    pub const DESCRIPTION_PREVIEW_CHARS: usize = 500;
}
