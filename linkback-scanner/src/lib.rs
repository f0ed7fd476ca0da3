pub mod classify;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod finder;
pub mod normalize;
pub mod probe;
pub mod result;
pub mod target;

pub use classify::{DomainRestriction, PageClassifier, PagePolicy, is_web_page};
pub use error::ScanError;
pub use fetch::{PageFetcher, TextEncoding};
pub use finder::{BacklinkFinder, BacklinkStream, ProgressCallback, ResultCallback, find_backlinks};
pub use result::ProbeResult;
pub use target::SeedTarget;
