pub mod dispatcher;
pub mod extractor;
pub mod types;

pub use dispatcher::{DownloadDispatcher, WorkerSlot};
pub use extractor::{Extractor, YtDlpExtractor};
pub use types::{
    DEFAULT_FORMAT, DownloadRequest, DownloadResult, DownloadedMedia, ExtractedMedia,
    ExtractionOptions,
};
