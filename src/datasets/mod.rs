pub mod bundle;
pub mod csv_file;
pub(crate) mod download;
pub mod errors;
pub mod json_file;
pub mod label;
pub mod source;
pub mod split;

pub use bundle::{DatasetBundle, Example, SOURCE_COLUMN};
pub use errors::{DownloadError, LabelOrdinalError, LoaderError, SampleError};
pub use label::LabelRemap;
pub use source::{LoadContext, Loader, Source, DEFAULT_HUB_ENDPOINT};
pub use split::{DatasetSplit, SplitNotFoundError};
