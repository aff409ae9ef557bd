use std::path::{Path, PathBuf};

use super::{
    bundle::{DatasetBundle, SOURCE_COLUMN},
    csv_file::{load_csv_file, CsvColumns},
    download::fetch_cached,
    errors::LoaderError,
    json_file::load_json_file,
    label::LabelRemap,
    split::DatasetSplit,
};

pub const DEFAULT_HUB_ENDPOINT: &str = "https://huggingface.co";

/// Everything a loader may need besides its own recipe.
#[derive(Debug, Clone)]
pub struct LoadContext<'a> {
    pub task: &'a str,
    pub cache_dir: &'a Path,
    pub data_dir: Option<&'a Path>,
    pub hub_endpoint: &'a str,
}

impl LoadContext<'_> {
    fn require_data_dir(&self) -> Result<&Path, LoaderError> {
        self.data_dir.ok_or_else(|| LoaderError::MissingDataDir {
            task: self.task.to_owned(),
        })
    }
}

/// Produces the raw bundle of one task.
pub trait Loader: Send + Sync {
    fn load(&self, ctx: &LoadContext<'_>) -> Result<DatasetBundle, LoaderError>;
}

impl<F> Loader for F
where
    F: Fn(&LoadContext<'_>) -> Result<DatasetBundle, LoaderError> + Send + Sync,
{
    fn load(&self, ctx: &LoadContext<'_>) -> Result<DatasetBundle, LoaderError> {
        self(ctx)
    }
}

/// The built-in loading recipes used by the task catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// `<data_dir>/<task>/train.json` and `<data_dir>/<task>/test.json`.
    LocalJson,
    /// `<data_dir>/<task>/<split>.jsonl` for every listed split.
    LocalJsonl { splits: &'static [DatasetSplit] },
    /// `<split>.jsonl` files of a dataset repository on the hub, cached locally.
    /// `text_column` is renamed to `source`.
    Hub {
        repo: &'static str,
        splits: &'static [DatasetSplit],
        text_column: &'static str,
    },
    /// A train/test pair of CSV files, relative to the data directory when
    /// one is configured and to the working directory otherwise.
    Csv {
        train: &'static str,
        test: &'static str,
        columns: CsvColumns,
        remap: Option<LabelRemap>,
    },
}

impl Source {
    pub fn hub_url(endpoint: &str, repo: &str, split: DatasetSplit) -> String {
        format!(
            "{}/datasets/{repo}/resolve/main/{}.jsonl",
            endpoint.trim_end_matches('/'),
            split.name()
        )
    }
}

impl Loader for Source {
    fn load(&self, ctx: &LoadContext<'_>) -> Result<DatasetBundle, LoaderError> {
        log::info!("Loading task {}", ctx.task);
        match *self {
            Source::LocalJson => {
                let root = ctx.require_data_dir()?.join(ctx.task);
                let mut bundle = DatasetBundle::new();
                for split in [DatasetSplit::Train, DatasetSplit::Test] {
                    let path = root.join(format!("{}.json", split.name()));
                    bundle.insert(split.name(), load_json_file(path, None)?);
                }
                Ok(bundle)
            }
            Source::LocalJsonl { splits } => {
                let root = ctx.require_data_dir()?.join(ctx.task);
                let mut bundle = DatasetBundle::new();
                for split in splits {
                    let path = root.join(format!("{}.jsonl", split.name()));
                    bundle.insert(split.name(), load_json_file(path, None)?);
                }
                Ok(bundle)
            }
            Source::Hub {
                repo,
                splits,
                text_column,
            } => {
                let mut bundle = DatasetBundle::new();
                for &split in splits {
                    let url = Self::hub_url(ctx.hub_endpoint, repo, split);
                    let path = fetch_cached(ctx.cache_dir, ctx.task, &url, None)?;
                    bundle.insert(split.name(), load_json_file(path, None)?);
                }
                bundle.rename_column(text_column, SOURCE_COLUMN);
                Ok(bundle)
            }
            Source::Csv {
                train,
                test,
                columns,
                remap,
            } => {
                let root = ctx.data_dir.map_or_else(PathBuf::new, Path::to_path_buf);
                Ok(DatasetBundle::new()
                    .with_split(
                        DatasetSplit::Train.name(),
                        load_csv_file(root.join(train), columns, remap)?,
                    )
                    .with_split(
                        DatasetSplit::Test.name(),
                        load_csv_file(root.join(test), columns, remap)?,
                    ))
            }
        }
    }
}
