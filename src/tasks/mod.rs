//! Task catalog and the factory that turns a task name into a configured
//! [`TaskInstance`].

pub mod catalog;
pub mod metric;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    datasets::{
        DatasetBundle, DatasetSplit, LoadContext, Loader, LoaderError, SampleError,
        DEFAULT_HUB_ENDPOINT,
    },
    sampler::FewShotSampler,
};

pub use catalog::{PostProcess, SplitAlias, TaskSpec, TASKS};
pub use metric::Metric;

/// Caller-supplied settings shared by every task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskConfig {
    pub seed: u64,
    /// Per-label cap for few-shot sampling; `None` keeps the full splits.
    pub num_samples: Option<usize>,
    pub cache_dir: PathBuf,
    pub data_dir: Option<PathBuf>,
    pub require_every_label: bool,
    pub hub_endpoint: String,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            num_samples: None,
            cache_dir: PathBuf::from(".cache/fewshot-tasks"),
            data_dir: None,
            require_every_label: false,
            hub_endpoint: DEFAULT_HUB_ENDPOINT.to_owned(),
        }
    }
}

impl TaskConfig {
    pub fn new<P: Into<PathBuf>>(seed: u64, cache_dir: P) -> Self {
        Self {
            seed,
            cache_dir: cache_dir.into(),
            ..Default::default()
        }
    }

    pub fn with_num_samples(mut self, num_samples: usize) -> Self {
        self.num_samples = Some(num_samples);
        self
    }

    pub fn with_data_dir<P: Into<PathBuf>>(mut self, data_dir: P) -> Self {
        self.data_dir = Some(data_dir.into());
        self
    }

    pub fn require_every_label(mut self, require: bool) -> Self {
        self.require_every_label = require;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized task {name:?}; task name should be one of {}", valid.join(", "))]
pub struct UnknownTaskError {
    pub name: String,
    pub valid: Vec<&'static str>,
}

#[derive(Debug, Error)]
pub enum TaskError {
    #[error(transparent)]
    UnknownTask(#[from] UnknownTaskError),
    #[error(transparent)]
    Loader(#[from] LoaderError),
    #[error(transparent)]
    Sample(#[from] SampleError),
}

pub fn task_names() -> impl Iterator<Item = &'static str> {
    TASKS.iter().map(|t| t.name)
}

pub fn find(name: &str) -> Option<&'static TaskSpec> {
    TASKS.iter().find(|t| t.name == name)
}

/// Looks `name` up in the catalog and configures it.
pub fn resolve(name: &str, config: TaskConfig) -> Result<TaskInstance, UnknownTaskError> {
    match find(name) {
        Some(spec) => Ok(TaskInstance::new(*spec, config)),
        None => Err(UnknownTaskError {
            name: name.to_owned(),
            valid: task_names().collect(),
        }),
    }
}

/// A catalog entry bound to a [`TaskConfig`].
pub struct TaskInstance {
    spec: TaskSpec,
    config: TaskConfig,
    loader: Box<dyn Loader>,
}

impl std::fmt::Debug for TaskInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskInstance")
            .field("spec", &self.spec)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl TaskInstance {
    pub fn new(spec: TaskSpec, config: TaskConfig) -> Self {
        Self {
            loader: Box::new(spec.source),
            spec,
            config,
        }
    }

    /// Replaces the catalog's loading recipe.
    pub fn with_loader<L: Loader + 'static>(mut self, loader: L) -> Self {
        self.loader = Box::new(loader);
        self
    }

    pub fn with_post_process(mut self, post_process: PostProcess) -> Self {
        self.spec.post_process = Some(post_process);
        self
    }

    pub fn name(&self) -> &'static str {
        self.spec.name
    }

    pub fn num_labels(&self) -> usize {
        self.spec.num_labels
    }

    pub fn metrics(&self) -> &'static [Metric] {
        self.spec.metrics
    }

    pub fn spec(&self) -> &TaskSpec {
        &self.spec
    }

    pub fn config(&self) -> &TaskConfig {
        &self.config
    }

    pub fn sampler(&self, cap: usize) -> FewShotSampler {
        FewShotSampler::new(self.spec.num_labels, cap, self.config.seed)
            .require_every_label(self.config.require_every_label)
    }

    /// Fetches the raw bundle.
    pub fn load(&self) -> Result<DatasetBundle, LoaderError> {
        let ctx = LoadContext {
            task: self.spec.name,
            cache_dir: &self.config.cache_dir,
            data_dir: self.config.data_dir.as_deref(),
            hub_endpoint: &self.config.hub_endpoint,
        };
        self.loader.load(&ctx)
    }

    /// Applies the split alias, samples with `cap` and runs the post-processing hook.
    pub fn sample_datasets(
        &self,
        mut bundle: DatasetBundle,
        cap: usize,
    ) -> Result<DatasetBundle, SampleError> {
        if let Some(alias) = self.spec.alias {
            bundle.alias(alias.from.name(), alias.to.name())?;
        }
        let bundle = self.sampler(cap).sample(bundle)?;

        let Some(post_process) = self.spec.post_process else {
            return Ok(bundle);
        };
        let before = bundle.split_sizes();
        let bundle = post_process(bundle);
        let after = bundle.split_sizes();
        if let Some((split, &size)) = before.iter().find(|(k, v)| after.get(*k) != Some(*v)) {
            return Err(SampleError::PostProcessResized {
                split: split.clone(),
                before: size,
                after: after.get(split).copied().unwrap_or(0),
            });
        }
        Ok(bundle)
    }

    /// Loads the task and, when `num_samples` is configured, returns its
    /// balanced few-shot version.
    pub fn get_datasets(&self) -> Result<DatasetBundle, TaskError> {
        let bundle = self.load()?;
        let Some(cap) = self.config.num_samples else {
            return Ok(bundle);
        };
        let bundle = self.sample_datasets(bundle, cap)?;
        for split in [DatasetSplit::Train, DatasetSplit::Validation] {
            if let Some(counts) = bundle.label_counts(split.name()) {
                log::info!("{} {split} label distribution: {counts:?}", self.spec.name);
            }
        }
        Ok(bundle)
    }
}
