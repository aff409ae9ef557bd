//! Registry of text-classification tasks for few-shot experiments.
//!
//! A task name resolves to a [`tasks::TaskInstance`] that knows how to load
//! the task's dataset and, given a per-label cap, how to carve a
//! class-balanced `train` / `validation` pair out of its training split.
//!
//! ```no_run
//! use fewshot_tasks::tasks::{resolve, TaskConfig};
//!
//! let config = TaskConfig::new(42, ".cache").with_num_samples(8);
//! let task = resolve("emotion", config)?;
//! let bundle = task.get_datasets()?;
//! assert!(bundle["train"].len() <= task.num_labels() * 8);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod datasets;
pub mod sampler;
pub mod tasks;

pub use datasets::{DatasetBundle, Example};
pub use sampler::FewShotSampler;
pub use tasks::{resolve, TaskConfig, TaskError, TaskInstance, UnknownTaskError};
