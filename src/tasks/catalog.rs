use crate::datasets::{csv_file::CsvColumns, DatasetBundle, DatasetSplit, LabelRemap, Source};

use super::metric::Metric::{self, Accuracy, F1Macro, Mcc, F1};

/// Runs over the sampled bundle. Must keep every split's size.
pub type PostProcess = fn(DatasetBundle) -> DatasetBundle;

/// Copies one split over another before sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitAlias {
    pub from: DatasetSplit,
    pub to: DatasetSplit,
}

impl SplitAlias {
    /// GLUE-style benchmarks hide their test labels, so the labelled
    /// validation split is evaluated on instead.
    pub const VALIDATION_AS_TEST: SplitAlias = SplitAlias {
        from: DatasetSplit::Validation,
        to: DatasetSplit::Test,
    };
}

#[derive(Debug, Clone, Copy)]
pub struct TaskSpec {
    pub name: &'static str,
    pub num_labels: usize,
    pub metrics: &'static [Metric],
    pub source: Source,
    pub alias: Option<SplitAlias>,
    pub post_process: Option<PostProcess>,
}

impl TaskSpec {
    const fn new(name: &'static str, num_labels: usize, metrics: &'static [Metric], source: Source) -> Self {
        Self {
            name,
            num_labels,
            metrics,
            source,
            alias: None,
            post_process: None,
        }
    }

    const fn with_alias(mut self, alias: SplitAlias) -> Self {
        self.alias = Some(alias);
        self
    }
}

const TRAIN_VALIDATION: &[DatasetSplit] = &[DatasetSplit::Train, DatasetSplit::Validation];
const TRAIN_TEST: &[DatasetSplit] = &[DatasetSplit::Train, DatasetSplit::Test];
const ALL_SPLITS: &[DatasetSplit] = &DatasetSplit::ALL;

const fn glue(name: &'static str, num_labels: usize, metrics: &'static [Metric]) -> TaskSpec {
    TaskSpec::new(
        name,
        num_labels,
        metrics,
        Source::LocalJsonl {
            splits: TRAIN_VALIDATION,
        },
    )
    .with_alias(SplitAlias::VALIDATION_AS_TEST)
}

const fn setfit(
    name: &'static str,
    repo: &'static str,
    num_labels: usize,
    metrics: &'static [Metric],
    splits: &'static [DatasetSplit],
) -> TaskSpec {
    TaskSpec::new(
        name,
        num_labels,
        metrics,
        Source::Hub {
            repo,
            splits,
            text_column: "text",
        },
    )
}

const fn survey(name: &'static str, num_labels: usize, train: &'static str, test: &'static str, fallback: usize) -> TaskSpec {
    TaskSpec::new(
        name,
        num_labels,
        &[Accuracy, F1Macro],
        Source::Csv {
            train,
            test,
            columns: CsvColumns::COMMENT,
            remap: Some(LabelRemap::new(-1, fallback)),
        },
    )
}

#[rustfmt::skip]
pub static TASKS: [TaskSpec; 19] = [
    TaskSpec::new("mr", 2, &[Accuracy], Source::LocalJson),
    TaskSpec::new("cr", 2, &[Accuracy], Source::LocalJson),
    TaskSpec::new("subj", 2, &[Accuracy], Source::LocalJson),
    TaskSpec::new("trec", 6, &[Accuracy], Source::LocalJson),
    TaskSpec::new("SST-2", 2, &[Accuracy], Source::LocalJson),
    TaskSpec::new("sst-5", 5, &[Accuracy], Source::LocalJson),
    // superglue
    glue("boolq", 2, &[Accuracy]),
    glue("rte", 2, &[Accuracy]),
    glue("cb", 3, &[Accuracy, F1Macro]),
    glue("wic", 2, &[Accuracy]),
    // glue
    glue("qqp", 2, &[Accuracy, F1]),
    glue("qnli", 2, &[Accuracy]),
    glue("mrpc", 2, &[Accuracy, F1]),
    // SetFit mirrors on the hub
    setfit("emotion", "SetFit/emotion", 6, &[Accuracy], ALL_SPLITS),
    setfit("enron_spam", "SetFit/enron_spam", 2, &[Accuracy], TRAIN_TEST),
    setfit("ag_news", "SetFit/ag_news", 4, &[Accuracy], TRAIN_TEST),
    setfit("amazon_cf", "SetFit/amazon_counterfactual_en", 2, &[Mcc], ALL_SPLITS),
    // survey exports; -1 marks the fallback class
    survey("anketa", 3, "data_files/data_train_192.csv", "data_files/data_test_192.csv", 2),
    survey("anketa_binary", 2, "data_files/data_train_128_2.csv", "data_files/data_test_128_2.csv", 0),
];
