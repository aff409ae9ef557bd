use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::split::{DatasetSplit, SplitNotFoundError};

/// Column holding the text of single-sentence tasks.
pub const SOURCE_COLUMN: &str = "source";

/// One labeled instance. `fields` is an opaque payload; the sampler only reads `label`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Example {
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    pub label: usize,
}

impl Example {
    pub fn new(fields: Map<String, Value>, label: usize) -> Self {
        Self { fields, label }
    }

    pub fn from_source<S: Into<String>>(source: S, label: usize) -> Self {
        let mut fields = Map::new();
        fields.insert(SOURCE_COLUMN.to_owned(), Value::String(source.into()));
        Self { fields, label }
    }

    pub fn source(&self) -> Option<&str> {
        self.fields.get(SOURCE_COLUMN).and_then(Value::as_str)
    }
}

/// Named splits of one task, e.g. `train`, `validation`, `test`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetBundle {
    splits: BTreeMap<String, Vec<Example>>,
}

impl DatasetBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_split<S: Into<String>>(mut self, name: S, examples: Vec<Example>) -> Self {
        self.insert(name, examples);
        self
    }

    /// Replaces the split, returning the previous contents if any.
    pub fn insert<S: Into<String>>(&mut self, name: S, examples: Vec<Example>) -> Option<Vec<Example>> {
        self.splits.insert(name.into(), examples)
    }

    pub fn get(&self, name: &str) -> Option<&[Example]> {
        self.splits.get(name).map(Vec::as_slice)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Vec<Example>> {
        self.splits.get_mut(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Vec<Example>> {
        self.splits.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.splits.contains_key(name)
    }

    pub fn split(&self, split: DatasetSplit) -> Result<&[Example], SplitNotFoundError> {
        self.get(split.name())
            .ok_or_else(|| SplitNotFoundError(split.name().to_owned()))
    }

    pub fn split_names(&self) -> impl Iterator<Item = &str> {
        self.splits.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Example])> {
        self.splits.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of splits.
    pub fn len(&self) -> usize {
        self.splits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.splits.is_empty()
    }

    /// Copies split `from` over split `to`.
    pub fn alias(&mut self, from: &str, to: &str) -> Result<(), SplitNotFoundError> {
        let examples = self
            .splits
            .get(from)
            .cloned()
            .ok_or_else(|| SplitNotFoundError(from.to_owned()))?;
        self.splits.insert(to.to_owned(), examples);
        Ok(())
    }

    /// Renames a payload column in every example of every split.
    pub fn rename_column(&mut self, from: &str, to: &str) {
        for example in self.splits.values_mut().flatten() {
            if let Some(value) = example.fields.remove(from) {
                example.fields.insert(to.to_owned(), value);
            }
        }
    }

    /// Per-label example counts of a split, or `None` if the split is absent.
    pub fn label_counts(&self, name: &str) -> Option<BTreeMap<usize, usize>> {
        self.splits.get(name).map(|examples| {
            let mut counts = BTreeMap::new();
            for ex in examples {
                *counts.entry(ex.label).or_insert(0) += 1;
            }
            counts
        })
    }

    pub(crate) fn split_sizes(&self) -> BTreeMap<String, usize> {
        self.splits.iter().map(|(k, v)| (k.clone(), v.len())).collect()
    }
}

impl std::ops::Index<&str> for DatasetBundle {
    type Output = [Example];
    fn index(&self, name: &str) -> &Self::Output {
        &self.splits[name]
    }
}

impl IntoIterator for DatasetBundle {
    type Item = (String, Vec<Example>);
    type IntoIter = std::collections::btree_map::IntoIter<String, Vec<Example>>;

    fn into_iter(self) -> Self::IntoIter {
        self.splits.into_iter()
    }
}

impl FromIterator<(String, Vec<Example>)> for DatasetBundle {
    fn from_iter<I: IntoIterator<Item = (String, Vec<Example>)>>(iter: I) -> Self {
        Self {
            splits: iter.into_iter().collect(),
        }
    }
}
