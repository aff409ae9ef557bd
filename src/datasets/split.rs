use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DatasetSplit {
    Train,
    Validation,
    Test,
}

impl DatasetSplit {
    pub const ALL: [DatasetSplit; 3] = [Self::Train, Self::Validation, Self::Test];

    /// The key this split is stored under in a [`DatasetBundle`](super::DatasetBundle).
    pub fn name(&self) -> &'static str {
        match self {
            Self::Train => "train",
            Self::Validation => "validation",
            Self::Test => "test",
        }
    }
}

impl fmt::Display for DatasetSplit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DatasetSplit {
    type Err = UnknownSplitName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "train" => Ok(Self::Train),
            "validation" | "val" | "dev" => Ok(Self::Validation),
            "test" => Ok(Self::Test),
            other => Err(UnknownSplitName(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown split name {0:?}")]
pub struct UnknownSplitName(pub String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("dataset has no {0} split")]
pub struct SplitNotFoundError(pub String);
