use std::path::Path;

use serde_json::{Map, Value};

use super::{
    bundle::{Example, SOURCE_COLUMN},
    errors::LoaderError,
    label::{parse_label_str, LabelRemap},
};

/// Column layout of a labelled CSV export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvColumns {
    pub text: &'static str,
    pub label: &'static str,
}

impl CsvColumns {
    /// The `comment` / `class_label` layout of survey exports.
    pub const COMMENT: CsvColumns = CsvColumns {
        text: "comment",
        label: "class_label",
    };
}

/// Loads a comma separated file into examples whose text lands in the `source` column.
pub fn load_csv_file<P: AsRef<Path>>(
    path: P,
    columns: CsvColumns,
    remap: Option<LabelRemap>,
) -> Result<Vec<Example>, LoaderError> {
    let path = path.as_ref();
    let csv_err = |source| LoaderError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let missing = |column: &str| LoaderError::MissingColumn {
        path: path.to_path_buf(),
        column: column.to_owned(),
    };

    let mut reader = csv::Reader::from_path(path).map_err(csv_err)?;
    let headers = reader.headers().map_err(csv_err)?.clone();
    let text_idx = headers
        .iter()
        .position(|h| h == columns.text)
        .ok_or_else(|| missing(columns.text))?;
    let label_idx = headers
        .iter()
        .position(|h| h == columns.label)
        .ok_or_else(|| missing(columns.label))?;

    let mut data = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(csv_err)?;
        let raw = record.get(label_idx).unwrap_or("");
        let label = parse_label_str(raw, remap).ok_or_else(|| LoaderError::InvalidLabel {
            path: path.to_path_buf(),
            row,
            value: raw.to_owned(),
        })?;
        let text = record.get(text_idx).unwrap_or("");

        let mut fields = Map::new();
        fields.insert(SOURCE_COLUMN.to_owned(), Value::String(text.to_owned()));
        data.push(Example::new(fields, label));
    }
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, body: &str) -> std::path::PathBuf {
        let path = dir.join("data.csv");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_comment_csv_with_sentinel() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "id,comment,class_label\n1,\"good, really\",1\n2,meh,-1\n3,bad,0\n",
        );
        let data = load_csv_file(&path, CsvColumns::COMMENT, Some(LabelRemap::new(-1, 2))).unwrap();
        assert_eq!(
            data,
            vec![
                Example::from_source("good, really", 1),
                Example::from_source("meh", 2),
                Example::from_source("bad", 0),
            ]
        );
    }

    #[test]
    fn test_missing_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "text,label\nhi,1\n");
        let err = load_csv_file(&path, CsvColumns::COMMENT, None).unwrap_err();
        match err {
            LoaderError::MissingColumn { column, .. } => assert_eq!(column, "comment"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_unmapped_sentinel_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "comment,class_label\nhi,-1\n");
        let err = load_csv_file(&path, CsvColumns::COMMENT, None).unwrap_err();
        assert!(matches!(err, LoaderError::InvalidLabel { row: 0, .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = load_csv_file("/nonexistent/data.csv", CsvColumns::COMMENT, None).unwrap_err();
        assert!(matches!(err, LoaderError::Csv { .. }));
    }
}
