use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use serde_json::{Map, Value};

use super::{
    bundle::Example,
    errors::LoaderError,
    label::{parse_label, LabelRemap, LABEL_COLUMN},
};

/// Loads examples from a JSON file. Both a top-level array of objects and
/// JSON lines are accepted; files ending in `.gz` are decompressed first.
pub fn load_json_file<P: AsRef<Path>>(
    path: P,
    remap: Option<LabelRemap>,
) -> Result<Vec<Example>, LoaderError> {
    let path = path.as_ref();
    let io_err = |source| LoaderError::Io {
        path: path.to_path_buf(),
        source,
    };

    let f = File::open(path).map_err(io_err)?;
    let mut text = String::new();
    if path.extension().is_some_and(|e| e == "gz") {
        flate2::read::GzDecoder::new(BufReader::new(f))
            .read_to_string(&mut text)
            .map_err(io_err)?;
    } else {
        BufReader::new(f).read_to_string(&mut text).map_err(io_err)?;
    }

    parse_json_examples(&text, path, remap)
}

pub(crate) fn parse_json_examples(
    text: &str,
    path: &Path,
    remap: Option<LabelRemap>,
) -> Result<Vec<Example>, LoaderError> {
    let json_err = |line, source| LoaderError::Json {
        path: path.to_path_buf(),
        line,
        source,
    };

    if text.trim_start().starts_with('[') {
        let rows: Vec<Map<String, Value>> =
            serde_json::from_str(text).map_err(|e| json_err(e.line(), e))?;
        return rows
            .into_iter()
            .enumerate()
            .map(|(i, row)| to_example(row, i, path, remap))
            .collect();
    }

    let mut data = Vec::new();
    for (i, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let row: Map<String, Value> = serde_json::from_str(line).map_err(|e| json_err(i + 1, e))?;
        data.push(to_example(row, i, path, remap)?);
    }
    Ok(data)
}

fn to_example(
    mut row: Map<String, Value>,
    index: usize,
    path: &Path,
    remap: Option<LabelRemap>,
) -> Result<Example, LoaderError> {
    let raw = row
        .remove(LABEL_COLUMN)
        .ok_or_else(|| LoaderError::MissingColumn {
            path: path.to_path_buf(),
            column: LABEL_COLUMN.to_owned(),
        })?;
    let label = parse_label(&raw, remap).ok_or_else(|| LoaderError::InvalidLabel {
        path: path.to_path_buf(),
        row: index,
        value: raw.to_string(),
    })?;
    Ok(Example::new(row, label))
}
