use serde_json::Value;

pub const LABEL_COLUMN: &str = "label";

/// Maps a raw sentinel label (e.g. `-1`) onto a real class index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelRemap {
    pub from: i64,
    pub to: usize,
}

impl LabelRemap {
    pub const fn new(from: i64, to: usize) -> Self {
        Self { from, to }
    }

    fn apply(&self, raw: i64) -> i64 {
        if raw == self.from {
            self.to as i64
        } else {
            raw
        }
    }
}

/// Reads an integer label out of a JSON cell. Accepts integers, integral
/// floats (as written by pandas), numeric strings and booleans.
pub(crate) fn parse_label(value: &Value, remap: Option<LabelRemap>) -> Option<usize> {
    let raw = match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => i,
            None => integral(n.as_f64()?)?,
        },
        Value::String(s) => parse_raw(s)?,
        Value::Bool(b) => *b as i64,
        _ => return None,
    };
    to_index(raw, remap)
}

/// Same as [`parse_label`] for a CSV cell.
pub(crate) fn parse_label_str(s: &str, remap: Option<LabelRemap>) -> Option<usize> {
    to_index(parse_raw(s)?, remap)
}

fn parse_raw(s: &str) -> Option<i64> {
    let s = s.trim();
    s.parse::<i64>()
        .ok()
        .or_else(|| s.parse::<f64>().ok().and_then(integral))
}

fn integral(f: f64) -> Option<i64> {
    (f.fract() == 0.0 && f.is_finite()).then_some(f as i64)
}

fn to_index(raw: i64, remap: Option<LabelRemap>) -> Option<usize> {
    let raw = remap.map_or(raw, |r| r.apply(raw));
    usize::try_from(raw).ok()
}
