use crate::ir::Series;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

static SAMPLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<name>[A-Za-z_:][A-Za-z0-9_:]*)\s*(?:\{(?P<labels>.*)\})?\s+(?P<value>\S+)(?:\s+\S+)?$")
        .unwrap()
});
static LABEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\s*(?P<key>[A-Za-z_][A-Za-z0-9_]*)\s*=\s*"(?P<value>(?:[^"\\]|\\.)*)"\s*(?:,|$)"#).unwrap());

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),
    #[error("line {line}: expected `metric{{label=\"value\",...}} value`, got `{text}`")]
    MalformedSample { line: usize, text: String },
    #[error("line {line}: malformed label set `{text}`")]
    MalformedLabels { line: usize, text: String },
    #[error("line {line}: `{text}` is not a number")]
    InvalidValue { line: usize, text: String },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeriesJson {
    #[serde(default)]
    ref_id: Option<String>,
    #[serde(default)]
    labels: BTreeMap<String, String>,
    values: Option<Vec<Option<f64>>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InputJson {
    List(Vec<SeriesJson>),
    Wrapped { series: Vec<SeriesJson> },
}

/// Decodes JSON (leading `[` or `{`) or text exposition input into series.
pub fn parse_input(input: &str) -> Result<Vec<Series>, ParseError> {
    let trimmed = input.trim_start();
    let series = if trimmed.starts_with('[') || trimmed.starts_with('{') {
        parse_json(trimmed)?
    } else {
        parse_exposition(input)?
    };
    debug!(series = series.len(), "parsed input");
    Ok(series)
}

pub fn parse_json(input: &str) -> Result<Vec<Series>, ParseError> {
    let list = match serde_json::from_str::<InputJson>(input)? {
        InputJson::List(list) => list,
        InputJson::Wrapped { series } => series,
    };
    Ok(list
        .into_iter()
        .enumerate()
        .filter_map(|(idx, item)| {
            let values = item.values?;
            Some(Series {
                ref_id: item.ref_id.unwrap_or_else(|| series_ref_id(idx)),
                labels: item.labels,
                values,
            })
        })
        .collect())
}

/// Text exposition format: one `metric{k="v",...} value [timestamp]` per line.
pub fn parse_exposition(input: &str) -> Result<Vec<Series>, ParseError> {
    let mut series = Vec::new();
    for (idx, raw) in input.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let caps = SAMPLE_RE
            .captures(line)
            .ok_or_else(|| ParseError::MalformedSample {
                line: line_no,
                text: line.to_string(),
            })?;
        let labels = match caps.name("labels") {
            Some(m) => parse_labels(m.as_str(), line_no)?,
            None => BTreeMap::new(),
        };
        let value_text = &caps["value"];
        let value = parse_value(value_text).ok_or_else(|| ParseError::InvalidValue {
            line: line_no,
            text: value_text.to_string(),
        })?;
        series.push(Series {
            ref_id: caps["name"].to_string(),
            labels,
            values: vec![value],
        });
    }
    Ok(series)
}

fn parse_labels(text: &str, line: usize) -> Result<BTreeMap<String, String>, ParseError> {
    let mut labels = BTreeMap::new();
    let mut consumed = 0;
    for caps in LABEL_RE.captures_iter(text) {
        let whole = caps.get(0).map(|m| m.range()).unwrap_or(0..0);
        if whole.start != consumed {
            break;
        }
        consumed = whole.end;
        labels.insert(caps["key"].to_string(), unescape(&caps["value"]));
    }
    if text[consumed..].trim().is_empty() {
        Ok(labels)
    } else {
        Err(ParseError::MalformedLabels {
            line,
            text: text.to_string(),
        })
    }
}

fn parse_value(text: &str) -> Option<Option<f64>> {
    match text {
        "NaN" | "null" => Some(None),
        "+Inf" => Some(Some(f64::INFINITY)),
        "-Inf" => Some(Some(f64::NEG_INFINITY)),
        other => other.parse::<f64>().ok().map(Some),
    }
}

fn unescape(value: &str) -> String {
    value
        .replace("\\\"", "\"")
        .replace("\\n", "\n")
        .replace("\\\\", "\\")
}

fn series_ref_id(index: usize) -> String {
    // A, B, ..., Z, AA, AB, ... like query letters.
    let mut n = index;
    let mut out = Vec::new();
    loop {
        out.push(b'A' + (n % 26) as u8);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}
