use crate::table::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "outputFile")]
    pub output_file: Option<String>,
    #[serde(rename = "summaryFile")]
    pub summary_file: Option<String>,
    #[serde(rename = "scoreColumnName")]
    pub score_column_name: Option<String>,
    #[serde(rename = "rankColumnName")]
    pub rank_column_name: Option<String>,
}

/// The header of the JSON summary.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub input: String,
    pub alternatives: usize,
    pub criteria: usize,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct FileSource {
    #[serde(rename = "filePath")]
    pub file_path: String,
    pub provider: Option<String>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct TopsisConfig {
    #[serde(rename = "inputSource")]
    pub input_source: Option<FileSource>,
    // A comma separated string or a list.
    pub weights: Option<JSValue>,
    pub impacts: Option<JSValue>,
    #[serde(rename = "outputSettings")]
    pub output_settings: Option<OutputSettings>,
}

pub fn read_config(path: &str) -> TableResult<TopsisConfig> {
    let config_str = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: TopsisConfig = serde_json::from_str(&config_str).context(ParsingJsonSnafu {})?;
    Ok(config)
}

pub fn read_summary(path: &str) -> TableResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

/// Reads a list of weights or impacts into its comma separated form, so that
/// the command line and the configuration go through the same parser.
pub fn read_js_list(x: &Option<JSValue>, what: &str) -> TableResult<Option<String>> {
    match x {
        None => Ok(None),
        Some(JSValue::String(s)) => Ok(Some(s.clone())),
        Some(JSValue::Array(elts)) => {
            let mut items: Vec<String> = Vec::new();
            for elt in elts.iter() {
                match elt {
                    // f64 display never uses an exponent: 1e-5 becomes "0.00001".
                    JSValue::Number(n) => match n.as_f64() {
                        Some(f) => items.push(f.to_string()),
                        None => items.push(n.to_string()),
                    },
                    JSValue::String(s) => items.push(s.clone()),
                    _ => return ParsingJsonListSnafu { what }.fail(),
                }
            }
            Ok(Some(items.join(",")))
        }
        Some(_) => ParsingJsonListSnafu { what }.fail(),
    }
}
