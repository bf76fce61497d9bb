use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};
use topsis::*;

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::table::config_reader::*;
use crate::table::io_common::{default_output_path, simplify_file_name, write_result_table};

pub mod config_reader;
pub mod io_common;
mod io_csv;
mod io_excel;

#[derive(Debug, Snafu)]
pub enum TableError {
    #[snafu(display("The file '{path}' does not exist."))]
    MissingFile { path: String },
    #[snafu(display("Input file must be a .csv or .xlsx file (got {path:?})."))]
    UnsupportedInputType { path: String },
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("Worksheet {name:?} not found in {path}"))]
    MissingWorksheet { name: String, path: String },
    #[snafu(display("The file {path} does not contain any worksheet"))]
    EmptyExcel { path: String },
    #[snafu(display("Error opening file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading line {lineno}"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("Error writing file {path}"))]
    CsvWrite { source: csv::Error, path: String },
    #[snafu(display("Error reading file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Could not read {what} from the configuration: expected a string or a list"))]
    ParsingJsonList { what: String },
    #[snafu(display("Error writing file {path}"))]
    WritingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display(
        "Input file must contain at least 3 columns (1 ID column + 2 or more numeric columns), found {found}."
    ))]
    TooFewColumns { found: usize },
    #[snafu(display("Input file must contain at least 2 rows of data, found {found}."))]
    TooFewRows { found: usize },
    #[snafu(display(
        "Columns from 2nd to last must contain numeric values only (line {lineno}, column {column:?}: {content:?})."
    ))]
    NonNumericCell {
        lineno: usize,
        column: String,
        content: String,
    },
    #[snafu(display("Weights must be numeric values separated by commas (got {weights:?})."))]
    MalformedWeights { weights: String },
    #[snafu(display("Impacts must be either '+' or '-' (got {impacts:?})."))]
    MalformedImpacts { impacts: String },
    #[snafu(display("Missing {what}: provide it on the command line or in the configuration file."))]
    MissingSetting { what: String },
    #[snafu(display("{source}"))]
    Topsis { source: TopsisErrors },
    #[snafu(display("Difference detected between computed summary and reference summary"))]
    ReferenceMismatch {},
}

pub type TableResult<T> = Result<T, TableError>;

/// A table, as parsed by the readers.
/// Cells are kept as text so that the result table repeats them verbatim.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ParsedTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// A table that passed the checks: the first column holds the identifiers,
/// the other columns are the criteria.
#[derive(PartialEq, Debug, Clone)]
pub struct CheckedTable {
    pub ids: Vec<String>,
    pub criteria_names: Vec<String>,
    pub matrix: DecisionMatrix,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum InputType {
    Csv,
    Xlsx,
}

impl InputType {
    fn from_name(name: &str) -> Option<InputType> {
        match name.to_lowercase().as_str() {
            "csv" => Some(InputType::Csv),
            "xlsx" | "excel" => Some(InputType::Xlsx),
            _ => None,
        }
    }

    fn from_path(path: &Path) -> Option<InputType> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(InputType::from_name)
    }
}

/// Everything needed for one run, after merging the command line and the
/// configuration file.
#[derive(PartialEq, Debug, Clone)]
pub struct RunSettings {
    pub input_path: PathBuf,
    pub input_type: InputType,
    pub excel_worksheet_name: Option<String>,
    pub weights: String,
    pub impacts: String,
    pub output_path: PathBuf,
    pub summary: Option<String>,
    pub reference: Option<String>,
    pub score_column_name: String,
    pub rank_column_name: String,
}

#[derive(PartialEq, Debug, Clone)]
pub struct AnalysisOutcome {
    pub output_path: PathBuf,
    pub result: TopsisResult,
}

pub fn parse_weights(weights: &str) -> TableResult<Vec<f64>> {
    let mut res: Vec<f64> = Vec::new();
    for token in weights.split(',') {
        let t = token.trim();
        ensure!(is_plain_decimal(t), MalformedWeightsSnafu { weights });
        let w = t
            .parse::<f64>()
            .ok()
            .context(MalformedWeightsSnafu { weights })?;
        res.push(w);
    }
    Ok(res)
}

// Digits with at most one decimal point: no sign, no exponent.
fn is_plain_decimal(s: &str) -> bool {
    s.chars().any(|c| c.is_ascii_digit())
        && s.chars().all(|c| c.is_ascii_digit() || c == '.')
        && s.matches('.').count() <= 1
}

pub fn parse_impacts(impacts: &str) -> TableResult<Vec<Impact>> {
    impacts
        .split(',')
        .map(|t| {
            t.trim()
                .parse::<Impact>()
                .ok()
                .context(MalformedImpactsSnafu { impacts })
        })
        .collect()
}

pub fn validate_table(table: &ParsedTable) -> TableResult<CheckedTable> {
    let num_columns = table.header.len();
    ensure!(num_columns >= 3, TooFewColumnsSnafu { found: num_columns });
    ensure!(
        table.rows.len() >= 2,
        TooFewRowsSnafu {
            found: table.rows.len()
        }
    );

    let mut ids: Vec<String> = Vec::new();
    let mut rows: Vec<Vec<f64>> = Vec::new();
    for (idx, row) in table.rows.iter().enumerate() {
        // The header is line 1.
        let lineno = idx + 2;
        ids.push(row.first().cloned().unwrap_or_default());
        let mut values: Vec<f64> = Vec::new();
        for (col, cell) in row.iter().enumerate().skip(1) {
            match cell.trim().parse::<f64>() {
                Ok(v) => values.push(v),
                Err(_) => {
                    return NonNumericCellSnafu {
                        lineno,
                        column: table.header.get(col).cloned().unwrap_or_default(),
                        content: cell.clone(),
                    }
                    .fail();
                }
            }
        }
        rows.push(values);
    }
    debug!("validate_table: ids: {:?}", ids);

    let matrix = DecisionMatrix::new(rows).context(TopsisSnafu {})?;
    Ok(CheckedTable {
        ids,
        criteria_names: table.header[1..].to_vec(),
        matrix,
    })
}

fn read_table(settings: &RunSettings) -> TableResult<ParsedTable> {
    info!("Attempting to read table {:?}", settings.input_path);
    let table = match settings.input_type {
        InputType::Csv => io_csv::read_csv_table(&settings.input_path)?,
        InputType::Xlsx => io_excel::read_excel_table(
            &settings.input_path,
            settings.excel_worksheet_name.as_deref(),
        )?,
    };
    info!(
        "Read {} rows and {} columns from {:?}",
        table.rows.len(),
        table.header.len(),
        settings.input_path
    );
    Ok(table)
}

fn resolve_settings(args: &Args) -> TableResult<RunSettings> {
    let (config, root) = match &args.config {
        Some(config_path) => {
            let config = read_config(config_path)?;
            info!("config: {:?}", config);
            let root = Path::new(config_path)
                .parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_default();
            (Some(config), root)
        }
        None => (None, PathBuf::new()),
    };
    let source = config.as_ref().and_then(|c| c.input_source.clone());
    let output_settings = config
        .as_ref()
        .and_then(|c| c.output_settings.clone())
        .unwrap_or_default();

    let input_path: PathBuf = match (&args.input, &source) {
        (Some(p), _) => PathBuf::from(p),
        (None, Some(s)) => root.join(&s.file_path),
        (None, None) => {
            return MissingSettingSnafu {
                what: "input file",
            }
            .fail()
        }
    };
    ensure!(
        input_path.exists(),
        MissingFileSnafu {
            path: input_path.display().to_string()
        }
    );

    let type_name = args
        .input_type
        .clone()
        .or_else(|| source.as_ref().and_then(|s| s.provider.clone()));
    let input_type = match type_name {
        Some(name) => InputType::from_name(&name),
        None => InputType::from_path(&input_path),
    }
    .context(UnsupportedInputTypeSnafu {
        path: input_path.display().to_string(),
    })?;

    let weights = match &args.weights {
        Some(w) => w.clone(),
        None => read_js_list(&config.as_ref().and_then(|c| c.weights.clone()), "weights")?
            .context(MissingSettingSnafu { what: "weights" })?,
    };
    let impacts = match &args.impacts {
        Some(i) => i.clone(),
        None => read_js_list(&config.as_ref().and_then(|c| c.impacts.clone()), "impacts")?
            .context(MissingSettingSnafu { what: "impacts" })?,
    };

    let output_path = match (&args.result, &output_settings.output_file) {
        (Some(p), _) => PathBuf::from(p),
        (None, Some(p)) => root.join(p),
        (None, None) => default_output_path(&input_path),
    };

    let summary = match (&args.summary, &output_settings.summary_file) {
        (Some(s), _) => Some(s.clone()),
        (None, Some(s)) if s == "stdout" => Some(s.clone()),
        (None, Some(s)) => Some(root.join(s).display().to_string()),
        (None, None) => None,
    };

    Ok(RunSettings {
        input_path,
        input_type,
        excel_worksheet_name: args
            .excel_worksheet_name
            .clone()
            .or_else(|| source.and_then(|s| s.excel_worksheet_name)),
        weights,
        impacts,
        output_path,
        summary,
        reference: args.reference.clone(),
        score_column_name: output_settings
            .score_column_name
            .unwrap_or_else(|| "Topsis Score".to_string()),
        rank_column_name: output_settings
            .rank_column_name
            .unwrap_or_else(|| "Rank".to_string()),
    })
}

fn build_summary_js(
    settings: &RunSettings,
    checked: &CheckedTable,
    weights: &[f64],
    impacts: &[Impact],
    result: &TopsisResult,
) -> JSValue {
    let c = OutputConfig {
        input: simplify_file_name(&settings.input_path),
        alternatives: checked.matrix.num_rows(),
        criteria: checked.matrix.num_criteria(),
    };

    let criteria: Vec<JSValue> = checked
        .criteria_names
        .iter()
        .enumerate()
        .map(|(j, name)| {
            json!({
                "name": name,
                "weight": weights[j],
                "impact": impacts[j].symbol(),
                "idealBest": result.ideal_best[j],
                "idealWorst": result.ideal_worst[j],
            })
        })
        .collect();

    let results: Vec<JSValue> = checked
        .ids
        .iter()
        .enumerate()
        .map(|(i, id)| {
            json!({
                "id": id,
                "score": result.scores[i],
                "rank": result.ranks[i],
                "distanceBest": result.dist_best[i],
                "distanceWorst": result.dist_worst[i],
            })
        })
        .collect();

    json!({ "config": c, "criteria": criteria, "results": results })
}

fn check_reference(pretty_js_stats: &str, reference_path: &str) -> TableResult<()> {
    let summary_ref = read_summary(reference_path)?;
    debug!("summary: {:?}", summary_ref);
    // Both sides go through the same parser, so that numbers compare equal.
    let stats: JSValue = serde_json::from_str(pretty_js_stats).context(ParsingJsonSnafu {})?;
    let pretty_js_stats = serde_json::to_string_pretty(&stats).context(ParsingJsonSnafu {})?;
    let pretty_js_summary_ref =
        serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
    if pretty_js_summary_ref != pretty_js_stats {
        warn!("Found differences with the reference summary");
        print_diff(
            pretty_js_summary_ref.as_str(),
            pretty_js_stats.as_ref(),
            "\n",
        );
        return ReferenceMismatchSnafu {}.fail();
    }
    Ok(())
}

pub fn run_analysis(args: &Args) -> TableResult<AnalysisOutcome> {
    let settings = resolve_settings(args)?;
    info!("settings: {:?}", settings);

    let table = read_table(&settings)?;
    let checked = validate_table(&table)?;

    let weights = parse_weights(&settings.weights)?;
    let impacts = parse_impacts(&settings.impacts)?;
    debug!("weights: {:?} impacts: {:?}", weights, impacts);

    let result = run_topsis(&checked.matrix, &weights, &impacts).context(TopsisSnafu {})?;
    debug!("result: {:?}", result);

    write_result_table(
        &settings.output_path,
        &table,
        &result,
        &settings.score_column_name,
        &settings.rank_column_name,
    )?;
    info!("Wrote result table to {:?}", settings.output_path);

    let summary_js = build_summary_js(&settings, &checked, &weights, &impacts, &result);
    let pretty_js_stats = serde_json::to_string_pretty(&summary_js).context(ParsingJsonSnafu {})?;
    match settings.summary.as_deref() {
        Some("stdout") => {
            println!("{}", pretty_js_stats);
        }
        Some(path) => {
            info!("Writing summary to {:?}", path);
            fs::write(path, &pretty_js_stats).context(WritingFileSnafu { path })?;
        }
        None => {}
    }

    // The reference summary, if provided for comparison
    if let Some(reference_path) = &settings.reference {
        check_reference(&pretty_js_stats, reference_path)?;
    }

    Ok(AnalysisOutcome {
        output_path: settings.output_path,
        result,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOBILES: &str = "Model,Price,Storage,Camera,Looks\n\
                           M1,250,16,12,5\n\
                           M2,200,16,8,3\n\
                           M3,300,32,16,4\n\
                           M4,275,32,8,4\n\
                           M5,225,16,16,2\n";

    fn table(rows: &[&[&str]]) -> ParsedTable {
        ParsedTable {
            header: rows[0].iter().map(|s| s.to_string()).collect(),
            rows: rows[1..]
                .iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    fn write_mobiles(dir: &Path) -> PathBuf {
        let p = dir.join("mobiles.csv");
        fs::write(&p, MOBILES).unwrap();
        p
    }

    fn mobiles_args(input: &Path) -> Args {
        Args {
            input: Some(input.display().to_string()),
            weights: Some("1,1,1,1".to_string()),
            impacts: Some("+,+,+,-".to_string()),
            ..Args::default()
        }
    }

    fn read_output(path: &Path) -> Vec<Vec<String>> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_path(path)
            .unwrap();
        rdr.records()
            .map(|r| r.unwrap().iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn weights_parsing() {
        assert_eq!(parse_weights("1,1,0.5,2").unwrap(), vec![1.0, 1.0, 0.5, 2.0]);
        assert_eq!(parse_weights(" 1, .5 ,3.").unwrap(), vec![1.0, 0.5, 3.0]);
        for bad in ["1,-1", "1,a", "1e3", "", "1,,2", "1.2.3", "."] {
            assert!(
                matches!(parse_weights(bad), Err(TableError::MalformedWeights { .. })),
                "accepted {:?}",
                bad
            );
        }
    }

    #[test]
    fn impacts_parsing() {
        assert_eq!(
            parse_impacts("+,-, +").unwrap(),
            vec![Impact::Benefit, Impact::Cost, Impact::Benefit]
        );
        for bad in ["+,*", "+,,-", "", "++"] {
            assert!(
                matches!(parse_impacts(bad), Err(TableError::MalformedImpacts { .. })),
                "accepted {:?}",
                bad
            );
        }
    }

    #[test]
    fn table_checks() {
        let t = table(&[&["id", "a"], &["x", "1"], &["y", "2"]]);
        assert!(matches!(
            validate_table(&t),
            Err(TableError::TooFewColumns { found: 2 })
        ));

        let t = table(&[&["id", "a", "b"], &["x", "1", "2"]]);
        assert!(matches!(
            validate_table(&t),
            Err(TableError::TooFewRows { found: 1 })
        ));

        let t = table(&[&["id", "a", "b"], &["x", "1", "2"], &["y", "3", "abc"]]);
        match validate_table(&t) {
            Err(TableError::NonNumericCell {
                lineno,
                column,
                content,
            }) => {
                assert_eq!(lineno, 3);
                assert_eq!(column, "b");
                assert_eq!(content, "abc");
            }
            x => panic!("unexpected {:?}", x),
        }

        let t = table(&[&["id", "a", "b"], &["x", " 1", "2.5"], &["y", "3", "4"]]);
        let checked = validate_table(&t).unwrap();
        assert_eq!(checked.ids, vec!["x", "y"]);
        assert_eq!(checked.criteria_names, vec!["a", "b"]);
        assert_eq!(checked.matrix.rows()[0], vec![1.0, 2.5]);
    }

    #[test]
    fn end_to_end_csv() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_mobiles(dir.path());

        let outcome = run_analysis(&mobiles_args(&input)).unwrap();
        assert_eq!(outcome.output_path, dir.path().join("result_mobiles.csv"));
        assert_eq!(outcome.result.ranks, vec![5, 4, 1, 3, 2]);

        let lines = read_output(&outcome.output_path);
        assert_eq!(
            lines[0],
            vec!["Model", "Price", "Storage", "Camera", "Looks", "Topsis Score", "Rank"]
        );
        assert_eq!(lines[3][0], "M3");
        assert_eq!(lines[3][1], "300");
        let ranks: Vec<&str> = lines[1..].iter().map(|l| l[6].as_str()).collect();
        assert_eq!(ranks, vec!["5", "4", "1", "3", "2"]);
        let score: f64 = lines[3][5].parse().unwrap();
        assert_eq!(score, outcome.result.scores[2]);
    }

    #[test]
    fn end_to_end_excel() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("devices.xlsx");
        fs::copy(
            Path::new(env!("CARGO_MANIFEST_DIR")).join("testdata/mobiles.xlsx"),
            &input,
        )
        .unwrap();

        // The first worksheet holds the same table as MOBILES.
        let args = Args {
            input_type: Some("xlsx".to_string()),
            ..mobiles_args(&input)
        };
        let outcome = run_analysis(&args).unwrap();
        assert_eq!(outcome.output_path, dir.path().join("result_devices.csv"));
        assert_eq!(outcome.result.ranks, vec![5, 4, 1, 3, 2]);
        let lines = read_output(&outcome.output_path);
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[3][..2], ["M3", "300"]);

        let args = Args {
            input: Some(input.display().to_string()),
            weights: Some("1,1".to_string()),
            impacts: Some("-,+".to_string()),
            excel_worksheet_name: Some("Laptops".to_string()),
            result: Some(dir.path().join("laptops.csv").display().to_string()),
            ..Args::default()
        };
        let outcome = run_analysis(&args).unwrap();
        assert_eq!(outcome.result.ranks, vec![2, 3, 1]);
        let lines = read_output(&outcome.output_path);
        assert_eq!(lines[0], vec!["Name", "Price", "Battery", "Topsis Score", "Rank"]);

        let args = Args {
            excel_worksheet_name: Some("Tablets".to_string()),
            ..mobiles_args(&input)
        };
        assert!(matches!(
            run_analysis(&args),
            Err(TableError::MissingWorksheet { .. })
        ));
    }

    #[test]
    fn mismatched_weights_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_mobiles(dir.path());
        let args = Args {
            weights: Some("1,1,1".to_string()),
            ..mobiles_args(&input)
        };
        let err = run_analysis(&args).unwrap_err();
        assert!(matches!(
            err,
            TableError::Topsis {
                source: TopsisErrors::WeightCountMismatch {
                    weights: 3,
                    criteria: 4
                }
            }
        ));
        assert_eq!(
            err.to_string(),
            "Number of weights (3) does not match number of criteria (4)."
        );
    }

    #[test]
    fn input_file_checks() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.csv");
        assert!(matches!(
            run_analysis(&mobiles_args(&missing)),
            Err(TableError::MissingFile { .. })
        ));

        let txt = dir.path().join("data.txt");
        fs::write(&txt, MOBILES).unwrap();
        assert!(matches!(
            run_analysis(&mobiles_args(&txt)),
            Err(TableError::UnsupportedInputType { .. })
        ));

        // An explicit input type bypasses the extension.
        let args = Args {
            input_type: Some("csv".to_string()),
            result: Some(dir.path().join("out.csv").display().to_string()),
            ..mobiles_args(&txt)
        };
        assert!(run_analysis(&args).is_ok());

        assert!(matches!(
            run_analysis(&Args::default()),
            Err(TableError::MissingSetting { .. })
        ));
    }

    #[test]
    fn summary_and_reference() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_mobiles(dir.path());
        let summary_path = dir.path().join("summary.json");
        let args = Args {
            summary: Some(summary_path.display().to_string()),
            ..mobiles_args(&input)
        };
        run_analysis(&args).unwrap();

        let summary = read_summary(&summary_path.display().to_string()).unwrap();
        assert_eq!(summary["config"]["input"], "mobiles.csv");
        assert_eq!(summary["criteria"][3]["impact"], "-");
        assert_eq!(summary["results"][2]["id"], "M3");
        assert_eq!(summary["results"][2]["rank"], 1);

        // Comparing against itself succeeds.
        let args = Args {
            reference: Some(summary_path.display().to_string()),
            ..mobiles_args(&input)
        };
        run_analysis(&args).unwrap();

        // Any change is detected.
        let mut altered = summary.clone();
        altered["results"][2]["rank"] = json!(2);
        let altered_path = dir.path().join("altered.json");
        fs::write(&altered_path, altered.to_string()).unwrap();
        let args = Args {
            reference: Some(altered_path.display().to_string()),
            ..mobiles_args(&input)
        };
        assert!(matches!(
            run_analysis(&args),
            Err(TableError::ReferenceMismatch {})
        ));
    }

    #[test]
    fn config_file() {
        let dir = tempfile::tempdir().unwrap();
        write_mobiles(dir.path());
        let config_path = dir.path().join("config.json");
        let config = json!({
            "inputSource": {"filePath": "mobiles.csv"},
            "weights": [1, 1, 1, 1],
            "impacts": "+,+,+,+",
            "outputSettings": {
                "outputFile": "ranked.csv",
                "scoreColumnName": "Score"
            }
        });
        fs::write(&config_path, config.to_string()).unwrap();

        // The command line overrides the impacts of the configuration.
        let args = Args {
            config: Some(config_path.display().to_string()),
            impacts: Some("+,+,+,-".to_string()),
            ..Args::default()
        };
        let outcome = run_analysis(&args).unwrap();
        assert_eq!(outcome.output_path, dir.path().join("ranked.csv"));
        assert_eq!(outcome.result.ranks, vec![5, 4, 1, 3, 2]);

        let lines = read_output(&outcome.output_path);
        assert_eq!(lines[0][5], "Score");
        assert_eq!(lines[0][6], "Rank");
    }

    #[test]
    fn config_lists() {
        assert_eq!(
            read_js_list(&Some(json!([1, 0.5, "2"])), "weights").unwrap(),
            Some("1,0.5,2".to_string())
        );
        assert_eq!(
            read_js_list(&Some(json!("+,-")), "impacts").unwrap(),
            Some("+,-".to_string())
        );
        let exponents = read_js_list(&Some(json!([1e-5, 2.5e3, 1])), "weights")
            .unwrap()
            .unwrap();
        assert_eq!(exponents, "0.00001,2500,1");
        assert_eq!(parse_weights(&exponents).unwrap(), vec![1e-5, 2500.0, 1.0]);
        assert_eq!(read_js_list(&None, "impacts").unwrap(), None);
        assert!(matches!(
            read_js_list(&Some(json!({"a": 1})), "weights"),
            Err(TableError::ParsingJsonList { .. })
        ));
    }
}
