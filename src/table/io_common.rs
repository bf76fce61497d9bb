use std::path::{Path, PathBuf};

use snafu::prelude::*;
use topsis::TopsisResult;

use crate::table::{CsvWriteSnafu, ParsedTable, TableResult, WritingFileSnafu};

pub fn simplify_file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string()
}

/// `result_<input name>.csv`, next to the input.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("input");
    input.with_file_name(format!("result_{}.csv", stem))
}

/// Writes the input table with the score and rank columns appended.
pub fn write_result_table(
    path: &Path,
    table: &ParsedTable,
    result: &TopsisResult,
    score_column_name: &str,
    rank_column_name: &str,
) -> TableResult<()> {
    let p = path.display().to_string();
    let mut wtr = csv::Writer::from_path(path).context(CsvWriteSnafu { path: p.clone() })?;

    let mut header = table.header.clone();
    header.push(score_column_name.to_string());
    header.push(rank_column_name.to_string());
    wtr.write_record(&header)
        .context(CsvWriteSnafu { path: p.clone() })?;

    for ((row, score), rank) in table
        .rows
        .iter()
        .zip(result.scores.iter())
        .zip(result.ranks.iter())
    {
        let mut record = row.clone();
        record.push(score.to_string());
        record.push(rank.to_string());
        wtr.write_record(&record)
            .context(CsvWriteSnafu { path: p.clone() })?;
    }
    wtr.flush().context(WritingFileSnafu { path: p })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_names() {
        let input = Path::new("/data/mobiles.csv");
        assert_eq!(simplify_file_name(input), "mobiles.csv");
        assert_eq!(
            default_output_path(input),
            PathBuf::from("/data/result_mobiles.csv")
        );
        assert_eq!(
            default_output_path(Path::new("sheet.xlsx")),
            PathBuf::from("result_sheet.csv")
        );
    }

    #[test]
    fn appends_columns() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("out.csv");
        let table = ParsedTable {
            header: vec!["id".to_string(), "a".to_string(), "b".to_string()],
            rows: vec![
                vec!["x".to_string(), "1".to_string(), "2".to_string()],
                vec!["y".to_string(), "3".to_string(), "4".to_string()],
            ],
        };
        let result = TopsisResult {
            scores: vec![0.25, 0.75],
            ranks: vec![2, 1],
            ideal_best: vec![],
            ideal_worst: vec![],
            dist_best: vec![],
            dist_worst: vec![],
        };
        write_result_table(&p, &table, &result, "Topsis Score", "Rank").unwrap();
        let content = std::fs::read_to_string(&p).unwrap();
        assert_eq!(content, "id,a,b,Topsis Score,Rank\nx,1,2,0.25,2\ny,3,4,0.75,1\n");
    }
}
