// Primitives for reading CSV files.

use crate::table::*;

pub fn read_csv_table(path: &Path) -> TableResult<ParsedTable> {
    let p = path.display().to_string();
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .context(CsvOpenSnafu { path: p })?;

    let header: Vec<String> = rdr
        .headers()
        .context(CsvLineParseSnafu { lineno: 1usize })?
        .iter()
        .map(|s| s.to_string())
        .collect();
    debug!("read_csv_table: header: {:?}", header);

    let mut rows: Vec<Vec<String>> = Vec::new();
    for (idx, line_r) in rdr.records().enumerate() {
        let lineno = idx + 2;
        // Rows of a different length than the header are rejected by the reader.
        let line = line_r.context(CsvLineParseSnafu { lineno })?;
        debug!("read_csv_table: lineno: {:?} row: {:?}", lineno, &line);
        rows.push(line.iter().map(|s| s.to_string()).collect());
    }
    Ok(ParsedTable { header, rows })
}
