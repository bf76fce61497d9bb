use calamine::{open_workbook, DataType, Reader, Xlsx};

use crate::table::*;

pub fn read_excel_table(path: &Path, worksheet_name: Option<&str>) -> TableResult<ParsedTable> {
    let wrange = get_range(path, worksheet_name)?;

    let mut iter = wrange.rows();
    let header: Vec<String> = iter
        .next()
        .map(|r| r.iter().map(cell_to_string).collect())
        .unwrap_or_default();
    debug!("read_excel_table: header: {:?}", header);

    let mut rows: Vec<Vec<String>> = Vec::new();
    for (idx, row) in iter.enumerate() {
        // Formatting can extend the range with rows that hold nothing.
        if row.iter().all(|c| matches!(c, DataType::Empty)) {
            debug!("read_excel_table: skipping empty row {:?}", idx + 2);
            continue;
        }
        let cells: Vec<String> = row.iter().map(cell_to_string).collect();
        debug!("read_excel_table: idx: {:?} row: {:?}", idx, &cells);
        rows.push(cells);
    }
    Ok(ParsedTable { header, rows })
}

fn get_range(path: &Path, worksheet_name: Option<&str>) -> TableResult<calamine::Range<DataType>> {
    let p = path.display().to_string();
    debug!("read_excel_file: path: {:?} worksheet: {:?}", &p, worksheet_name);
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path: p.clone() })?;

    // A worksheet name was provided, use it.
    if let Some(name) = worksheet_name {
        workbook
            .worksheet_range(name)
            .context(MissingWorksheetSnafu {
                name,
                path: p.clone(),
            })?
            .context(OpeningExcelSnafu { path: p })
    } else {
        workbook
            .worksheet_range_at(0)
            .context(EmptyExcelSnafu { path: p.clone() })?
            .context(OpeningExcelSnafu { path: p })
    }
}

// Numbers are written back in their shortest form: 250.0 becomes "250".
fn cell_to_string(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.clone(),
        DataType::Float(f) => f.to_string(),
        DataType::Int(i) => i.to_string(),
        DataType::Bool(b) => b.to_string(),
        DataType::Empty => String::new(),
        other => format!("{:?}", other),
    }
}
