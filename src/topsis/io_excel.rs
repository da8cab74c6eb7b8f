// Primitives for reading Excel workbooks.

use calamine::{open_workbook, DataType, Reader, Xlsx};
use topsis_rank::{RawCell, RawTable};

use crate::topsis::*;

/// Reads a worksheet: the first row is the header, the following rows are the data.
///
/// Only the columns covered by the header are read.
pub fn read_excel_table(path: &str, worksheet_name: Option<&str>) -> RunResult<RawTable> {
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;
    let wrange = match worksheet_name {
        Some(name) => workbook
            .worksheet_range(name)
            .context(MissingWorksheetSnafu { name })?,
        None => workbook.worksheet_range_at(0).context(EmptyExcelSnafu {})?,
    }
    .context(OpeningExcelSnafu { path })?;

    let mut iter = wrange.rows();
    let header = iter.next().context(EmptyExcelSnafu {})?;
    let headers: Vec<String> = header.iter().map(|c| read_cell(c).to_string()).collect();
    debug!("read_excel_table: header: {:?}", headers);

    let mut rows: Vec<Vec<RawCell>> = Vec::new();
    for (idx, row) in iter.enumerate() {
        let cells: Vec<RawCell> = row.iter().take(headers.len()).map(read_cell).collect();
        debug!("read_excel_table: idx: {:?} row: {:?}", idx, cells);
        rows.push(cells);
    }
    Ok(RawTable { headers, rows })
}

fn read_cell(cell: &DataType) -> RawCell {
    match cell {
        DataType::Float(f) => RawCell::Number(*f),
        DataType::Int(i) => RawCell::Number(*i as f64),
        DataType::String(s) if s.is_empty() => RawCell::Empty,
        DataType::String(s) => RawCell::Text(s.clone()),
        DataType::Empty => RawCell::Empty,
        // Booleans, dates and errors are kept as text. They are rejected if they
        // appear in a criterion column.
        x => RawCell::Text(format!("{:?}", x)),
    }
}
