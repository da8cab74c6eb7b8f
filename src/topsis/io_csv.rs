// Primitives for reading and writing CSV files.

use topsis_rank::{RawCell, RawTable, TopsisResult};

use crate::topsis::{io_common::*, *};

/// Reads a CSV file with a header row.
///
/// Rows shorter than the header are accepted (the missing cells are empty), rows
/// longer than the header are rejected.
pub fn read_csv_table(path: &str) -> RunResult<RawTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;

    let headers: Vec<String> = rdr
        .headers()
        .context(CsvLineParseSnafu { lineno: 1_usize })?
        .iter()
        .map(|s| s.to_string())
        .collect();
    debug!("read_csv_table: headers: {:?}", headers);

    let mut rows: Vec<Vec<RawCell>> = Vec::new();
    for (idx, line_r) in rdr.records().enumerate() {
        // The header is on line 1.
        let lineno = idx + 2;
        let line = line_r.context(CsvLineParseSnafu { lineno })?;
        ensure!(
            line.len() <= headers.len(),
            CsvLineTooLongSnafu {
                lineno,
                found: line.len(),
                expected: headers.len(),
            }
        );
        let row: Vec<RawCell> = line.iter().map(read_cell).collect();
        debug!("read_csv_table: lineno: {:?} row: {:?}", lineno, row);
        rows.push(row);
    }
    Ok(RawTable { headers, rows })
}

fn read_cell(s: &str) -> RawCell {
    if s.is_empty() {
        RawCell::Empty
    } else {
        RawCell::Text(s.to_string())
    }
}

/// Writes the input columns, unchanged, followed by the score and the rank.
pub fn render_csv(table: &RawTable, result: &TopsisResult) -> RunResult<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    let mut header: Vec<String> = table.headers.clone();
    header.push(SCORE_COLUMN.to_string());
    header.push(RANK_COLUMN.to_string());
    wtr.write_record(&header).context(CsvWriteSnafu {})?;

    for (row, ra) in table.rows.iter().zip(result.alternatives.iter()) {
        let mut record: Vec<String> = (0..table.headers.len())
            .map(|col| row.get(col).map(|c| c.to_string()).unwrap_or_default())
            .collect();
        record.push(format_score(ra.score));
        record.push(format_rank(ra.rank));
        wtr.write_record(&record).context(CsvWriteSnafu {})?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| e.into_error())
        .context(CsvFlushSnafu {})?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use topsis_rank::{run_topsis, TopsisRules};

    #[test]
    fn keeps_the_original_cells() {
        let table = RawTable {
            headers: vec!["Name".to_string(), "a".to_string(), "b".to_string()],
            rows: vec![
                vec![
                    RawCell::Text("x, y".to_string()),
                    RawCell::Text("1.50".to_string()),
                    RawCell::Text("2".to_string()),
                ],
                vec![
                    RawCell::Text("z".to_string()),
                    RawCell::Text("3".to_string()),
                    RawCell::Text("4".to_string()),
                ],
            ],
        };
        let result = run_topsis(&table, "1,1", "+,+", &TopsisRules::DEFAULT_RULES).unwrap();
        let rendered = render_csv(&table, &result).unwrap();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "Name,a,b,Topsis Score,Rank");
        assert_eq!(lines[1], "\"x, y\",1.50,2,0,2");
        assert_eq!(lines[2], "z,3,4,1,1");
    }
}
