use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use polars::prelude::*;
use rustc_hash::FxHashMap;

use crate::error::{Result, ShapeError};
use crate::shape_structs::{PromoterShape, PromoterTable, TcType, TssTable};

/// Read one tab-separated table with a header row.
fn read_frame(path: &Path) -> Result<DataFrame> {
    let parse_options = CsvParseOptions::default().with_separator(b'\t');
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_rechunk(true)
        .with_parse_options(parse_options)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    Ok(df)
}

fn require_column<'a>(df: &'a DataFrame, path: &Path, name: &str) -> Result<&'a Column> {
    df.column(name).map_err(|_| ShapeError::MissingColumn {
        file: path.display().to_string(),
        column: name.to_string(),
    })
}

/// Extract an integer coordinate column. Values that do not parse as
/// integers (and empty fields) become nulls under the cast and fail the run.
fn coordinate_column(df: &DataFrame, path: &Path, name: &str) -> Result<Vec<i64>> {
    let col = require_column(df, path, name)?;
    let casted = col
        .cast(&DataType::Int64)
        .map_err(|_| ShapeError::BadCoordinate {
            file: path.display().to_string(),
            column: name.to_string(),
            count: col.len(),
        })?;
    let ca = casted.i64()?;

    let bad = ca.null_count();
    if bad > 0 {
        return Err(ShapeError::BadCoordinate {
            file: path.display().to_string(),
            column: name.to_string(),
            count: bad,
        });
    }

    Ok(ca.into_no_null_iter().collect())
}

/// Extract the seqnames column as strings. Purely numeric contig names are
/// inferred as integers by the CSV reader, so cast through String first.
fn seqname_column(df: &DataFrame, path: &Path) -> Result<Vec<String>> {
    let col = require_column(df, path, "seqnames")?;
    let casted = col.cast(&DataType::String)?;
    let ca = casted.str()?;

    let missing = ca.null_count();
    if missing > 0 {
        return Err(ShapeError::MissingSeqname {
            file: path.display().to_string(),
            count: missing,
        });
    }

    Ok(ca.into_no_null_iter().map(|s| s.to_string()).collect())
}

/// Map seqnames to dense integer codes. Both tables are encoded against the
/// same map so equal names across files get equal codes.
fn encode_seqnames(names: &[String], codes: &mut FxHashMap<String, u32>) -> Vec<u32> {
    if codes.capacity() - codes.len() < names.len() {
        codes.reserve(names.len());
    }

    names
        .iter()
        .map(|name| {
            let next = codes.len() as u32;
            *codes.entry(name.clone()).or_insert(next)
        })
        .collect()
}

/// Read and validate both input tables.
///
/// Promoters need `seqnames`, `start`, `end`; TSS positions need `seqnames`,
/// `pos`. Extra columns are ignored.
pub fn read_tables(promoters_path: &Path, tss_path: &Path) -> Result<(PromoterTable, TssTable)> {
    let promoters_df = read_frame(promoters_path)?;
    let tss_df = read_frame(tss_path)?;

    let seqnames = seqname_column(&promoters_df, promoters_path)?;
    let starts = coordinate_column(&promoters_df, promoters_path, "start")?;
    let ends = coordinate_column(&promoters_df, promoters_path, "end")?;

    let tss_seqnames = seqname_column(&tss_df, tss_path)?;
    let positions = coordinate_column(&tss_df, tss_path, "pos")?;

    let mut codes: FxHashMap<String, u32> = FxHashMap::default();
    let chrs = encode_seqnames(&seqnames, &mut codes);
    let tss_chrs = encode_seqnames(&tss_seqnames, &mut codes);

    Ok((
        PromoterTable {
            seqnames,
            chrs,
            starts,
            ends,
        },
        TssTable {
            chrs: tss_chrs,
            positions,
        },
    ))
}

/// `[150, 150, 180]` — the bracketed list literal used in the output table.
fn format_positions(positions: &[i64]) -> String {
    let joined = positions
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{}]", joined)
}

/// Assemble the output table: one row per promoter, promoter order, with
/// null entries in the statistic columns where no TSS overlapped.
pub fn results_frame(promoters: &PromoterTable, shapes: &[PromoterShape]) -> Result<DataFrame> {
    let widths: Vec<i64> = promoters
        .starts
        .iter()
        .zip(&promoters.ends)
        .map(|(start, end)| end - start + 1)
        .collect();
    let totals: Vec<u32> = shapes.iter().map(|s| s.total_tss).collect();
    let tss_positions: Vec<Option<String>> = shapes
        .iter()
        .map(|s| {
            if s.tss_positions.is_empty() {
                None
            } else {
                Some(format_positions(&s.tss_positions))
            }
        })
        .collect();
    let shape_indexes: Vec<Option<f64>> = shapes.iter().map(|s| s.shape_index).collect();
    let tc_types: Vec<Option<&str>> = shapes
        .iter()
        .map(|s| s.tc_type.map(TcType::as_str))
        .collect();

    let df = DataFrame::new(vec![
        Column::new("seqnames".into(), &promoters.seqnames),
        Column::new("start".into(), &promoters.starts),
        Column::new("end".into(), &promoters.ends),
        Column::new("width".into(), widths),
        Column::new("total_tss".into(), totals),
        Column::new("tss_positions".into(), tss_positions),
        Column::new("SI".into(), shape_indexes),
        Column::new("tc_type".into(), tc_types),
    ])?;
    Ok(df)
}

/// Write the result table as tab-separated text with a header row. Nulls are
/// written as empty fields.
pub fn write_results(df: &mut DataFrame, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    CsvWriter::new(&mut writer)
        .include_header(true)
        .with_separator(b'\t')
        .finish(df)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_table(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn reads_both_tables_with_shared_codes() {
        let promoters = temp_table("seqnames\tstart\tend\nchr1\t100\t200\nchr2\t500\t700\n");
        let tss = temp_table("seqnames\tpos\nchr2\t600\nchr1\t150\n");

        let (promoter_table, tss_table) = read_tables(promoters.path(), tss.path()).unwrap();

        assert_eq!(promoter_table.seqnames, vec!["chr1", "chr2"]);
        assert_eq!(promoter_table.starts, vec![100, 500]);
        assert_eq!(promoter_table.ends, vec![200, 700]);
        assert_eq!(tss_table.positions, vec![600, 150]);
        // Codes follow first-seen order in the promoters file.
        assert_eq!(promoter_table.chrs, vec![0, 1]);
        assert_eq!(tss_table.chrs, vec![1, 0]);
    }

    #[test]
    fn extra_columns_are_ignored() {
        let promoters =
            temp_table("seqnames\tstart\tend\tgene\nchr1\t100\t200\tTP53\n");
        let tss = temp_table("seqnames\tpos\tscore\nchr1\t150\t0.9\n");

        let (promoter_table, tss_table) = read_tables(promoters.path(), tss.path()).unwrap();
        assert_eq!(promoter_table.len(), 1);
        assert_eq!(tss_table.len(), 1);
    }

    #[test]
    fn numeric_seqnames_are_read_as_strings() {
        let promoters = temp_table("seqnames\tstart\tend\n1\t100\t200\n");
        let tss = temp_table("seqnames\tpos\n1\t150\n");

        let (promoter_table, tss_table) = read_tables(promoters.path(), tss.path()).unwrap();
        assert_eq!(promoter_table.seqnames, vec!["1"]);
        assert_eq!(promoter_table.chrs, tss_table.chrs);
    }

    #[test]
    fn missing_column_fails() {
        let promoters = temp_table("seqnames\tstart\nchr1\t100\n");
        let tss = temp_table("seqnames\tpos\nchr1\t150\n");

        let err = read_tables(promoters.path(), tss.path()).unwrap_err();
        match err {
            ShapeError::MissingColumn { column, .. } => assert_eq!(column, "end"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_numeric_coordinate_fails() {
        let promoters = temp_table("seqnames\tstart\tend\nchr1\t100\t200\n");
        let tss = temp_table("seqnames\tpos\nchr1\t150\nchr1\tabc\n");

        let err = read_tables(promoters.path(), tss.path()).unwrap_err();
        match err {
            ShapeError::BadCoordinate { column, count, .. } => {
                assert_eq!(column, "pos");
                assert_eq!(count, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_input_file_fails() {
        let tss = temp_table("seqnames\tpos\nchr1\t150\n");
        let missing = Path::new("/no/such/promoters.tsv");
        assert!(read_tables(missing, tss.path()).is_err());
    }

    #[test]
    fn positions_format_as_bracketed_list() {
        assert_eq!(format_positions(&[150]), "[150]");
        assert_eq!(format_positions(&[150, 150, 180]), "[150, 150, 180]");
    }

    #[test]
    fn written_table_has_empty_fields_for_nulls() {
        let promoters = PromoterTable {
            seqnames: vec!["chr1".to_string()],
            chrs: vec![0],
            starts: vec![100],
            ends: vec![200],
        };
        let shapes = vec![PromoterShape {
            total_tss: 0,
            tss_positions: Vec::new(),
            shape_index: None,
            tc_type: None,
        }];

        let mut df = results_frame(&promoters, &shapes).unwrap();
        let out = NamedTempFile::new().unwrap();
        write_results(&mut df, out.path()).unwrap();

        let text = std::fs::read_to_string(out.path()).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "seqnames\tstart\tend\twidth\ttotal_tss\ttss_positions\tSI\ttc_type"
        );
        assert_eq!(lines.next().unwrap(), "chr1\t100\t200\t101\t0\t\t\t");
    }
}
