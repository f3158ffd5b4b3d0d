// 2 file(s).
// File(s) read by the parser:
// platforms-plk.tsv, platforms-others.tsv
// ---
// The PLK file starts with a column-name row, which is discarded, and its
// rows carry no operator column: every record is tagged with the default
// operator. The others file has no header and an explicit operator per row.

use std::{fs::File, io::Read};

use rustc_hash::FxHashSet;

use crate::{
    error::{ReconcileError, Result},
    models::PlkPlatform,
    parsing::error::ParsingError,
    patches,
};

pub const PLK_FILE: &str = "platforms-plk.tsv";
pub const OTHERS_FILE: &str = "platforms-others.tsv";

pub const DEFAULT_OPERATOR: &str = "PLK";

const PLK_COLUMNS: usize = 3;
const OTHERS_COLUMNS: usize = 4;

pub fn parse(plk_path: &str, others_path: &str) -> Result<Vec<PlkPlatform>> {
    log::info!("Parsing {plk_path}...");
    let mut platforms = parse_plk(File::open(plk_path)?, plk_path)?;

    log::info!("Parsing {others_path}...");
    platforms.extend(parse_others(File::open(others_path)?, others_path)?);

    apply_patches(&mut platforms);
    Ok(platforms)
}

fn reader<R: Read>(input: R, has_headers: bool) -> csv::Reader<R> {
    // flexible() so short rows reach the column-count check below instead of
    // surfacing as an opaque csv error.
    csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(has_headers)
        .flexible(true)
        .from_reader(input)
}

fn parse_plk<R: Read>(input: R, file: &str) -> Result<Vec<PlkPlatform>> {
    let mut platforms = Vec::new();
    for record in reader(input, true).records() {
        let record = record?;
        check_columns(&record, PLK_COLUMNS, file)?;
        platforms.push(PlkPlatform::new(
            DEFAULT_OPERATOR.to_string(),
            record[0].to_string(),
            record[1].to_string(),
            record[2].to_string(),
        ));
    }
    Ok(platforms)
}

fn parse_others<R: Read>(input: R, file: &str) -> Result<Vec<PlkPlatform>> {
    let mut platforms = Vec::new();
    for record in reader(input, false).records() {
        let record = record?;
        check_columns(&record, OTHERS_COLUMNS, file)?;
        platforms.push(PlkPlatform::new(
            record[0].to_string(),
            record[1].to_string(),
            record[2].to_string(),
            record[3].to_string(),
        ));
    }
    Ok(platforms)
}

fn check_columns(record: &csv::StringRecord, expected: usize, file: &str) -> Result<()> {
    if record.len() == expected {
        return Ok(());
    }
    Err(ReconcileError::Parsing {
        error: ParsingError::UnexpectedColumnCount {
            expected,
            found: record.len(),
        },
        file: file.to_string(),
        line_number: record.position().map_or(0, csv::Position::line),
    })
}

/// Applies the static correction table in file order. Each distinct
/// (station, platform, track) key is consumed at most once: a later record
/// with an identical triple is left as the register states it.
fn apply_patches(platforms: &mut [PlkPlatform]) {
    let mut consumed: FxHashSet<(String, String, String)> = FxHashSet::default();
    for record in platforms.iter_mut() {
        let Some((platform, track)) =
            patches::lookup(record.station_name(), record.platform(), record.track())
        else {
            continue;
        };
        let key = (
            record.station_name().to_string(),
            record.platform().to_string(),
            record.track().to_string(),
        );
        if !consumed.insert(key) {
            continue;
        }
        log::info!(
            "Patching register row: {} platform {} track {}",
            record.station_name(),
            record.platform(),
            record.track()
        );
        record.set_correction(platform.to_string(), track.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::tests::get_json_values;
    use pretty_assertions::assert_eq;

    #[test]
    fn plk_rows_are_tagged_with_the_default_operator() {
        let input = "station_name\tplatform\ttrack\n\
                     Kutno\t1\t101\n\
                     \"Gdańsk Główny\"\t2\t4/6\n";
        let platforms = parse_plk(input.as_bytes(), "platforms-plk.tsv").unwrap();
        assert_eq!(2, platforms.len());
        let reference = r#"
            {
                "operator": "PLK",
                "station_name": "Gdańsk Główny",
                "platform": "2",
                "track": "4/6"
            }"#;
        let (platform, reference) = get_json_values(&platforms[1], reference).unwrap();
        assert_eq!(platform, reference);
    }

    #[test]
    fn others_rows_carry_their_own_operator() {
        let input = "SKM\tGdynia Główna\t3\t503\n";
        let platforms = parse_others(input.as_bytes(), "platforms-others.tsv").unwrap();
        let reference = r#"
            {
                "operator": "SKM",
                "station_name": "Gdynia Główna",
                "platform": "3",
                "track": "503"
            }"#;
        let (platform, reference) = get_json_values(&platforms[0], reference).unwrap();
        assert_eq!(platform, reference);
    }

    #[test]
    fn short_row_is_a_fatal_error() {
        let input = "station_name\tplatform\ttrack\n\
                     Kutno\t1\n";
        let err = parse_plk(input.as_bytes(), "platforms-plk.tsv").unwrap_err();
        match err {
            ReconcileError::Parsing {
                error: ParsingError::UnexpectedColumnCount { expected, found },
                file,
                line_number,
            } => {
                assert_eq!(3, expected);
                assert_eq!(2, found);
                assert_eq!("platforms-plk.tsv", file);
                assert_eq!(2, line_number);
            }
            other => panic!("expected a column-count error, got {other:?}"),
        }
    }

    #[test]
    fn patch_key_is_consumed_at_most_once() {
        let mut platforms = vec![
            PlkPlatform::new(
                "PLK".to_string(),
                "Idzikowice".to_string(),
                "2".to_string(),
                "22".to_string(),
            ),
            PlkPlatform::new(
                "PLK".to_string(),
                "Idzikowice".to_string(),
                "2".to_string(),
                "22".to_string(),
            ),
        ];
        apply_patches(&mut platforms);
        assert_eq!("2", platforms[0].track());
        assert_eq!("22", platforms[1].track());
    }

    #[test]
    fn unpatched_rows_are_unchanged() {
        let mut platforms = vec![PlkPlatform::new(
            "PLK".to_string(),
            "Kutno".to_string(),
            "1".to_string(),
            "101".to_string(),
        )];
        apply_patches(&mut platforms);
        assert_eq!("1", platforms[0].platform());
        assert_eq!("101", platforms[0].track());
    }
}
