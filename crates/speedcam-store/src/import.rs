//! CSV import for the police speed-camera export.
//!
//! The export carries a UTF-8 BOM, padded header names and a second header
//! row with the column titles in Chinese. Both quirks are cleaned up here.

use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, info};

use crate::error::Result;
use speedcam_domain::CameraRecord;

/// City value of the secondary (localized) header row.
pub const LOCALIZED_HEADER_CITY: &str = "設置縣市";

/// Outcome of an import run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportStats {
    pub parsed: usize,
    pub skipped_header_rows: usize,
}

/// Trim header names and strip a leading byte-order mark.
pub fn clean_header(header: &str) -> String {
    header.trim().trim_start_matches('\u{feff}').trim().to_string()
}

/// Parse camera records from CSV text.
///
/// # Errors
///
/// Returns [`crate::StoreError::Csv`] on malformed CSV.
pub fn parse_cameras<R: Read>(reader: R) -> Result<(Vec<CameraRecord>, ImportStats)> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers: StringRecord = rdr.headers()?.iter().map(clean_header).collect();
    debug!(columns = ?headers, "CSV headers");
    rdr.set_headers(headers.clone());

    let mut records = Vec::new();
    let mut stats = ImportStats::default();

    for row in rdr.records() {
        let row = row?;
        let record = CameraRecord::from_columns(|name| {
            headers
                .iter()
                .position(|h| h == name)
                .and_then(|idx| row.get(idx))
        });

        if record.city_name == LOCALIZED_HEADER_CITY {
            stats.skipped_header_rows += 1;
            continue;
        }
        records.push(record);
    }

    stats.parsed = records.len();
    info!(parsed = stats.parsed, skipped = stats.skipped_header_rows, "Parsed camera CSV");
    Ok((records, stats))
}

/// Parse camera records from a CSV file on disk.
///
/// # Errors
///
/// Fails if the file cannot be opened or parsed.
pub fn parse_cameras_file(path: &Path) -> Result<(Vec<CameraRecord>, ImportStats)> {
    let file = std::fs::File::open(path)?;
    parse_cameras(std::io::BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\u{feff}CityName , RegionName,Address,DeptNm,BranchNm,Longitude,Latitude,direct,limit\n\
        設置縣市,轄區,地址,管轄警局,分局,經度,緯度,拍攝方向,速限\n\
        高雄市,楠梓區,大學路,高雄市政府警察局,楠梓分局,120.3275,22.6502,南向北,50\n\
        花蓮縣,壽豐鄉,台9線,花蓮縣警察局,吉安分局,121.5997,24.0021,雙向,70\n";

    #[test]
    fn test_clean_header() {
        assert_eq!(clean_header("\u{feff}CityName"), "CityName");
        assert_eq!(clean_header("  limit "), "limit");
    }

    #[test]
    fn test_parse_skips_localized_header_row() {
        let (records, stats) = parse_cameras(SAMPLE.as_bytes()).unwrap();
        assert_eq!(stats.parsed, 2);
        assert_eq!(stats.skipped_header_rows, 1);
        assert_eq!(records[0].city_name, "高雄市");
        assert_eq!(records[0].direction, "南向北");
        assert_eq!(records[1].speed_limit, "70");
        assert!(records[1].position().is_some());
    }

    #[test]
    fn test_short_rows_leave_fields_empty() {
        let csv = "CityName,limit,Latitude\n臺東縣,60\n";
        let (records, _) = parse_cameras(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].speed_limit, "60");
        assert!(records[0].latitude.is_empty());
    }
}
