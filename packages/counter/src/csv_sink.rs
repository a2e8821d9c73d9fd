//! Per-camera, per-day CSV files.

use std::path::{Path, PathBuf};

use chrono::{Datelike as _, NaiveDate};

use crate::{TelraamError, columns::DayTable};

/// Path of the CSV file for `mac` on `day`.
///
/// Day and month are not zero padded, e.g.
/// `telraam_data_350457790598039_5_1_2024.csv` for 5 January 2024.
#[must_use]
pub fn csv_file_path(dir: &Path, mac: &str, day: NaiveDate) -> PathBuf {
    dir.join(format!(
        "telraam_data_{mac}_{}_{}_{}.csv",
        day.day(),
        day.month(),
        day.year()
    ))
}

/// Writes `table` to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns [`TelraamError::Csv`] or [`TelraamError::Io`] if the file cannot
/// be written.
pub fn write_day_csv(path: &Path, table: &DayTable) -> Result<(), TelraamError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(&table.header)?;

    for (label, values) in &table.rows {
        let record = std::iter::once(label.clone()).chain(values.iter().map(ToString::to_string));
        writer.write_record(record)?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("city_data_csv_sink_{name}"));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn file_name_is_not_zero_padded() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let path = csv_file_path(Path::new("/data"), "123", day);
        assert_eq!(path, PathBuf::from("/data/telraam_data_123_5_1_2024.csv"));
    }

    #[test]
    fn writes_header_and_rows() {
        let dir = temp_dir("writes_header_and_rows");
        let path = dir.join("day.csv");
        let table = DayTable {
            header: vec!["startTime".to_string(), "1 JK".to_string()],
            rows: vec![
                ("2024-01-05 00:00:00".to_string(), vec![3]),
                ("2024-01-05 01:00:00".to_string(), vec![0]),
            ],
        };

        write_day_csv(&path, &table).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "startTime,1 JK\n2024-01-05 00:00:00,3\n2024-01-05 01:00:00,0\n"
        );

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
