//! Day-resumable Telraam import.
//!
//! A run walks every camera over every day from the start date through
//! today, writing one CSV file per camera and day. The start date is the
//! caller's explicit date if given, otherwise the persisted cursor. The
//! cursor is written once, after every camera and day succeeded.
//!
//! File policy:
//!
//! * Today's file is always rewritten, since today's data is never final.
//!   The old file stays in place until the new report has been fetched.
//! * Earlier files that already exist are skipped, unless the caller gave
//!   an explicit start date, in which case they are overwritten.

use chrono::NaiveDate;
use city_data_counter_models::{CounterSource, TelraamCamera};

use crate::{
    TelraamError,
    columns::{ColumnMapping, DayTable},
    config::TelraamConfig,
    csv_sink::{csv_file_path, write_day_csv},
    cursor::ImportCursorStore,
    fetcher::{ReportFetcher, TelraamClient},
    reconcile::reconcile_day,
    registry::telraam_cameras,
    window::{DayWindow, RunClock},
};

/// Cursor key used by this importer.
pub const CURSOR_SOURCE: CounterSource = CounterSource::TelraamCsv;

/// Outcome of one import run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    /// First day considered.
    pub from: NaiveDate,
    /// Day the cursor was advanced to, or `None` if there was nothing to
    /// import.
    pub until: Option<NaiveDate>,
    /// Number of CSV files written.
    pub files_written: usize,
    /// Number of existing CSV files left untouched.
    pub files_skipped: usize,
}

/// Imports Telraam reports into per-day CSV files.
pub struct TelraamImporter<F, S> {
    config: TelraamConfig,
    fetcher: F,
    cursors: S,
    cameras: Vec<TelraamCamera>,
}

impl<S: ImportCursorStore> TelraamImporter<TelraamClient, S> {
    /// Creates an importer for the embedded camera registry that talks to
    /// the configured Telraam endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`TelraamError::Http`] if the HTTP client cannot be built.
    pub fn from_config(config: TelraamConfig, cursors: S) -> Result<Self, TelraamError> {
        let fetcher = TelraamClient::new(&config)?;
        Ok(Self::new(config, fetcher, cursors, telraam_cameras()))
    }
}

impl<F: ReportFetcher, S: ImportCursorStore> TelraamImporter<F, S> {
    /// Creates an importer from its parts.
    #[must_use]
    pub const fn new(
        config: TelraamConfig,
        fetcher: F,
        cursors: S,
        cameras: Vec<TelraamCamera>,
    ) -> Self {
        Self {
            config,
            fetcher,
            cursors,
            cameras,
        }
    }

    /// Runs the import against the current wall clock.
    ///
    /// # Errors
    ///
    /// See [`Self::run_at`].
    pub async fn run(&self, from_date: Option<NaiveDate>) -> Result<ImportSummary, TelraamError> {
        let clock = RunClock::now(self.config.timezone);
        self.run_at(from_date, &clock).await
    }

    /// Runs the import with a fixed notion of "today" and UTC offset.
    ///
    /// # Errors
    ///
    /// Returns the first fetch, file or cursor error. The cursor is only
    /// advanced when every camera and day succeeded.
    pub async fn run_at(
        &self,
        from_date: Option<NaiveDate>,
        clock: &RunClock,
    ) -> Result<ImportSummary, TelraamError> {
        let today = clock.today;
        let cursor = self.resolve_cursor()?;

        let (from, overwrite) = from_date.map_or((cursor, false), |d| (d, true));

        if from > today {
            log::info!("Nothing to import: start date {from} is after today {today}");
            return Ok(ImportSummary {
                from,
                until: None,
                files_written: 0,
                files_skipped: 0,
            });
        }

        log::info!("Fetching Telraam data from {from} to {today}");

        let mut summary = ImportSummary {
            from,
            until: None,
            files_written: 0,
            files_skipped: 0,
        };

        for camera in &self.cameras {
            let mapping = ColumnMapping::for_camera(camera);

            for day in from.iter_days().take_while(|d| *d <= today) {
                let path = csv_file_path(&self.config.csv_dir, &camera.mac, day);

                if path.exists() && day != today && !overwrite {
                    summary.files_skipped += 1;
                    continue;
                }

                let window = DayWindow::new(day, clock.utc_offset);
                let report = self
                    .fetcher
                    .fetch_report(&camera.instance_id, &window)
                    .await?;

                let hours = reconcile_day(report, day, today);
                let table = DayTable::build(&mapping, &window, clock.utc_offset, &hours);
                write_day_csv(&path, &table)?;

                log::debug!("Wrote {}", path.display());
                summary.files_written += 1;
            }
        }

        self.cursors.set_cursor(CURSOR_SOURCE, today)?;
        summary.until = Some(today);

        log::info!(
            "Telraam data imported until {today} ({} written, {} skipped)",
            summary.files_written,
            summary.files_skipped
        );

        Ok(summary)
    }

    /// Returns the persisted cursor, initializing state on first use.
    ///
    /// A missing CSV directory means a fresh install: the directory is
    /// created and the cursor reset to the configured start date.
    fn resolve_cursor(&self) -> Result<NaiveDate, TelraamError> {
        let dir = &self.config.csv_dir;
        let start = self.config.start_date;

        if !dir.exists() {
            log::info!("Creating {} and resetting import cursor", dir.display());
            std::fs::create_dir_all(dir)?;
            self.cursors.clear_cursor(CURSOR_SOURCE)?;
            self.cursors.set_cursor(CURSOR_SOURCE, start)?;
            return Ok(start);
        }

        if let Some(cursor) = self.cursors.get_cursor(CURSOR_SOURCE)? {
            Ok(cursor)
        } else {
            log::info!("No import cursor found, starting from {start}");
            self.cursors.set_cursor(CURSOR_SOURCE, start)?;
            Ok(start)
        }
    }
}
