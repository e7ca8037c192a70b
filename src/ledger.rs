use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use tracing::error;

use crate::sale::Sale;
use crate::summary::{self, DailySummary};

/// Possible errors to occur during explicitly requested ledger I/O
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// The day-scoped sale ledger
///
/// The ledger owns the append-only in-memory list of the day's sales, which
/// is the source of truth for the session, and mirrors it to text files: a
/// per-day sales log that every sale is appended to, and a per-day summary
/// report that is fully rewritten on request. Sales of past days are not
/// reloaded from disk.
#[derive(Debug)]
pub struct SalesLedger {
    dir: PathBuf,
    date: NaiveDate,
    sales: Vec<Sale>,
}

impl SalesLedger {
    /// Creates a ledger for today's date, creating the data directory if needed
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, LedgerError> {
        Self::for_date(dir, Local::now().date_naive())
    }

    /// Creates a ledger scoped to the specified date
    pub fn for_date(dir: impl Into<PathBuf>, date: NaiveDate) -> Result<Self, LedgerError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        Ok(Self {
            dir,
            date,
            sales: Vec::new(),
        })
    }

    /// The calendar date this ledger is scoped to
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Records one completed sale
    ///
    /// The sale is appended to the in-memory day list and mirrored to the
    /// daily sales log. A failing log append is reported on the diagnostic
    /// channel and does not fail the call: the in-memory record already
    /// succeeded and remains the session's source of truth.
    pub fn record(&mut self, sale: Sale) {
        if let Err(err) = self.append_to_log(&sale) {
            error!("failed to append sale to {:?}: {err}", self.sales_log_path());
        }
        self.sales.push(sale);
    }

    /// A copy of the day's sales, never the live list
    pub fn todays_sales(&self) -> Vec<Sale> {
        self.sales.clone()
    }

    /// The sales recorded for the specified date
    ///
    /// Only the ledger's own date has in-memory data; other dates yield an
    /// empty list since past days are not re-parsed from their log files.
    pub fn sales_for_date(&self, date: NaiveDate) -> Vec<Sale> {
        if date == self.date {
            self.todays_sales()
        } else {
            Vec::new()
        }
    }

    /// Recomputes the aggregate summary for the specified date
    pub fn summarize(&self, date: NaiveDate) -> DailySummary {
        DailySummary::from_sales(date, &self.sales_for_date(date))
    }

    /// Writes the summary report for the specified date, replacing any
    /// previous report for that date
    ///
    /// When no sales log exists for the date, a minimal placeholder is
    /// written instead of computing aggregates.
    pub fn write_summary(&self, date: NaiveDate) -> Result<PathBuf, LedgerError> {
        let path = self.summary_path_for(date);

        let report = if self.sales_log_path_for(date).exists() {
            self.summarize(date).to_string()
        } else {
            summary::no_sales_report(date)
        };
        fs::write(&path, report)?;

        Ok(path)
    }

    /// The path of the daily sales log for the ledger's date
    pub fn sales_log_path(&self) -> PathBuf {
        self.sales_log_path_for(self.date)
    }

    /// The path of the summary report for the ledger's date
    pub fn summary_path(&self) -> PathBuf {
        self.summary_path_for(self.date)
    }

    fn sales_log_path_for(&self, date: NaiveDate) -> PathBuf {
        self.dir
            .join(format!("daily_sales_{}.txt", date.format("%Y-%m-%d")))
    }

    fn summary_path_for(&self, date: NaiveDate) -> PathBuf {
        self.dir
            .join(format!("sales_summary_{}.txt", date.format("%Y-%m-%d")))
    }

    fn append_to_log(&self, sale: &Sale) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.sales_log_path())?;

        file.write_all(log_block(sale).as_bytes())
    }
}

/// Formats the human-readable log block for one sale
///
/// Items are listed by name in alphabetical order so the log is stable.
fn log_block(sale: &Sale) -> String {
    let mut block = String::new();
    block.push_str(&format!("=== Sale at {} ===\n", sale.timestamp().format("%H:%M:%S")));
    block.push_str("Items:\n");

    let mut items: Vec<_> = sale.items().iter().collect();
    items.sort_by(|a, b| a.0.cmp(b.0));
    for (name, quantity) in items {
        block.push_str(&format!("  - {name} x {quantity}\n"));
    }

    block.push_str(&format!("Total: ฿{:.2}\n", sale.total()));
    block.push_str(&format!("Received: ฿{:.2}\n", sale.received()));
    block.push_str(&format!("Change: ฿{:.2}\n", sale.change()));
    block.push_str(&format!("{}\n\n", "-".repeat(48)));

    block
}
