//! Structured event capture for the agent world.
//!
//! A `tracing` subscriber turns every info-level event into a row of a table
//! named after the event's target. Columns appear the first time a field is
//! seen and are back-filled with defaults, so each target's schema is simply
//! the union of its fields.
//!
//! ```ignore
//! // In simulation code:
//! tracing::info!(target: "death", tick, uid, uptime);
//!
//! // In a test:
//! let (_, recorder) = instrument::capture(|| world.run_frames(1_000));
//! let deaths = recorder.table("death").map(|t| t.rows()).unwrap_or(0);
//! ```

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Record};
use tracing::{Event, Id, Level, Metadata, Subscriber};

// ============================================================================
// Columns and Tables
// ============================================================================

/// One typed column. Missing cells hold the type's default.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    U64(Vec<u64>),
    I64(Vec<i64>),
    F64(Vec<f64>),
    Bool(Vec<bool>),
    Text(Vec<String>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::U64(v) => v.len(),
            Column::I64(v) => v.len(),
            Column::F64(v) => v.len(),
            Column::Bool(v) => v.len(),
            Column::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn fill_to(&mut self, rows: usize) {
        let missing = rows.saturating_sub(self.len());
        if missing == 0 {
            return;
        }
        match self {
            Column::U64(v) => v.extend(std::iter::repeat_n(0, missing)),
            Column::I64(v) => v.extend(std::iter::repeat_n(0, missing)),
            Column::F64(v) => v.extend(std::iter::repeat_n(0.0, missing)),
            Column::Bool(v) => v.extend(std::iter::repeat_n(false, missing)),
            Column::Text(v) => v.extend(std::iter::repeat_n(String::new(), missing)),
        }
    }
}

/// Rows recorded for a single tracing target.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: BTreeMap<String, Column>,
    rows: usize,
}

impl Table {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn u64s(&self, name: &str) -> Option<&[u64]> {
        match self.columns.get(name)? {
            Column::U64(v) => Some(v),
            _ => None,
        }
    }

    pub fn f64s(&self, name: &str) -> Option<&[f64]> {
        match self.columns.get(name)? {
            Column::F64(v) => Some(v),
            _ => None,
        }
    }

    pub fn texts(&self, name: &str) -> Option<&[String]> {
        match self.columns.get(name)? {
            Column::Text(v) => Some(v),
            _ => None,
        }
    }

    /// Close the current row: every column gets a cell for it.
    fn finish_row(&mut self) {
        self.rows += 1;
        for column in self.columns.values_mut() {
            column.fill_to(self.rows);
        }
    }

    /// Column for `name`, created back-filled to the rows already closed.
    fn column_for(&mut self, name: &str, empty: Column) -> &mut Column {
        let rows = self.rows;
        self.columns.entry(name.to_string()).or_insert_with(|| {
            let mut column = empty;
            column.fill_to(rows);
            column
        })
    }
}

/// All tables captured so far, keyed by target.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recorder {
    tables: BTreeMap<String, Table>,
}

impl Recorder {
    pub fn table(&self, target: &str) -> Option<&Table> {
        self.tables.get(target)
    }

    /// Rows recorded for `target`; zero if it never fired.
    pub fn count(&self, target: &str) -> usize {
        self.table(target).map_or(0, Table::rows)
    }

    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

thread_local! {
    static RECORDER: RefCell<Recorder> = RefCell::default();
}

// ============================================================================
// Subscriber
// ============================================================================

/// A single field value as it arrives from an event.
#[derive(Debug, Clone, Copy)]
enum Cell<'v> {
    U64(u64),
    I64(i64),
    F64(f64),
    Bool(bool),
    Text(&'v str),
}

impl Cell<'_> {
    fn empty_column(self) -> Column {
        match self {
            Cell::U64(_) => Column::U64(Vec::new()),
            Cell::I64(_) => Column::I64(Vec::new()),
            Cell::F64(_) => Column::F64(Vec::new()),
            Cell::Bool(_) => Column::Bool(Vec::new()),
            Cell::Text(_) => Column::Text(Vec::new()),
        }
    }

    fn render(self) -> String {
        match self {
            Cell::U64(v) => v.to_string(),
            Cell::I64(v) => v.to_string(),
            Cell::F64(v) => v.to_string(),
            Cell::Bool(v) => v.to_string(),
            Cell::Text(v) => v.to_string(),
        }
    }
}

impl Column {
    /// Append `cell`, widening integers where that loses nothing. Returns
    /// false when the value does not fit this column's type.
    fn try_push(&mut self, cell: Cell<'_>) -> bool {
        match (self, cell) {
            (Column::U64(v), Cell::U64(x)) => v.push(x),
            (Column::U64(v), Cell::I64(x)) if x >= 0 => v.push(x as u64),
            (Column::I64(v), Cell::I64(x)) => v.push(x),
            (Column::I64(v), Cell::U64(x)) if i64::try_from(x).is_ok() => v.push(x as i64),
            (Column::F64(v), Cell::F64(x)) => v.push(x),
            (Column::F64(v), Cell::U64(x)) => v.push(x as f64),
            (Column::F64(v), Cell::I64(x)) => v.push(x as f64),
            (Column::Bool(v), Cell::Bool(x)) => v.push(x),
            (Column::Text(v), cell) => v.push(cell.render()),
            _ => return false,
        }
        true
    }
}

/// Writes one cell per event field into the current row.
///
/// A value that cannot go into the field's established column lands as text
/// in `<field>_mismatch` instead; the original column is back-filled.
struct RowVisitor<'a> {
    table: &'a mut Table,
}

impl RowVisitor<'_> {
    fn push(&mut self, field: &Field, cell: Cell<'_>) {
        let column = self.table.column_for(field.name(), cell.empty_column());
        if column.try_push(cell) {
            return;
        }
        let name = format!("{}_mismatch", field.name());
        let column = self.table.column_for(&name, Column::Text(Vec::new()));
        column.try_push(Cell::Text(&cell.render()));
    }
}

impl Visit for RowVisitor<'_> {
    fn record_u64(&mut self, field: &Field, value: u64) {
        self.push(field, Cell::U64(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.push(field, Cell::I64(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.push(field, Cell::F64(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.push(field, Cell::Bool(value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, Cell::Text(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.record_str(field, &format!("{value:?}"));
    }
}

/// Subscriber that records info-level events into the thread-local tables.
///
/// With a target list, events from other targets are ignored.
#[derive(Debug, Clone, Default)]
pub struct TableSubscriber {
    targets: Option<Vec<String>>,
}

impl TableSubscriber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_targets(targets: &[&str]) -> Self {
        Self {
            targets: Some(targets.iter().map(|t| t.to_string()).collect()),
        }
    }

    fn wants(&self, target: &str) -> bool {
        self.targets
            .as_ref()
            .is_none_or(|targets| targets.iter().any(|t| t == target))
    }
}

impl Subscriber for TableSubscriber {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.is_event() && *metadata.level() <= Level::INFO && self.wants(metadata.target())
    }

    fn new_span(&self, _span: &Attributes<'_>) -> Id {
        Id::from_u64(1)
    }

    fn record(&self, _span: &Id, _values: &Record<'_>) {}

    fn record_follows_from(&self, _span: &Id, _follows: &Id) {}

    fn event(&self, event: &Event<'_>) {
        let target = event.metadata().target();
        RECORDER.with(|r| {
            let mut recorder = r.borrow_mut();
            let table = recorder.tables.entry(target.to_string()).or_default();
            event.record(&mut RowVisitor { table });
            table.finish_row();
        });
    }

    fn enter(&self, _span: &Id) {}

    fn exit(&self, _span: &Id) {}
}

/// Install a recording subscriber as the process-wide default. Later calls
/// are ignored.
pub fn install_global() {
    let _ = tracing::subscriber::set_global_default(TableSubscriber::new());
}

/// Take everything recorded on this thread, leaving it empty.
pub fn drain() -> Recorder {
    RECORDER.with(|r| std::mem::take(&mut *r.borrow_mut()))
}

pub fn clear() {
    RECORDER.with(|r| *r.borrow_mut() = Recorder::default());
}

/// Run `f` with a scoped recording subscriber and return what it emitted.
/// Data recorded on this thread before the call is discarded.
pub fn capture<T>(f: impl FnOnce() -> T) -> (T, Recorder) {
    clear();
    let out = tracing::subscriber::with_default(TableSubscriber::new(), f);
    (out, drain())
}

// ============================================================================
// Polars Integration
// ============================================================================

use polars::prelude::{Column as FrameColumn, DataFrame, NamedFrom, ParquetWriter, PolarsError, PolarsResult};

impl Column {
    fn to_frame_column(&self, name: &str) -> FrameColumn {
        match self {
            Column::U64(v) => FrameColumn::new(name.into(), v),
            Column::I64(v) => FrameColumn::new(name.into(), v),
            Column::F64(v) => FrameColumn::new(name.into(), v),
            Column::Bool(v) => FrameColumn::new(name.into(), v),
            Column::Text(v) => FrameColumn::new(name.into(), v),
        }
    }
}

impl Table {
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let columns = self
            .columns
            .iter()
            .map(|(name, column)| column.to_frame_column(name))
            .collect();
        DataFrame::new(columns)
    }
}

impl Recorder {
    /// One DataFrame per target. Tables that fail to convert are skipped.
    pub fn to_dataframes(&self) -> HashMap<String, DataFrame> {
        self.tables
            .iter()
            .filter_map(|(name, table)| table.to_dataframe().ok().map(|df| (name.clone(), df)))
            .collect()
    }
}

fn io_error(err: std::io::Error) -> PolarsError {
    PolarsError::IO {
        error: err.into(),
        msg: None,
    }
}

/// Write each frame to `{dir}/{target}.parquet`.
pub fn save_parquet(frames: &mut HashMap<String, DataFrame>, dir: &Path) -> PolarsResult<()> {
    std::fs::create_dir_all(dir).map_err(io_error)?;
    for (name, df) in frames.iter_mut() {
        let file = std::fs::File::create(dir.join(format!("{name}.parquet"))).map_err(io_error)?;
        ParquetWriter::new(file).finish(df)?;
    }
    Ok(())
}

/// Keep the characters that are safe in a directory name.
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .take(60)
        .collect()
}

/// Records a whole run and writes it as parquet when dropped.
///
/// Each run gets `{parent}/{unix_secs}_{name}/`, one file per target plus an
/// empty `_ready` marker once all files are written.
///
/// ```ignore
/// let mut run = instrument::RunArchive::new("runs", "long_population_run");
/// world.run_frames(10_000);
/// let frames = run.frames();
/// // dropped here: runs/1760000000_long_population_run/*.parquet
/// ```
pub struct RunArchive {
    dir: PathBuf,
    frames: Option<HashMap<String, DataFrame>>,
}

impl RunArchive {
    pub fn new(parent: impl Into<PathBuf>, name: &str) -> Self {
        let secs = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        clear();
        install_global();
        Self {
            dir: parent.into().join(format!("{secs}_{}", sanitize(name))),
            frames: None,
        }
    }

    /// Drain on first call; later calls return the same frames.
    pub fn frames(&mut self) -> &HashMap<String, DataFrame> {
        self.frames.get_or_insert_with(|| drain().to_dataframes())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Drop for RunArchive {
    fn drop(&mut self) {
        let mut frames = self
            .frames
            .take()
            .unwrap_or_else(|| drain().to_dataframes());
        if frames.is_empty() {
            return;
        }
        if let Err(e) = save_parquet(&mut frames, &self.dir) {
            eprintln!("RunArchive: failed to write {}: {e}", self.dir.display());
            return;
        }
        if let Err(e) = std::fs::File::create(self.dir.join("_ready")) {
            eprintln!("RunArchive: failed to write _ready marker: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_become_rows_per_target() {
        let ((), recorder) = capture(|| {
            tracing::info!(target: "birth", tick = 0u64, uid = 0u64, money = 95.0f64);
            tracing::info!(target: "birth", tick = 0u64, uid = 1u64, money = 72.0f64);
            tracing::info!(target: "death", tick = 40u64, uid = 0u64);
        });

        assert_eq!(recorder.count("birth"), 2);
        assert_eq!(recorder.count("death"), 1);
        assert_eq!(recorder.count("frame"), 0);

        let births = recorder.table("birth").unwrap();
        assert_eq!(births.u64s("uid"), Some(&[0, 1][..]));
        assert_eq!(births.f64s("money"), Some(&[95.0, 72.0][..]));
        assert_eq!(births.column_names().collect::<Vec<_>>(), vec!["money", "tick", "uid"]);
    }

    #[test]
    fn late_and_missing_fields_are_back_filled() {
        let ((), recorder) = capture(|| {
            tracing::info!(target: "activity", tick = 1u64, kind = "work");
            tracing::info!(target: "activity", tick = 2u64, kind = "earn", icon = "💰");
            tracing::info!(target: "activity", tick = 3u64);
        });

        let table = recorder.table("activity").unwrap();
        assert_eq!(table.rows(), 3);
        let icons = table.texts("icon").unwrap();
        assert_eq!(icons, &["".to_string(), "💰".to_string(), "".to_string()]);
        let kinds = table.texts("kind").unwrap();
        assert_eq!(kinds[2], "");
        assert!(table.column_names().all(|name| table.column(name).unwrap().len() == 3));
    }

    #[test]
    fn mistyped_values_are_widened_or_kept_aside() {
        let ((), recorder) = capture(|| {
            tracing::info!(target: "frame", tick = 1u64, money = 10.0f64, label = "a");
            tracing::info!(target: "frame", tick = 2.5f64, money = 12u64, label = 7i64);
            tracing::info!(target: "frame", tick = 3i64, money = -1i64, label = true);
        });

        let frames = recorder.table("frame").unwrap();
        assert_eq!(frames.rows(), 3);
        assert_eq!(frames.u64s("tick"), Some(&[1, 0, 3][..]));
        assert_eq!(frames.texts("tick_mismatch").unwrap(), &["", "2.5", ""]);
        assert_eq!(frames.f64s("money"), Some(&[10.0, 12.0, -1.0][..]));
        assert!(frames.column("money_mismatch").is_none());
        assert_eq!(frames.texts("label").unwrap(), &["a", "7", "true"]);
    }

    #[test]
    fn target_filter_drops_other_events() {
        clear();
        tracing::subscriber::with_default(TableSubscriber::for_targets(&["death"]), || {
            tracing::info!(target: "death", uid = 3u64);
            tracing::info!(target: "activity", tick = 1u64);
        });
        let recorder = drain();
        assert_eq!(recorder.targets().collect::<Vec<_>>(), vec!["death"]);
    }

    #[test]
    fn debug_level_is_ignored() {
        let ((), recorder) = capture(|| {
            tracing::debug!(target: "frame", tick = 1u64);
        });
        assert!(recorder.is_empty());
    }

    #[test]
    fn tables_convert_to_dataframes() {
        let ((), recorder) = capture(|| {
            for tick in 0..5u64 {
                tracing::info!(target: "frame", tick, living = 6u64, total_money = 500.0f64);
            }
        });
        let frames = recorder.to_dataframes();
        let df = &frames["frame"];
        assert_eq!(df.height(), 5);
        assert_eq!(df.width(), 3);
    }

    #[test]
    fn sanitize_keeps_names_filesystem_safe() {
        assert_eq!(sanitize("long run/seed 7"), "long_run_seed_7");
        assert_eq!(sanitize(&"x".repeat(100)).len(), 60);
    }
}
