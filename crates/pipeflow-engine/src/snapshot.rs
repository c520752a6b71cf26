//! Snapshot cadence and the CSV snapshot format.
//!
//! A snapshot is one CSV file per crossed threshold:
//!
//! ```text
//! time,idx,rho,vel,pres
//! 0.100000,0,1.206241884531e+00,0.000000000000e+00,1.013250000000e+05
//! ...
//! ```
//!
//! named `snapshot_{time:.6e}.csv` with a C-style two-digit exponent.

use std::error::Error;
use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use pipeflow_core::{FieldId, FieldReader, StepId, ALL_FIELDS, DENSITY, PRESSURE, VELOCITY};

// ── SnapshotError ──────────────────────────────────────────────────

/// Errors from capturing or writing a snapshot.
///
/// Never fatal: the driver logs them and counts the snapshot as skipped.
#[derive(Debug)]
pub enum SnapshotError {
    /// Creating the directory or writing the file failed.
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// The state does not expose a required field.
    MissingField {
        /// The absent field.
        field: FieldId,
    },
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot write snapshot {}: {source}", path.display())
            }
            Self::MissingField { field } => {
                write!(f, "snapshot source has no field {field}")
            }
        }
    }
}

impl Error for SnapshotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::MissingField { .. } => None,
        }
    }
}

// ── SnapshotCadence ────────────────────────────────────────────────

/// Decides when a snapshot is due.
///
/// Thresholds sit at `k · interval` for `k = 1, 2, ...`. A snapshot is due
/// on the first step whose time `step · dt` reaches the next threshold; if
/// one step crosses several thresholds only one snapshot is written.
///
/// Due steps are computed in step space. A threshold that lands on a step
/// up to floating-point noise (`0.3 / 1e-4` is `3000.0000000000005`) is due
/// on that step, not the one after.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SnapshotCadence {
    interval: f64,
    dt: f64,
    crossed: u64,
}

/// Relative distance from an integer step count still treated as exact.
const STEP_TOLERANCE: f64 = 1e-9;

impl SnapshotCadence {
    /// Cadence with the given interval for a run stepping by `dt`. The
    /// caller guarantees both are finite and `> 0`.
    pub fn new(interval: f64, dt: f64) -> Self {
        Self {
            interval,
            dt,
            crossed: 0,
        }
    }

    /// Time at which the next snapshot becomes due.
    pub fn next_threshold(&self) -> f64 {
        (self.crossed + 1) as f64 * self.interval
    }

    /// First step whose time reaches the next threshold.
    pub fn next_due_step(&self) -> StepId {
        StepId(self.due_step(self.crossed + 1))
    }

    /// Thresholds crossed so far.
    pub fn crossed(&self) -> u64 {
        self.crossed
    }

    /// Returns `true` if `step` reached the next threshold, and advances
    /// past every threshold reached by `step`.
    pub fn poll(&mut self, step: StepId) -> bool {
        if step < self.next_due_step() {
            return false;
        }
        while step >= self.next_due_step() {
            self.crossed += 1;
        }
        true
    }

    fn due_step(&self, k: u64) -> u64 {
        let exact = k as f64 * self.interval / self.dt;
        let nearest = exact.round();
        if (exact - nearest).abs() <= STEP_TOLERANCE * nearest.max(1.0) {
            nearest as u64
        } else {
            exact.ceil() as u64
        }
    }
}

// ── SnapshotJob ────────────────────────────────────────────────────

/// One sampled grid row.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SnapshotRow {
    /// Grid index.
    pub index: usize,
    /// Density at the index.
    pub density: f64,
    /// Velocity at the index.
    pub velocity: f64,
    /// Pressure at the index.
    pub pressure: f64,
}

/// A captured snapshot, owned so it can cross to a writer thread.
#[derive(Clone, Debug, PartialEq)]
pub struct SnapshotJob {
    /// Simulation time of the snapshot.
    pub time: f64,
    /// Sampled rows in index order.
    pub rows: Vec<SnapshotRow>,
}

impl SnapshotJob {
    /// Copy the sampled `indices` out of `reader`.
    ///
    /// Indices past the end of a field are skipped.
    pub fn capture(
        time: f64,
        reader: &dyn FieldReader,
        indices: impl Iterator<Item = usize>,
    ) -> Result<Self, SnapshotError> {
        let field = |field: FieldId| reader.read(field).ok_or(SnapshotError::MissingField { field });
        let rho = field(DENSITY)?;
        let vel = field(VELOCITY)?;
        let pres = field(PRESSURE)?;
        let len = rho.len().min(vel.len()).min(pres.len());

        let rows = indices
            .take_while(|&i| i < len)
            .map(|i| SnapshotRow {
                index: i,
                density: rho[i],
                velocity: vel[i],
                pressure: pres[i],
            })
            .collect();
        Ok(Self { time, rows })
    }
}

// ── CSV output ─────────────────────────────────────────────────────

/// Format `value` in scientific notation with `precision` fraction digits
/// and a signed exponent of at least two digits, e.g. `1.5e+02`.
pub fn format_sci(value: f64, precision: usize) -> String {
    let s = format!("{value:.precision$e}");
    match s.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(d) => ('-', d),
                None => ('+', exp),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        // NaN and infinities have no exponent.
        None => s,
    }
}

/// File name for a snapshot taken at `time`.
pub fn file_name(time: f64) -> String {
    format!("snapshot_{}.csv", format_sci(time, 6))
}

/// CSV header line, without the trailing newline.
pub fn header() -> String {
    let mut cols = vec!["time", "idx"];
    cols.extend(ALL_FIELDS.iter().map(|f| f.name()));
    cols.join(",")
}

/// Write `job` into `dir`, creating the directory if needed.
///
/// Returns the path of the written file.
pub fn write_snapshot(dir: &Path, job: &SnapshotJob) -> Result<PathBuf, SnapshotError> {
    fs::create_dir_all(dir).map_err(|source| SnapshotError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = dir.join(file_name(job.time));
    write_csv(&path, job).map_err(|source| SnapshotError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

fn write_csv(path: &Path, job: &SnapshotJob) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "{}", header())?;
    for row in &job.rows {
        writeln!(
            out,
            "{:.6},{},{},{},{}",
            job.time,
            row.index,
            format_sci(row.density, 12),
            format_sci(row.velocity, 12),
            format_sci(row.pressure, 12),
        )?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipeflow_core::GridState;
    use pipeflow_test_utils::MockFieldReader;
    use proptest::prelude::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "pipeflow-snapshot-{name}-{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn sci_format_matches_printf() {
        assert_eq!(format_sci(0.1, 6), "1.000000e-01");
        assert_eq!(format_sci(60.0, 6), "6.000000e+01");
        assert_eq!(format_sci(0.0, 12), "0.000000000000e+00");
        assert_eq!(format_sci(101325.0, 12), "1.013250000000e+05");
        assert_eq!(format_sci(-2.5e-120, 3), "-2.500e-120");
    }

    #[test]
    fn file_name_encodes_time() {
        assert_eq!(file_name(0.1), "snapshot_1.000000e-01.csv");
        assert_eq!(file_name(1.0), "snapshot_1.000000e+00.csv");
    }

    #[test]
    fn header_lists_columns() {
        assert_eq!(header(), "time,idx,rho,vel,pres");
    }

    #[test]
    fn cadence_fires_once_per_threshold() {
        let mut c = SnapshotCadence::new(1.0, 0.25);
        let fired: Vec<bool> = (1..=9).map(|s| c.poll(StepId(s))).collect();
        assert_eq!(
            fired,
            vec![false, false, false, true, false, false, false, true, false]
        );
        assert_eq!(c.crossed(), 2);
        assert_eq!(c.next_threshold(), 3.0);
    }

    #[test]
    fn cadence_skips_thresholds_crossed_in_one_step() {
        let mut c = SnapshotCadence::new(0.1, 0.01);
        assert!(c.poll(StepId(35)));
        assert_eq!(c.crossed(), 3);
        assert!(!c.poll(StepId(38)));
        assert!(c.poll(StepId(40)));
    }

    #[test]
    fn cadence_hits_thresholds_despite_rounding() {
        // 3 · 0.1 is 0.30000000000000004 but 3000 · 1e-4 is 0.3.
        let dt = 1e-4;
        let mut c = SnapshotCadence::new(0.1, dt);
        for k in 1..=9u64 {
            let due = k * 1000;
            assert!(!c.poll(StepId(due - 1)), "threshold {k} fired early");
            assert!(c.poll(StepId(due)), "threshold {k} fired late");
            assert_eq!(
                file_name(StepId(due).time(dt)),
                format!("snapshot_{k}.000000e-01.csv")
            );
        }
    }

    #[test]
    fn cadence_between_steps_waits_for_the_next_step() {
        let mut c = SnapshotCadence::new(1.0, 0.3);
        assert_eq!(c.next_due_step(), StepId(4));
        assert!(!c.poll(StepId(3)));
        assert!(c.poll(StepId(4)));
        assert_eq!(c.next_due_step(), StepId(7));
    }

    #[test]
    fn capture_skips_out_of_range_indices() {
        let state = GridState::uniform(5, 1.0, 2.0);
        let job = SnapshotJob::capture(0.5, &state, [0, 2, 4, 6].into_iter()).unwrap();
        let idx: Vec<usize> = job.rows.iter().map(|r| r.index).collect();
        assert_eq!(idx, vec![0, 2, 4]);
        assert_eq!(job.rows[1].pressure, 2.0);
    }

    #[test]
    fn capture_reports_missing_field() {
        let mut reader = MockFieldReader::new();
        reader.set_field(DENSITY, vec![1.0; 4]);
        reader.set_field(VELOCITY, vec![0.0; 4]);
        let err = SnapshotJob::capture(0.0, &reader, 0..4).unwrap_err();
        assert!(matches!(err, SnapshotError::MissingField { field } if field == PRESSURE));
    }

    #[test]
    fn writes_header_and_rows() {
        let dir = scratch_dir("rows");
        let mut reader = MockFieldReader::new();
        reader.set_field(DENSITY, vec![1.5, 2.5, 3.5, 4.5]);
        reader.set_field(VELOCITY, vec![0.0, -1.0, 0.25, 0.0]);
        reader.set_field(PRESSURE, vec![10.0, 20.0, 30.0, 40.0]);
        let job = SnapshotJob::capture(0.2, &reader, (0..4).step_by(2)).unwrap();

        let path = write_snapshot(&dir, &job).unwrap();
        assert_eq!(path.file_name().unwrap(), "snapshot_2.000000e-01.csv");
        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "time,idx,rho,vel,pres",
                "0.200000,0,1.500000000000e+00,0.000000000000e+00,1.000000000000e+01",
                "0.200000,2,3.500000000000e+00,2.500000000000e-01,3.000000000000e+01",
            ]
        );
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn unwritable_directory_is_io_error() {
        let dir = scratch_dir("blocked");
        fs::create_dir_all(dir.parent().unwrap()).unwrap();
        // A regular file where the directory should be.
        fs::write(&dir, b"not a directory").unwrap();
        let job = SnapshotJob {
            time: 0.1,
            rows: Vec::new(),
        };
        let err = write_snapshot(&dir, &job).unwrap_err();
        assert!(matches!(err, SnapshotError::Io { .. }));
        assert!(err.source().is_some());
        let _ = fs::remove_file(&dir);
    }

    proptest! {
        #[test]
        fn cadence_stays_ahead_of_time(
            interval in 1e-3f64..1.0,
            dt in 1e-4f64..0.5,
            steps in 1u64..400,
        ) {
            let mut c = SnapshotCadence::new(interval, dt);
            let mut fired = 0u64;
            for s in 1..=steps {
                let step = StepId(s);
                let before = c.crossed();
                if c.poll(step) {
                    fired += 1;
                    prop_assert!(c.crossed() > before);
                    // Never earlier than the threshold it consumed.
                    let reached = c.crossed() as f64 * interval;
                    prop_assert!(step.time(dt) >= reached * (1.0 - 2e-9));
                } else {
                    prop_assert_eq!(c.crossed(), before);
                }
                prop_assert!(c.next_due_step() > step);
            }
            prop_assert!(fired <= c.crossed());
        }
    }
}
