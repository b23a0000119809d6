// Metrea LLC Intellectual Property
// Originally developed by Raw Socket Labs LLC

// STD LIB
use std::fs;
use std::path::Path;
use std::str::FromStr;

// THIRD PARTY CRATES
use tracing::{debug, info, warn};

// LOCAL CRATE
use crate::{ConfigError, Freq, Mode, ParseEntryError};
use crate::{COMMENT_MARKER, MAX_ENTRIES, MAX_SWEEP_POSITIONS};

/// One line of the plan file: `start,stop,step,mode`.
///
/// `max_freq` and `step` are only meaningful together; an entry that carries
/// a `max_freq` describes a range sweep starting at `freq`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanEntry {
    pub freq: Freq,
    pub max_freq: Option<Freq>,
    pub step: Option<Freq>,
    pub mode: Mode,
}

impl ScanEntry {
    pub fn single(freq: Freq, mode: Mode) -> Self {
        Self {
            freq,
            max_freq: None,
            step: None,
            mode,
        }
    }

    pub fn range(start: Freq, stop: Freq, step: Freq, mode: Mode) -> Self {
        Self {
            freq: start,
            max_freq: Some(stop),
            step: Some(step),
            mode,
        }
    }

    pub fn is_range(&self) -> bool {
        self.max_freq.is_some()
    }

    fn validate_range(&self, line: usize) -> Result<(), ConfigError> {
        let Some(stop) = self.max_freq else {
            return Ok(());
        };
        if self.freq > stop {
            return Err(ConfigError::InvalidRange {
                line,
                start: self.freq,
                stop,
            });
        }
        match self.step {
            Some(step) if *step > 0 => Ok(()),
            _ => Err(ConfigError::InvalidStep { line }),
        }
    }
}

impl FromStr for ScanEntry {
    type Err = ParseEntryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.trim().split(',').collect();
        if fields.len() != 4 {
            return Err(ParseEntryError::FieldCount(fields.len()));
        }
        if fields[0].trim().is_empty() {
            return Err(ParseEntryError::MissingStart);
        }

        Ok(Self {
            freq: fields[0].parse()?,
            max_freq: optional_freq(fields[1])?,
            step: optional_freq(fields[2])?,
            mode: fields[3].parse()?,
        })
    }
}

fn optional_freq(field: &str) -> Result<Option<Freq>, ParseEntryError> {
    match field.trim() {
        "" => Ok(None),
        value => value.parse().map(Some),
    }
}

/// What to scan. Built once at startup and immutable afterwards.
///
/// Only [`ScanPlan::parse`], [`ScanPlan::load`] and [`ScanPlan::from_entries`]
/// construct a plan, so every plan has at least one position and a range
/// sweep always has a non-zero step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanPlan {
    kind: PlanKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PlanKind {
    /// Visit each entry in file order, then wrap to the first.
    DiscreteList(Vec<ScanEntry>),
    /// Walk `start..=stop` in `step` increments, then wrap to `start`.
    RangeSweep {
        start: Freq,
        stop: Freq,
        step: Freq,
        mode: Mode,
    },
}

impl ScanPlan {
    /// Read and validate the plan file at `path`.
    ///
    /// Bytes that are not valid UTF-8 are replaced rather than rejected, so a
    /// stray byte only affects the line it sits on.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Loading scan plan from {}", path.display());
        Self::parse(&String::from_utf8_lossy(&bytes))
    }

    /// Build a plan from the text of a plan file.
    ///
    /// Comment and blank lines are ignored. Lines that do not parse are
    /// reported and skipped; the plan is then degraded, not rejected.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let mut numbered = Vec::new();
        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with(COMMENT_MARKER) {
                continue;
            }
            match line.parse::<ScanEntry>() {
                Ok(entry) => {
                    if numbered.len() == MAX_ENTRIES {
                        return Err(ConfigError::TooManyEntries { max: MAX_ENTRIES });
                    }
                    numbered.push((idx + 1, entry));
                }
                Err(e) => warn!(line = idx + 1, "Config file format error ({e}): {line}"),
            }
        }
        Self::build(numbered)
    }

    /// Build a plan from already parsed entries, applying the same checks as
    /// [`ScanPlan::parse`].
    pub fn from_entries(entries: Vec<ScanEntry>) -> Result<Self, ConfigError> {
        Self::build(entries.into_iter().enumerate().map(|(i, e)| (i + 1, e)).collect())
    }

    fn build(numbered: Vec<(usize, ScanEntry)>) -> Result<Self, ConfigError> {
        if numbered.len() > MAX_ENTRIES {
            return Err(ConfigError::TooManyEntries { max: MAX_ENTRIES });
        }
        for (line, entry) in numbered.iter().filter(|(_, e)| e.is_range()) {
            entry.validate_range(*line)?;
        }

        let first_range = numbered
            .iter()
            .find(|(_, e)| e.is_range())
            .map(|(line, e)| (*line, *e));

        let kind = match first_range {
            Some((line, range)) => {
                let ignored = numbered.len() - 1;
                if ignored > 0 {
                    warn!(
                        line,
                        ignored,
                        "Found a range entry; ignoring all other entries and scanning between min and max"
                    );
                }
                PlanKind::RangeSweep {
                    start: range.freq,
                    stop: range.max_freq.unwrap_or(range.freq),
                    step: range.step.unwrap_or_default(),
                    mode: range.mode,
                }
            }
            None => PlanKind::DiscreteList(numbered.into_iter().map(|(_, e)| e).collect()),
        };
        let plan = ScanPlan { kind };

        match plan.len() {
            0 => Err(ConfigError::Empty),
            n if n > MAX_SWEEP_POSITIONS => Err(ConfigError::TooManyPositions {
                positions: n,
                max: MAX_SWEEP_POSITIONS,
            }),
            _ => {
                plan.log_summary();
                Ok(plan)
            }
        }
    }

    /// Number of positions in one sweep.
    pub fn len(&self) -> usize {
        match &self.kind {
            PlanKind::DiscreteList(entries) => entries.len(),
            PlanKind::RangeSweep {
                start, stop, step, ..
            } => match **step {
                0 => 0,
                step => usize::try_from(stop.saturating_sub(**start) / step)
                    .map_or(usize::MAX, |n| n.saturating_add(1)),
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_range(&self) -> bool {
        matches!(self.kind, PlanKind::RangeSweep { .. })
    }

    /// Frequency and mode commanded at position 0.
    pub fn first(&self) -> (Freq, Mode) {
        match &self.kind {
            // Never empty once built
            PlanKind::DiscreteList(entries) => entries
                .first()
                .map(|e| (e.freq, e.mode))
                .unwrap_or_default(),
            PlanKind::RangeSweep { start, mode, .. } => (*start, *mode),
        }
    }

    /// Frequency and mode commanded at `position`, or `None` once `position`
    /// is past the end of the sweep.
    pub fn target(&self, position: usize) -> Option<(Freq, Mode)> {
        match &self.kind {
            PlanKind::DiscreteList(entries) => entries.get(position).map(|e| (e.freq, e.mode)),
            PlanKind::RangeSweep {
                start, step, mode, ..
            } => {
                if position >= self.len() {
                    return None;
                }
                let offset = u64::try_from(position).ok()?.checked_mul(**step)?;
                start.checked_add(offset).map(|hz| (Freq::new(hz), *mode))
            }
        }
    }

    /// Frequencies of every position, in sweep order.
    pub fn frequencies(&self) -> Vec<Freq> {
        (0..self.len())
            .filter_map(|pos| self.target(pos).map(|(freq, _)| freq))
            .collect()
    }

    fn log_summary(&self) {
        match &self.kind {
            PlanKind::DiscreteList(entries) => {
                for (idx, entry) in entries.iter().enumerate() {
                    debug!(
                        "Config line {idx}: Single Scan : Frequency: {}, Mode {}",
                        *entry.freq, entry.mode
                    );
                }
            }
            PlanKind::RangeSweep {
                start,
                stop,
                step,
                mode,
            } => debug!(
                "Range Scan : Min frequency: {}, Max frequency {}, Step size {}, Mode {}",
                **start, **stop, **step, mode
            ),
        }
        info!(positions = self.len(), range = self.is_range(), "Scan plan loaded");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn mhz(value: f64) -> Freq {
        Freq::from_mhz(value).unwrap()
    }

    #[test]
    fn test_single_frequency_line() {
        let plan = ScanPlan::parse("103,,,\n").unwrap();
        assert_eq!(
            plan.kind,
            PlanKind::DiscreteList(vec![ScanEntry::single(
                Freq::new(103_000_000),
                Mode::NarrowFm
            )])
        );
        assert_eq!(plan.first(), (Freq::new(103_000_000), Mode::NarrowFm));
        assert_eq!(plan.len(), 1);
    }

    #[test]
    fn test_range_line() {
        let plan = ScanPlan::parse("88,108,0.1,1\n").unwrap();
        assert_eq!(
            plan.kind,
            PlanKind::RangeSweep {
                start: Freq::new(88_000_000),
                stop: Freq::new(108_000_000),
                step: Freq::new(100_000),
                mode: Mode::WideFm,
            }
        );
        assert_eq!(plan.len(), 201);
        assert_eq!(plan.target(200), Some((Freq::new(108_000_000), Mode::WideFm)));
        assert_eq!(plan.target(201), None);
    }

    #[test]
    fn test_discrete_list_keeps_file_order() {
        let text = "# channel list\n165.9375,,,0\n\n166.05,,,1\n  # indented comment\n168.975,,,\n";
        let plan = ScanPlan::parse(text).unwrap();
        assert_eq!(plan.frequencies(), vec![mhz(165.9375), mhz(166.05), mhz(168.975)]);
        assert_eq!(plan.target(1), Some((mhz(166.05), Mode::WideFm)));
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let text = "103,,,\nnot a line\n104,,\n105,,,7\n,,,1\n106,,,1\n";
        let plan = ScanPlan::parse(text).unwrap();
        assert_eq!(plan.frequencies(), vec![mhz(103.0), mhz(106.0)]);
    }

    #[test]
    fn test_thirty_entries_accepted() {
        let text: String = (0..MAX_ENTRIES).map(|i| format!("{},,,0\n", 400 + i)).collect();
        assert_eq!(ScanPlan::parse(&text).unwrap().len(), MAX_ENTRIES);
    }

    #[test]
    fn test_too_many_entries_is_fatal() {
        let text: String = (0..=MAX_ENTRIES).map(|i| format!("{},,,0\n", 400 + i)).collect();
        assert!(matches!(
            ScanPlan::parse(&text),
            Err(ConfigError::TooManyEntries { max: MAX_ENTRIES })
        ));
    }

    #[test]
    fn test_malformed_lines_do_not_count_toward_limit() {
        let mut text: String = (0..MAX_ENTRIES).map(|i| format!("{},,,0\n", 400 + i)).collect();
        text.push_str("garbage\n# comment\n");
        assert_eq!(ScanPlan::parse(&text).unwrap().len(), MAX_ENTRIES);
    }

    #[test]
    fn test_inverted_range_is_fatal() {
        assert!(matches!(
            ScanPlan::parse("108,88,0.1,1\n"),
            Err(ConfigError::InvalidRange { line: 1, .. })
        ));
    }

    #[test]
    fn test_range_without_step_is_fatal() {
        assert!(matches!(
            ScanPlan::parse("103,,,\n88,108,,1\n"),
            Err(ConfigError::InvalidStep { line: 2 })
        ));
        assert!(matches!(
            ScanPlan::parse("88,108,0,1\n"),
            Err(ConfigError::InvalidStep { line: 1 })
        ));
    }

    #[test]
    fn test_first_range_wins_and_others_are_ignored() {
        let plan = ScanPlan::parse("103,,,0\n88,90,0.5,1\n150,160,1,0\n104,,,0\n").unwrap();
        assert_eq!(
            plan.kind,
            PlanKind::RangeSweep {
                start: mhz(88.0),
                stop: mhz(90.0),
                step: mhz(0.5),
                mode: Mode::WideFm,
            }
        );
        assert_eq!(plan.len(), 5);
    }

    #[test]
    fn test_degenerate_range_has_one_position() {
        let plan = ScanPlan::parse("100,100,0.0125,0\n").unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.frequencies(), vec![mhz(100.0)]);
    }

    #[test]
    fn test_range_positions_floor() {
        // 88.0, 88.3, 88.6, 88.9; 89.2 would exceed the stop
        let plan = ScanPlan::parse("88,89,0.3,0\n").unwrap();
        assert_eq!(plan.len(), 4);
    }

    #[test]
    fn test_oversized_range_is_fatal() {
        assert!(matches!(
            ScanPlan::parse("0,1000,0.001,0\n"),
            Err(ConfigError::TooManyPositions { .. })
        ));
    }

    #[test]
    fn test_empty_plan_is_fatal() {
        assert!(matches!(ScanPlan::parse("# nothing here\n"), Err(ConfigError::Empty)));
        assert!(matches!(ScanPlan::from_entries(vec![]), Err(ConfigError::Empty)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# freq, stop, step, mode").unwrap();
        writeln!(file, "453.5,,,0").unwrap();
        writeln!(file, "453.9875,,,0").unwrap();
        let plan = ScanPlan::load(file.path()).unwrap();
        assert_eq!(plan.frequencies(), vec![mhz(453.5), mhz(453.9875)]);
    }

    #[test]
    fn test_load_tolerates_invalid_utf8() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"# Caf\xe9 channel list\n103,,,0\n10\xff4,,,0\n").unwrap();
        let plan = ScanPlan::load(file.path()).unwrap();
        assert_eq!(plan.frequencies(), vec![mhz(103.0)]);
    }

    #[test]
    fn test_range_near_u64_limit_does_not_overflow() {
        let plan = ScanPlan::parse("18000000000000,18000000000000,18000000000000,0\n").unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.target(0), Some((Freq::new(18_000_000_000_000_000_000), Mode::NarrowFm)));
        assert_eq!(plan.target(1), None);
        assert_eq!(plan.target(usize::MAX), None);
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            ScanPlan::load("/nonexistent/config.txt"),
            Err(ConfigError::Io { .. })
        ));
    }
}
