pub use std::{
    io::{BufRead, BufReader},
    path::PathBuf,
    fmt,
    str::FromStr,
    time::Instant,
};
pub use thiserror::Error;
pub use itertools::Itertools;
pub use rayon::prelude::*;
pub use clap::{Parser, ValueEnum};

pub use crate::{Process, MemoryBlock, MemoryManager,
    algo::{Scheduler, Outcome, Skip, SkipReason},
    analyze::{Summary, external_fragmentation},
    procset::*,
};

/// The unit for measuring memory. Offsets and sizes share it.
pub type ByteSteps = usize;

/// The unit for measuring logical time. The clock is a plain
/// counter, not related to wall time in any way.
pub type Ticks = usize;

//---START CONFIGURATION
/// Which free block receives a request.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum, Debug)]
pub enum Strategy {
    /// Lowest-addressed free block that is large enough
    FirstFit,
    /// Smallest free block that is large enough
    BestFit,
}

impl FromStr for Strategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first_fit" | "first-fit"   => Ok(Strategy::FirstFit),
            "best_fit" | "best-fit"     => Ok(Strategy::BestFit),
            _                           => Err(ConfigError::UnknownStrategy(s.to_string())),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::FirstFit  => write!(f, "first_fit"),
            Strategy::BestFit   => write!(f, "best_fit"),
        }
    }
}

/// Which ready process gets the CPU next.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum, Debug)]
pub enum Policy {
    /// First come, first served
    Fcfs,
    /// Shortest job first (non-preemptive)
    Sjf,
}

impl FromStr for Policy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fcfs"  => Ok(Policy::Fcfs),
            "sjf"   => Ok(Policy::Sjf),
            _       => Err(ConfigError::UnknownPolicy(s.to_string())),
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Policy::Fcfs    => write!(f, "FCFS"),
            Policy::Sjf     => write!(f, "SJF"),
        }
    }
}
//---END CONFIGURATION

//---START ERRORS
#[derive(Error, Debug, Clone, PartialEq, Eq)]
/// Rejected simulator configuration.
pub enum ConfigError {
    #[error("Total memory must be greater than zero")]
    ZeroMemory,
    #[error("Unknown allocation strategy: {0}")]
    UnknownStrategy(String),
    #[error("Unknown scheduling policy: {0}")]
    UnknownPolicy(String),
}

#[derive(Error, Debug)]
#[error("{message}\n{:?}", culprit)]
/// Appears while validating the [Process] descriptors
/// handed to a simulation.
pub struct ProcessError {
    pub message: String,
    pub culprit: Process,
}

#[derive(Error, Debug)]
/// Appears while reading process descriptors from some source.
pub enum ParseError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("Line {line}: expected {expected} fields, found {found}")]
    FieldCount {
        line:       usize,
        expected:   usize,
        found:      usize,
    },
    #[error("Line {line}: bad number {value:?}")]
    BadNumber {
        line:   usize,
        value:  String,
    },
}
//---END ERRORS

//---START EXTERNAL INTERFACES
// The types listed below read process descriptors from
// some data source. To write your own, implement `ProcessGen`.

/// Defines the interface for reading processes.
pub trait ProcessGen<T> {
    fn new(path: PathBuf) -> Self;
    /// Either a set of processes is successfully returned,
    /// or the reason why not.
    fn read_processes(&self) -> Result<Vec<Process>, ParseError>;
    /// Uses some available data to spawn one [Process].
    fn gen_single(&self, d: T) -> Process;
}

pub const CSV_FIELDS_NUM: usize = 4;

/// Reads a CSV whose first line is a header, followed by
/// one `pid,arrival,burst,memory` line per process.
pub struct CsvParser {
    pub path: PathBuf,
}

impl ProcessGen<&[usize; CSV_FIELDS_NUM]> for CsvParser {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
        }
    }

    fn read_processes(&self) -> Result<Vec<Process>, ParseError> {
        let fd = std::fs::File::open(self.path.as_path())?;
        parse_csv(BufReader::new(fd), self)
    }

    fn gen_single(&self, d: &[usize; CSV_FIELDS_NUM]) -> Process {
        // `pid` is the only narrower field.
        Process::new(d[0] as u32, d[1], d[2], d[3])
    }
}

/// Does the actual CSV work for [CsvParser]; split out so that
/// any [BufRead] can be fed, not only files.
pub fn parse_csv<R: BufRead>(reader: R, parser: &CsvParser) -> Result<Vec<Process>, ParseError> {
    let mut res = vec![];
    let mut data_buf: [usize; CSV_FIELDS_NUM] = [0; CSV_FIELDS_NUM];

    // First line is the header!
    for (idx, line) in reader.lines().enumerate().skip(1) {
        let line = line?;
        let line_num = idx + 1;
        if line.trim().is_empty() { continue; }
        let fields = line.split(',')
            .map(|x| x.trim())
            .collect_vec();
        if fields.len() != CSV_FIELDS_NUM {
            return Err(ParseError::FieldCount {
                line:       line_num,
                expected:   CSV_FIELDS_NUM,
                found:      fields.len(),
            });
        }
        for (slot, field) in fields.into_iter().enumerate() {
            data_buf[slot] = field.parse::<usize>()
                .map_err(|_| ParseError::BadNumber {
                    line:   line_num,
                    value:  field.to_string(),
                })?;
        }
        if data_buf[0] > u32::MAX as usize {
            return Err(ParseError::BadNumber {
                line:   line_num,
                value:  data_buf[0].to_string(),
            });
        }
        res.push(parser.gen_single(&data_buf));
    }

    Ok(res)
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub enum InpuType {
    /// A CSV file with a header and `pid,arrival,burst,memory` rows
    Csv,
    /// A seeded, randomly generated workload
    Random,
}

/// Reads processes through `T` and puts them past the gatekeeper.
pub fn read_from_path<T, B>(file_path: PathBuf) -> Result<Vec<Process>, Box<dyn std::error::Error>>
where T: ProcessGen<B> {
    let parser = T::new(file_path);
    let processes = parser.read_processes()?;
    let set = crate::procset::init(processes)?;

    Ok(set)
}
//---END EXTERNAL INTERFACES
