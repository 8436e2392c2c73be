//! Genome topology as declared on the `LOCUS` line.

use crate::error::{GbGenesError, Result};
use gb_io::seq::Topology;
use serde::Serialize;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GenomeTopology {
    Circular,
    Linear,
    #[default]
    Unknown,
}

impl GenomeTopology {
    pub fn label(self) -> &'static str {
        match self {
            Self::Circular => "circular",
            Self::Linear => "linear",
            Self::Unknown => "unknown",
        }
    }

    /// Reads the sixth whitespace-separated token of a `LOCUS` line.
    pub fn from_locus_line(line: &str) -> Self {
        match line
            .split_whitespace()
            .nth(5)
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("circular") => Self::Circular,
            Some("linear") => Self::Linear,
            _ => Self::Unknown,
        }
    }

    pub fn to_gb_topology(self) -> Option<Topology> {
        match self {
            Self::Circular => Some(Topology::Circular),
            Self::Linear => Some(Topology::Linear),
            Self::Unknown => None,
        }
    }
}

impl fmt::Display for GenomeTopology {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Scans for the first `LOCUS` line and stops reading there.
pub fn detect_genome_topology<R: BufRead>(reader: R) -> Result<GenomeTopology> {
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.starts_with("LOCUS") {
            return Ok(GenomeTopology::from_locus_line(trimmed));
        }
    }
    Ok(GenomeTopology::Unknown)
}

pub fn detect_genome_topology_file(path: &str) -> Result<GenomeTopology> {
    let file = File::open(path).map_err(|e| GbGenesError::io_at(path, e))?;
    detect_genome_topology(BufReader::new(file)).map_err(|e| match e {
        GbGenesError::Io(err) => GbGenesError::io_at(path, err),
        other => other,
    })
}
