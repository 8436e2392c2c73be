//! Extraction of coding-sequence gene records from GenBank flat files.

pub mod about;
pub mod annotation;
pub mod error;
pub mod feature_location;
pub mod feature_table;
pub mod genbank_reader;
pub mod gene;
pub mod options;
pub mod topology;

pub use annotation::{AnnotationSummary, GenomeAnnotation};
pub use error::{GbGenesError, Result};
pub use genbank_reader::{parse_genbank_file, parse_genes_str, read_genes};
pub use gene::{Gene, Strand};
pub use options::ParseOptions;
pub use topology::{GenomeTopology, detect_genome_topology, detect_genome_topology_file};
