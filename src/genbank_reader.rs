use crate::error::{GbGenesError, Result};
use crate::feature_table::ParseState;
use crate::gene::Gene;
use crate::options::ParseOptions;
use std::fs::File;
use std::io::{BufRead, BufReader};
use tracing::info;

/// Folds every line of `reader` through the feature-table state machine and
/// returns the genes in file order. Only read failures are reported.
pub fn read_genes<R: BufRead>(reader: R, options: &ParseOptions) -> Result<Vec<Gene>> {
    let mut genes = Vec::new();
    let mut state = ParseState::default();
    for line in reader.lines() {
        let (next, emitted) = state.step(&line?, options);
        genes.extend(emitted);
        state = next;
    }
    genes.extend(state.finish(options));
    Ok(genes)
}

pub fn parse_genes_str(text: &str, options: &ParseOptions) -> Vec<Gene> {
    let (state, mut genes) = text.lines().fold(
        (ParseState::default(), Vec::new()),
        |(state, mut genes), line| {
            let (next, emitted) = state.step(line, options);
            genes.extend(emitted);
            (next, genes)
        },
    );
    genes.extend(state.finish(options));
    genes
}

pub fn parse_genbank_file(path: &str, options: &ParseOptions) -> Result<Vec<Gene>> {
    let file = File::open(path).map_err(|e| GbGenesError::io_at(path, e))?;
    let genes = read_genes(BufReader::new(file), options).map_err(|e| match e {
        GbGenesError::Io(err) => GbGenesError::io_at(path, err),
        other => other,
    })?;
    info!(path, genes = genes.len(), "parsed GenBank feature table");
    Ok(genes)
}
