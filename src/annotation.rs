//! Gene list and topology of one GenBank record, as handed to model code.

use crate::error::Result;
use crate::feature_location::gene_feature;
use crate::genbank_reader::{parse_genbank_file, parse_genes_str};
use crate::gene::Gene;
use crate::options::ParseOptions;
use crate::topology::{GenomeTopology, detect_genome_topology, detect_genome_topology_file};
use gb_io::seq::Feature;
use serde::Serialize;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GenomeAnnotation {
    topology: GenomeTopology,
    genes: Vec<Gene>,
}

impl GenomeAnnotation {
    pub fn new(topology: GenomeTopology, genes: Vec<Gene>) -> Self {
        Self { topology, genes }
    }

    /// Reads the file twice: once for the topology, once for the genes.
    pub fn from_genbank_file(path: &str, options: &ParseOptions) -> Result<Self> {
        let topology = detect_genome_topology_file(path)?;
        let genes = parse_genbank_file(path, options)?;
        Ok(Self::new(topology, genes))
    }

    pub fn from_genbank_text(text: &str, options: &ParseOptions) -> Result<Self> {
        let topology = detect_genome_topology(text.as_bytes())?;
        Ok(Self::new(topology, parse_genes_str(text, options)))
    }

    pub fn topology(&self) -> GenomeTopology {
        self.topology
    }

    pub fn genes(&self) -> &[Gene] {
        &self.genes
    }

    pub fn gene_count(&self) -> usize {
        self.genes.len()
    }

    /// Sum of all gene lengths, saturating; overlapping genes are counted twice.
    pub fn total_coding_length(&self) -> usize {
        self.genes
            .iter()
            .fold(0usize, |total, gene| total.saturating_add(gene.length()))
    }

    pub fn find_gene(&self, name: &str) -> Option<&Gene> {
        self.genes.iter().find(|gene| gene.name() == name)
    }

    /// Genes as gb-io `CDS` features, in file order. Genes whose coordinates do
    /// not fit gb-io's `i64` positions are left out.
    pub fn gb_features(&self) -> Vec<Feature> {
        self.genes.iter().filter_map(gene_feature).collect()
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct AnnotationSummary {
    pub topology: GenomeTopology,
    pub gene_count: usize,
    pub total_coding_length: usize,
    pub reverse_strand_genes: usize,
    pub spliced_genes: usize,
}

impl From<&GenomeAnnotation> for AnnotationSummary {
    fn from(annotation: &GenomeAnnotation) -> Self {
        Self {
            topology: annotation.topology(),
            gene_count: annotation.gene_count(),
            total_coding_length: annotation.total_coding_length(),
            reverse_strand_genes: annotation
                .genes()
                .iter()
                .filter(|gene| gene.strand().is_reverse())
                .count(),
            spliced_genes: annotation.genes().iter().filter(|g| g.is_spliced()).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gb_io::seq::Location;
    use std::fs;
    use tempfile::tempdir;

    const TOY: &str = "\
LOCUS       BX548174   1657990 bp    DNA     circular BCT 01-JAN-2003
FEATURES             Location/Qualifiers
     CDS             complement(join(100..200,300..400))

     CDS             500..700
                     /gene=\"psbA\"
                     /product=\"photosystem II protein D1\"
";

    #[test]
    fn test_from_text() {
        let annotation = GenomeAnnotation::from_genbank_text(TOY, &ParseOptions::default()).unwrap();
        assert_eq!(annotation.topology(), GenomeTopology::Circular);
        assert_eq!(annotation.gene_count(), 2);
        assert_eq!(annotation.total_coding_length(), 403);
        assert_eq!(annotation.find_gene("psbA").unwrap().start(), 500);
        assert!(annotation.find_gene("psbB").is_none());
    }

    #[test]
    fn test_from_file_matches_text() {
        let td = tempdir().unwrap();
        let path = td.path().join("med4.gb");
        fs::write(&path, TOY).unwrap();
        let options = ParseOptions::default();
        let from_file =
            GenomeAnnotation::from_genbank_file(&path.to_string_lossy(), &options).unwrap();
        let from_text = GenomeAnnotation::from_genbank_text(TOY, &options).unwrap();
        assert_eq!(from_file, from_text);
    }

    #[test]
    fn test_huge_coordinates_do_not_overflow_summary() {
        let text = "CDS 1..10000000000000000000\n\nCDS 1..10000000000000000000\n";
        let annotation =
            GenomeAnnotation::from_genbank_text(text, &ParseOptions::default()).unwrap();
        assert_eq!(annotation.gene_count(), 2);
        let summary = AnnotationSummary::from(&annotation);
        assert_eq!(summary.total_coding_length, usize::MAX);
    }

    #[test]
    fn test_gb_features_follow_gene_order() {
        let annotation =
            GenomeAnnotation::from_genbank_text(TOY, &ParseOptions::default()).unwrap();
        let features = annotation.gb_features();
        assert_eq!(features.len(), 2);
        assert!(matches!(features[0].location, Location::Complement(_)));
        assert_eq!(features[1].location, Location::simple_range(499, 700));
    }

    #[test]
    fn test_summary() {
        let annotation = GenomeAnnotation::from_genbank_text(TOY, &ParseOptions::default()).unwrap();
        let summary = AnnotationSummary::from(&annotation);
        assert_eq!(summary.gene_count, 2);
        assert_eq!(summary.reverse_strand_genes, 1);
        assert_eq!(summary.spliced_genes, 1);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["topology"], "circular");
        assert_eq!(json["total_coding_length"], 403);
    }
}
