//! Location expressions of CDS feature lines, and their gb-io counterparts.
//!
//! Only the `complement(join(a..b,c..d))` subset is understood. Segments that
//! do not look like `<digits>..<digits>` are dropped, which includes partial
//! boundaries such as `<1..200` or `300..>450`.

use crate::gene::{BaseRange, Gene, Strand};
use gb_io::seq::{Feature, Location};
use lazy_static::lazy_static;
use regex::Regex;
use std::borrow::Cow;
use tracing::trace;

/// gb-io 0.9 stores a feature's kind as a plain `Cow<'static, str>`.
type FeatureKind = Cow<'static, str>;

lazy_static! {
    static ref RANGE_SEGMENT: Regex =
        Regex::new(r"^(\d+)\.\.(\d+)$").expect("range segment pattern is valid");
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedLocation {
    pub ranges: Vec<BaseRange>,
    pub strand: Strand,
}

impl ParsedLocation {
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

pub fn parse_location(expression: &str) -> ParsedLocation {
    let mut body = expression.trim();
    let mut strand = Strand::Forward;
    if let Some(inner) = strip_wrapper(body, "complement(") {
        strand = Strand::Reverse;
        body = inner;
    }
    if let Some(inner) = strip_wrapper(body, "join(") {
        body = inner;
    }
    let ranges = body.split(',').filter_map(parse_segment).collect();
    ParsedLocation { ranges, strand }
}

fn strip_wrapper<'a>(text: &'a str, opener: &str) -> Option<&'a str> {
    text.strip_prefix(opener)?.strip_suffix(')')
}

fn parse_segment(segment: &str) -> Option<BaseRange> {
    let segment = segment.trim();
    let Some(caps) = RANGE_SEGMENT.captures(segment) else {
        trace!(segment, "dropping unsupported location segment");
        return None;
    };
    // Digit runs too long for the coordinate type are dropped like any other bad segment.
    let start = caps[1].parse().ok()?;
    let end = caps[2].parse().ok()?;
    Some((start, end))
}

/// gb-io location of a gene (0-based, end-exclusive as gb-io stores it).
/// Ranges beyond gb-io's `i64` coordinates are left out; `None` if none remain.
pub fn gene_location(gene: &Gene) -> Option<Location> {
    let mut parts: Vec<Location> = gene
        .ranges()
        .iter()
        .filter_map(|(start, end)| {
            let from = i64::try_from(start.saturating_sub(1)).ok()?;
            let to = i64::try_from(*end).ok()?;
            Some(Location::simple_range(from, to))
        })
        .collect();
    let location = match parts.len() {
        0 => return None,
        1 => parts.remove(0),
        _ => Location::Join(parts),
    };
    Some(match gene.strand() {
        Strand::Forward => location,
        Strand::Reverse => Location::Complement(Box::new(location)),
    })
}

/// The gene as a gb-io `CDS` feature carrying `/gene` and `/product`.
pub fn gene_feature(gene: &Gene) -> Option<Feature> {
    Some(Feature {
        kind: FeatureKind::from("CDS"),
        location: gene_location(gene)?,
        qualifiers: vec![
            ("gene".into(), Some(gene.name().to_string())),
            ("product".into(), Some(gene.function().to_string())),
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_single_range() {
        let parsed = parse_location("12..1500");
        assert_eq!(parsed.ranges, vec![(12, 1500)]);
        assert_eq!(parsed.strand, Strand::Forward);
    }

    #[test]
    fn test_complemented_join_keeps_order() {
        let parsed = parse_location("complement(join(266..1565,1567..1569))");
        assert_eq!(parsed.ranges, vec![(266, 1565), (1567, 1569)]);
        assert_eq!(parsed.strand, Strand::Reverse);
        let length: usize = parsed.ranges.iter().map(|(s, e)| e - s + 1).sum();
        assert_eq!(length, 1303);
    }

    #[test]
    fn test_join_without_complement_is_forward() {
        let parsed = parse_location("join(266..1565,1567..1569)");
        assert_eq!(parsed.ranges, vec![(266, 1565), (1567, 1569)]);
        assert_eq!(parsed.strand, Strand::Forward);
    }

    #[test]
    fn test_complement_of_single_range() {
        let parsed = parse_location("complement(3007..3516)");
        assert_eq!(parsed.ranges, vec![(3007, 3516)]);
        assert_eq!(parsed.strand, Strand::Reverse);
    }

    #[test]
    fn test_fuzzy_boundaries_are_dropped() {
        let parsed = parse_location("join(<1..200,300..400,500..>650)");
        assert_eq!(parsed.ranges, vec![(300, 400)]);
        assert!(parse_location("<1..200").is_empty());
    }

    #[test]
    fn test_garbage_yields_no_ranges() {
        assert!(parse_location("").is_empty());
        assert!(parse_location("order(1..2").is_empty());
        assert!(parse_location("99999999999999999999999..1").is_empty());
        let parsed = parse_location("complement(12)");
        assert!(parsed.is_empty());
        assert_eq!(parsed.strand, Strand::Reverse);
    }

    #[test]
    fn test_whitespace_around_segments() {
        let parsed = parse_location("  join(10..20, 30..40)  ");
        assert_eq!(parsed.ranges, vec![(10, 20), (30, 40)]);
    }

    #[test]
    fn test_gene_location_matches_gb_io_layout() {
        let gene = Gene::new("x", "y", vec![(10, 20), (40, 50)], Strand::Reverse).unwrap();
        assert_eq!(
            gene_location(&gene),
            Some(Location::Complement(Box::new(Location::Join(vec![
                Location::simple_range(9, 20),
                Location::simple_range(39, 50),
            ]))))
        );
    }

    #[test]
    fn test_single_forward_gene_location() {
        let gene = Gene::single("psbA", "photosystem II protein D1", 500, 700);
        assert_eq!(gene_location(&gene), Some(Location::simple_range(499, 700)));
    }

    #[test]
    fn test_zero_start_does_not_go_negative() {
        let gene = Gene::single("x", "y", 0, 5);
        assert_eq!(gene_location(&gene), Some(Location::simple_range(0, 5)));
    }

    #[test]
    fn test_coordinates_beyond_i64_are_left_out() {
        let gene = Gene::new(
            "x",
            "y",
            vec![(1, 10), (usize::MAX - 5, usize::MAX)],
            Strand::Forward,
        )
        .unwrap();
        assert_eq!(gene_location(&gene), Some(Location::simple_range(0, 10)));
        let huge = Gene::single("x", "y", 1, usize::MAX);
        assert_eq!(gene_location(&huge), None);
        assert!(gene_feature(&huge).is_none());
    }

    #[test]
    fn test_gene_feature_qualifiers() {
        let gene = Gene::single("psbA", "photosystem II protein D1", 500, 700);
        let feature = gene_feature(&gene).unwrap();
        assert_eq!(feature.kind, FeatureKind::from("CDS"));
        assert_eq!(feature.location, Location::simple_range(499, 700));
        let qualifiers: Vec<(String, Option<String>)> = feature
            .qualifiers
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect();
        assert_eq!(
            qualifiers,
            vec![
                ("gene".to_string(), Some("psbA".to_string())),
                (
                    "product".to_string(),
                    Some("photosystem II protein D1".to_string())
                ),
            ]
        );
    }

    proptest! {
        #[test]
        fn prop_digit_pairs_parse_verbatim(start in 1usize..10_000_000, span in 0usize..100_000) {
            let end = start + span;
            let parsed = parse_location(&format!("{start}..{end}"));
            prop_assert_eq!(parsed.ranges, vec![(start, end)]);
            prop_assert_eq!(parsed.strand, Strand::Forward);
        }

        #[test]
        fn prop_complement_always_reverses(pairs in prop::collection::vec((1usize..100_000, 0usize..1_000), 1..6)) {
            let ranges: Vec<BaseRange> = pairs.iter().map(|(s, span)| (*s, s + span)).collect();
            let body = ranges
                .iter()
                .map(|(s, e)| format!("{s}..{e}"))
                .collect::<Vec<_>>()
                .join(",");
            let parsed = parse_location(&format!("complement(join({body}))"));
            prop_assert_eq!(parsed.strand, Strand::Reverse);
            prop_assert_eq!(parsed.ranges, ranges);
        }
    }
}
