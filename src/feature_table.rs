//! Line-by-line state machine over a GenBank feature table.
//!
//! Each call to [`ParseState::step`] consumes one line and may hand back a
//! finished [`Gene`]. Nothing is shared between separate folds, so the same
//! text can be parsed any number of times with identical results.

use crate::feature_location::{ParsedLocation, parse_location};
use crate::gene::Gene;
use crate::options::ParseOptions;
use tracing::debug;

/// Feature keys of the GenBank feature table. Only `Cds` opens a record; the
/// others matter because they close one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FeatureKey {
    Cds,
    Gene,
    MRna,
    TRna,
    RRna,
    NcRna,
    MiscFeature,
    Source,
    RepeatRegion,
    Other(String),
}

impl FeatureKey {
    pub fn from_key(key: &str) -> Self {
        match key {
            "CDS" => Self::Cds,
            "gene" => Self::Gene,
            "mRNA" => Self::MRna,
            "tRNA" => Self::TRna,
            "rRNA" => Self::RRna,
            "ncRNA" => Self::NcRna,
            "misc_feature" => Self::MiscFeature,
            "source" => Self::Source,
            "repeat_region" => Self::RepeatRegion,
            other => Self::Other(other.to_string()),
        }
    }
}

// Qualifiers start at column 22 in GenBank files; anything indented this far is
// never read as a feature key other than CDS.
const QUALIFIER_INDENT: usize = 21;

#[derive(Debug, PartialEq, Eq)]
enum Qualifier<'a> {
    Gene(&'a str),
    LocusTag(&'a str),
    Product(&'a str),
    Other,
}

#[derive(Debug, PartialEq, Eq)]
enum LineKind<'a> {
    Blank,
    Feature { key: FeatureKey, location: &'a str },
    SectionEnd,
    Qualifier(Qualifier<'a>),
    Text,
}

impl<'a> LineKind<'a> {
    fn classify(line: &'a str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Self::Blank;
        }
        if trimmed.starts_with('/') {
            return Self::Qualifier(Self::qualifier(trimmed));
        }
        let (token, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((token, rest)) => (token, rest.trim()),
            None => (trimmed, ""),
        };
        if token == "CDS" {
            return Self::Feature {
                key: FeatureKey::Cds,
                location: rest,
            };
        }
        let indent = line.len() - line.trim_start().len();
        if indent == 0 && (token == "ORIGIN" || token == "CONTIG" || token == "//") {
            return Self::SectionEnd;
        }
        if indent < QUALIFIER_INDENT && looks_like_location(rest) {
            return Self::Feature {
                key: FeatureKey::from_key(token),
                location: rest,
            };
        }
        Self::Text
    }

    fn qualifier(trimmed: &'a str) -> Qualifier<'a> {
        if let Some(value) = trimmed.strip_prefix("/gene=") {
            Qualifier::Gene(value)
        } else if let Some(value) = trimmed.strip_prefix("/locus_tag=") {
            Qualifier::LocusTag(value)
        } else if let Some(value) = trimmed.strip_prefix("/product=") {
            Qualifier::Product(value)
        } else {
            Qualifier::Other
        }
    }
}

fn looks_like_location(text: &str) -> bool {
    text.starts_with(|c: char| c.is_ascii_digit() || c == '<' || c == '>')
        || ["complement(", "join(", "order("]
            .iter()
            .any(|prefix| text.starts_with(prefix))
}

/// A location that still has open parentheses, or a trailing comma, continues
/// on the next line.
fn location_is_open(location: &str) -> bool {
    let opened = location.matches('(').count();
    let closed = location.matches(')').count();
    opened > closed || location.trim_end().ends_with(',')
}

/// Closes a location cut short by the next qualifier or the end of the block.
fn close_location(location: &str) -> String {
    let mut closed = location.trim_end().trim_end_matches(',').to_string();
    let missing = location
        .matches('(')
        .count()
        .saturating_sub(location.matches(')').count());
    closed.extend(std::iter::repeat_n(')', missing));
    closed
}

fn strip_quotes(value: &str) -> String {
    value.replace('"', "").trim().to_string()
}

/// In-progress CDS record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeatureAccumulator {
    name: Option<String>,
    function: Option<String>,
    product_buffer: Vec<String>,
    location: ParsedLocation,
}

impl FeatureAccumulator {
    fn new(location: ParsedLocation) -> Self {
        Self {
            name: None,
            function: None,
            product_buffer: vec![],
            location,
        }
    }

    fn has_name(&self) -> bool {
        self.name.as_deref().is_some_and(|name| !name.is_empty())
    }

    /// Returns true while a product value is still open.
    fn apply_qualifier(&mut self, qualifier: Qualifier, options: &ParseOptions) -> bool {
        match qualifier {
            Qualifier::Gene(value) => self.name = Some(strip_quotes(value)),
            Qualifier::LocusTag(value) if !self.has_name() => {
                self.name = Some(strip_quotes(value))
            }
            Qualifier::Product(value) => {
                let raw = value.trim();
                self.product_buffer.clear();
                self.push_product_piece(raw);
                let closed = if raw.starts_with('"') {
                    raw.len() > 1 && raw.ends_with('"')
                } else {
                    options.unquoted_product_is_complete || raw.ends_with('"')
                };
                if closed {
                    self.close_product();
                }
                return !closed;
            }
            Qualifier::LocusTag(_) | Qualifier::Other => {}
        }
        false
    }

    fn push_product_piece(&mut self, raw: &str) {
        let piece = strip_quotes(raw);
        if !piece.is_empty() {
            self.product_buffer.push(piece);
        }
    }

    /// Appends one continuation line; returns true once the closing quote is seen.
    fn continue_product(&mut self, trimmed: &str) -> bool {
        self.push_product_piece(trimmed);
        if trimmed.ends_with('"') {
            self.close_product();
            true
        } else {
            false
        }
    }

    fn close_product(&mut self) {
        self.function = Some(self.product_buffer.join(" "));
        self.product_buffer.clear();
    }

    fn into_gene(mut self, options: &ParseOptions) -> Option<Gene> {
        if !self.product_buffer.is_empty() {
            self.close_product();
        }
        let placeholder = || options.unknown_placeholder.clone();
        let name = self.name.filter(|name| !name.is_empty()).unwrap_or_else(placeholder);
        let function = self
            .function
            .filter(|function| !function.is_empty())
            .unwrap_or_else(placeholder);
        Gene::new(name, function, self.location.ranges, self.location.strand)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ParseState {
    #[default]
    OutsideFeature,
    /// A CDS location that wraps onto further lines.
    CollectingLocation(String),
    InFeature(FeatureAccumulator),
    CollectingQuotedValue(FeatureAccumulator),
}

impl ParseState {
    /// Consumes one line, returning the next state and the gene completed by
    /// this line, if any.
    pub fn step(self, line: &str, options: &ParseOptions) -> (ParseState, Option<Gene>) {
        let kind = LineKind::classify(line);
        match self {
            Self::OutsideFeature => match kind {
                LineKind::Feature {
                    key: FeatureKey::Cds,
                    location,
                } => (Self::open_cds(location), None),
                _ => (Self::OutsideFeature, None),
            },
            Self::CollectingLocation(mut location) => match kind {
                LineKind::Text => {
                    location.push_str(line.trim());
                    if location_is_open(&location) {
                        (Self::CollectingLocation(location), None)
                    } else {
                        (Self::start_feature(&location), None)
                    }
                }
                _ => Self::start_feature(&close_location(&location)).step(line, options),
            },
            Self::InFeature(mut acc) => match kind {
                LineKind::Blank => (Self::OutsideFeature, acc.into_gene(options)),
                LineKind::Feature {
                    key: FeatureKey::Cds,
                    location,
                } => (Self::open_cds(location), acc.into_gene(options)),
                LineKind::Feature { .. } | LineKind::SectionEnd
                    if options.close_on_foreign_feature =>
                {
                    (Self::OutsideFeature, acc.into_gene(options))
                }
                LineKind::Qualifier(qualifier) => {
                    if acc.apply_qualifier(qualifier, options) {
                        (Self::CollectingQuotedValue(acc), None)
                    } else {
                        (Self::InFeature(acc), None)
                    }
                }
                _ => (Self::InFeature(acc), None),
            },
            Self::CollectingQuotedValue(mut acc) => match kind {
                LineKind::Blank => (Self::OutsideFeature, acc.into_gene(options)),
                _ => {
                    if acc.continue_product(line.trim()) {
                        (Self::InFeature(acc), None)
                    } else {
                        (Self::CollectingQuotedValue(acc), None)
                    }
                }
            },
        }
    }

    /// Flushes whatever is pending at end of input.
    pub fn finish(self, options: &ParseOptions) -> Option<Gene> {
        match self {
            Self::OutsideFeature => None,
            Self::CollectingLocation(location) => {
                Self::start_feature(&close_location(&location)).finish(options)
            }
            Self::InFeature(acc) | Self::CollectingQuotedValue(acc) => acc.into_gene(options),
        }
    }

    pub fn is_outside_feature(&self) -> bool {
        matches!(self, Self::OutsideFeature)
    }

    fn open_cds(location: &str) -> Self {
        if location_is_open(location) {
            Self::CollectingLocation(location.to_string())
        } else {
            Self::start_feature(location)
        }
    }

    fn start_feature(location: &str) -> Self {
        let parsed = parse_location(location);
        if parsed.is_empty() {
            debug!(location, "skipping CDS without usable ranges");
            Self::OutsideFeature
        } else {
            Self::InFeature(FeatureAccumulator::new(parsed))
        }
    }
}
