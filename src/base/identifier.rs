//! Canonical hierarchical addresses for code entities.
//!
//! An [`Identifier`] is an optional namespace prefix followed by an ordered
//! list of [`Segment`]s, each a `(qualifier, fragment)` pair. The canonical
//! textual form is
//!
//! ```text
//! <prefix>#<qualifier1>:<fragment1>.<fragment2>.<qualifier2>:<fragment3>
//! ```
//!
//! A segment written without `qualifier:` inherits the qualifier of the
//! segment before it, so `package:java.lang.type:String` is three segments:
//! `(package, java)`, `(package, lang)`, `(type, String)`. The serializer
//! writes a qualifier on the first segment and whenever it changes, which
//! makes the text form deterministic and exactly invertible.

use std::fmt::{self, Write as _};
use std::ops::Range;
use std::str::FromStr;
use std::sync::Arc;

use smol_str::SmolStr;
use thiserror::Error;

/// Separates the namespace prefix from the segment list.
pub const PREFIX_SEPARATOR: char = '#';
/// Separates consecutive segments.
pub const PATH_SEPARATOR: char = '.';
/// Separates a qualifier from its fragment.
pub const QUALIFIER_SEPARATOR: char = ':';

const RESERVED: [char; 3] = [PREFIX_SEPARATOR, PATH_SEPARATOR, QUALIFIER_SEPARATOR];

// ============================================================================
// ERRORS
// ============================================================================

/// Rejected identifier data. Malformed values never reach the graph.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum IdentifierError {
    #[error("{part} '{value}' contains reserved separator '{separator}'")]
    ReservedSeparator {
        part: &'static str,
        value: SmolStr,
        separator: char,
    },

    #[error("qualifier must not be empty")]
    EmptyQualifier,

    #[error("segment '{segment}' has no qualifier and no previous segment to inherit one from")]
    MissingQualifier { segment: SmolStr },
}

fn check_reserved(
    part: &'static str,
    value: &str,
    reserved: &[char],
) -> Result<(), IdentifierError> {
    match value.chars().find(|c| reserved.contains(c)) {
        Some(separator) => Err(IdentifierError::ReservedSeparator {
            part,
            value: SmolStr::new(value),
            separator,
        }),
        None => Ok(()),
    }
}

// ============================================================================
// SEGMENT
// ============================================================================

/// One named step of an identifier: a fragment tagged by the qualifier that
/// classifies it (`package`, `type`, `method`, ...).
///
/// The fragment may be empty, which denotes an anonymous segment.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Segment {
    qualifier: SmolStr,
    fragment: SmolStr,
}

impl Segment {
    /// Create a segment, validating both parts.
    pub fn new(qualifier: &str, fragment: &str) -> Result<Self, IdentifierError> {
        if qualifier.is_empty() {
            return Err(IdentifierError::EmptyQualifier);
        }
        check_reserved("qualifier", qualifier, &RESERVED)?;
        check_reserved("fragment", fragment, &RESERVED)?;
        Ok(Self {
            qualifier: SmolStr::new(qualifier),
            fragment: SmolStr::new(fragment),
        })
    }

    /// The classifying tag.
    pub fn qualifier(&self) -> &str {
        &self.qualifier
    }

    /// The name of this step.
    pub fn fragment(&self) -> &str {
        &self.fragment
    }
}

impl fmt::Debug for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.qualifier, self.fragment)
    }
}

// ============================================================================
// IDENTIFIER
// ============================================================================

/// Canonical address of a named code entity.
///
/// Identifiers are immutable values; deriving a new address (a child, a
/// parent, a sub-range) never touches the source. Segments live behind an
/// `Arc` so clones are cheap enough to use as graph keys.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier {
    prefix: Option<SmolStr>,
    segments: Arc<[Segment]>,
}

impl Identifier {
    /// An identifier with the given prefix and no segments.
    ///
    /// This is the default root every ingestion session attaches to.
    pub fn root(prefix: Option<&str>) -> Result<Self, IdentifierError> {
        Ok(IdentifierBuilder::new(prefix)?.build())
    }

    /// Start building an identifier under `prefix`.
    pub fn builder(prefix: Option<&str>) -> Result<IdentifierBuilder, IdentifierError> {
        IdentifierBuilder::new(prefix)
    }

    /// Parse the canonical textual form.
    pub fn parse(text: &str) -> Result<Self, IdentifierError> {
        let (prefix, body) = match text.split_once(PREFIX_SEPARATOR) {
            Some((prefix, body)) => (Some(prefix), body),
            None => (None, text),
        };

        let mut builder = IdentifierBuilder::new(prefix)?;
        if body.is_empty() {
            return Ok(builder.build());
        }

        let mut inherited: Option<SmolStr> = None;
        for piece in body.split(PATH_SEPARATOR) {
            let (qualifier, fragment) = match piece.split_once(QUALIFIER_SEPARATOR) {
                Some((qualifier, fragment)) => (SmolStr::new(qualifier), fragment),
                None => match &inherited {
                    Some(qualifier) => (qualifier.clone(), piece),
                    None => {
                        return Err(IdentifierError::MissingQualifier {
                            segment: SmolStr::new(piece),
                        });
                    }
                },
            };
            builder.push(&qualifier, fragment)?;
            inherited = Some(qualifier);
        }

        Ok(builder.build())
    }

    /// The namespace prefix, if any.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// All segments in order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// True when the identifier has no segments (a bare root).
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// A new identifier with one more segment.
    pub fn child(&self, qualifier: &str, fragment: &str) -> Result<Self, IdentifierError> {
        let mut builder = IdentifierBuilder::from(self);
        builder.push(qualifier, fragment)?;
        Ok(builder.build())
    }

    /// Drop the last segment. `None` for a bare root.
    pub fn parent(&self) -> Option<Self> {
        if self.segments.is_empty() {
            return None;
        }
        self.sub(0..self.segments.len() - 1)
    }

    /// The last segment alone.
    pub fn tail(&self) -> Option<&Segment> {
        self.segments.last()
    }

    /// The first segment alone.
    pub fn head(&self) -> Option<&Segment> {
        self.segments.first()
    }

    /// A contiguous range of segments, keeping the prefix.
    pub fn sub(&self, range: Range<usize>) -> Option<Self> {
        let segments = self.segments.get(range)?;
        Some(Self {
            prefix: self.prefix.clone(),
            segments: Arc::from(segments),
        })
    }

    /// The qualifier of the last segment.
    pub fn strongest_qualifier(&self) -> Option<&str> {
        self.tail().map(Segment::qualifier)
    }

    /// First segment tagged with `qualifier`.
    pub fn first_with_qualifier(&self, qualifier: &str) -> Option<&Segment> {
        self.segments.iter().find(|s| s.qualifier() == qualifier)
    }

    /// Last segment tagged with `qualifier`.
    pub fn last_with_qualifier(&self, qualifier: &str) -> Option<&Segment> {
        self.segments.iter().rev().find(|s| s.qualifier() == qualifier)
    }

    /// True if `self` equals `ancestor` or lies underneath it.
    pub fn is_within(&self, ancestor: &Identifier) -> bool {
        self.prefix == ancestor.prefix && self.segments.starts_with(&ancestor.segments)
    }

    /// Fragments joined with `.`, e.g. `java.lang.String` for a type.
    pub fn dotted_path(&self) -> String {
        self.dotted_path_of(|_| true)
    }

    /// Fragments of the segments accepted by `keep`, joined with `.`.
    pub fn dotted_path_of(&self, keep: impl Fn(&Segment) -> bool) -> String {
        let mut out = String::new();
        for segment in self.segments.iter().filter(|s| keep(s)) {
            if !out.is_empty() {
                out.push(PATH_SEPARATOR);
            }
            out.push_str(segment.fragment());
        }
        out
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(prefix) = &self.prefix {
            f.write_str(prefix)?;
            f.write_char(PREFIX_SEPARATOR)?;
        }
        let mut previous: Option<&str> = None;
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_char(PATH_SEPARATOR)?;
            }
            if previous != Some(segment.qualifier()) {
                f.write_str(segment.qualifier())?;
                f.write_char(QUALIFIER_SEPARATOR)?;
            }
            f.write_str(segment.fragment())?;
            previous = Some(segment.qualifier());
        }
        Ok(())
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identifier({self})")
    }
}

impl FromStr for Identifier {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(feature = "interchange")]
impl serde::Serialize for Identifier {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "interchange")]
impl<'de> serde::Deserialize<'de> for Identifier {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Identifier::parse(&text).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Mutable builder for identifiers.
///
/// Scope unwinding uses [`pop`](Self::pop); branching a new address from a
/// shared prefix starts from `IdentifierBuilder::from(&existing)`.
#[derive(Clone, Debug, Default)]
pub struct IdentifierBuilder {
    prefix: Option<SmolStr>,
    segments: Vec<Segment>,
}

impl IdentifierBuilder {
    /// Create an empty builder. The prefix must not contain `#`.
    pub fn new(prefix: Option<&str>) -> Result<Self, IdentifierError> {
        if let Some(prefix) = prefix {
            check_reserved("prefix", prefix, &[PREFIX_SEPARATOR])?;
        }
        Ok(Self {
            prefix: prefix.map(SmolStr::new),
            segments: Vec::new(),
        })
    }

    /// Append a segment.
    pub fn push(&mut self, qualifier: &str, fragment: &str) -> Result<&mut Self, IdentifierError> {
        self.segments.push(Segment::new(qualifier, fragment)?);
        Ok(self)
    }

    /// Append every `.`-separated element of `path` under one qualifier.
    pub fn push_path(&mut self, qualifier: &str, path: &str) -> Result<&mut Self, IdentifierError> {
        for fragment in path.split(PATH_SEPARATOR) {
            self.push(qualifier, fragment)?;
        }
        Ok(self)
    }

    /// Remove and return the last segment.
    pub fn pop(&mut self) -> Option<Segment> {
        self.segments.pop()
    }

    /// Number of segments pushed so far.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// True when no segment has been pushed.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Snapshot the current state as an identifier. The builder stays usable.
    pub fn build(&self) -> Identifier {
        Identifier {
            prefix: self.prefix.clone(),
            segments: Arc::from(self.segments.as_slice()),
        }
    }
}

impl From<&Identifier> for IdentifierBuilder {
    fn from(id: &Identifier) -> Self {
        Self {
            prefix: id.prefix.clone(),
            segments: id.segments.to_vec(),
        }
    }
}
