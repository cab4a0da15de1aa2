//! Dotted qualified names for modules, packages and source units.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use smol_str::SmolStr;
use thiserror::Error;

/// Error produced when a dotted name cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("empty segment in qualified name '{0}'")]
    EmptySegment(String),
}

/// Whether `s` is a Java identifier: `XID_Start`, `_` or `$`, followed by
/// `XID_Continue` or `$`.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first == '_' || first == '$' || unicode_ident::is_xid_start(first) => {}
        _ => return false,
    }
    chars.all(|c| c == '$' || unicode_ident::is_xid_continue(c))
}

/// An immutable, possibly empty, sequence of identifier segments.
///
/// The empty name identifies both the unnamed module and the default package.
/// Cloning is cheap: segments are shared behind an `Arc`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct QualifiedName {
    segments: Arc<[SmolStr]>,
}

impl QualifiedName {
    /// The empty name.
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a name from already-split segments.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a dotted name such as `java.util.List`.
    ///
    /// The empty string parses to the empty name.
    pub fn parse(dotted: &str) -> Result<Self, NameError> {
        if dotted.is_empty() {
            return Ok(Self::root());
        }
        let mut segments = Vec::new();
        for part in dotted.split('.') {
            if part.is_empty() {
                return Err(NameError::EmptySegment(dotted.to_string()));
            }
            segments.push(SmolStr::new(part));
        }
        Ok(Self::from_segments(segments))
    }

    /// Append one segment, producing the name one level deeper.
    pub fn child(&self, segment: impl Into<SmolStr>) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend(self.segments.iter().cloned());
        segments.push(segment.into());
        Self::from_segments(segments)
    }

    /// The name with its last segment removed, or `None` for the empty name.
    pub fn parent(&self) -> Option<Self> {
        let (_, init) = self.segments.split_last()?;
        Some(Self::from_segments(init.iter().cloned()))
    }

    /// The last segment.
    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(SmolStr::as_str)
    }

    pub fn segments(&self) -> &[SmolStr] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Whether `self` is `prefix` followed by zero or more segments.
    pub fn starts_with(&self, prefix: &QualifiedName) -> bool {
        self.segments.starts_with(&prefix.segments)
    }

    /// Strip `prefix`, returning the remaining relative name.
    pub fn strip_prefix(&self, prefix: &QualifiedName) -> Option<QualifiedName> {
        if !self.starts_with(prefix) {
            return None;
        }
        Some(Self::from_segments(
            self.segments[prefix.len()..].iter().cloned(),
        ))
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

impl fmt::Debug for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_str("QualifiedName(<root>)")
        } else {
            write!(f, "QualifiedName({})", self)
        }
    }
}

impl FromStr for QualifiedName {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for QualifiedName {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for QualifiedName {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
