//! NDN names: a sequence of opaque byte-string components.

use std::fmt;

/// A single name component. Opaque bytes; the core never interprets them.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NameComponent(pub Vec<u8>);

impl NameComponent {
    /// Build a component from a UTF-8 string, as produced by splitting a URI.
    pub fn from_str(s: &str) -> Self {
        NameComponent(s.as_bytes().to_vec())
    }
}

impl fmt::Display for NameComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match std::str::from_utf8(&self.0) {
            Ok(s) => f.write_str(s),
            Err(_) => {
                for b in &self.0 {
                    write!(f, "%{:02X}", b)?;
                }
                Ok(())
            }
        }
    }
}

/// An NDN name: an ordered sequence of components, e.g. `/throughput/a`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct Name(pub Vec<NameComponent>);

impl Name {
    /// The empty name `/`. Used for the queue's shutdown sentinel.
    pub fn empty() -> Self {
        Name(Vec::new())
    }

    /// Parse a `/`-delimited URI into a `Name`. Leading/trailing slashes are
    /// ignored; empty components are not produced.
    pub fn from_uri(uri: &str) -> Self {
        let components = uri
            .split('/')
            .filter(|s| !s.is_empty())
            .map(NameComponent::from_str)
            .collect();
        Name(components)
    }

    /// Append a component, returning the extended name.
    pub fn append(&self, component: NameComponent) -> Self {
        let mut components = self.0.clone();
        components.push(component);
        Name(components)
    }

    /// Whether `self` is a prefix of (or equal to) `other`.
    pub fn is_prefix_of(&self, other: &Name) -> bool {
        self.0.len() <= other.0.len() && self.0.iter().zip(other.0.iter()).all(|(a, b)| a == b)
    }

    /// A copy of this name with its last component removed, used to derive a
    /// KeyLocator name from a certificate name. Returns the empty name if
    /// `self` is already empty.
    pub fn strip_last_component(&self) -> Name {
        if self.0.is_empty() {
            Name::empty()
        } else {
            Name(self.0[..self.0.len() - 1].to_vec())
        }
    }

    /// Whether this name has no components, used to recognise the shutdown
    /// sentinel queue entry.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for component in &self.0 {
            write!(f, "/{}", component)?;
        }
        Ok(())
    }
}
