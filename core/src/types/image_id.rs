use std::fmt;

/// Per-frame image identifier
///
/// An opaque token encoding the protocol dialect, study/series/instance
/// coordinates and a frame number, e.g.
/// `wadors:http://host/dicomweb/studies/1.2/series/3.4/instances/5.6/frames/2`.
///
/// Two identifiers for the same instance but different frames are distinct;
/// their frameless forms (see [`crate::imageid::frame_info`]) are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageId(String);

impl ImageId {
    /// Creates an identifier from its string form
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the URI form: the identifier with its protocol prefix
    /// (everything up to and including the first `:`) removed
    ///
    /// Provider lookups are keyed by this form so that the same image
    /// resolves regardless of the loader prefix.
    pub fn to_uri(&self) -> String {
        match self.0.find(':') {
            Some(idx) => self.0[idx + 1..].to_string(),
            None => self.0.clone(),
        }
    }

    /// Consumes the identifier, returning the underlying string
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ImageId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ImageId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_uri_strips_protocol_prefix() {
        let id = ImageId::new("wadors:http://host/studies/1/series/2/instances/3/frames/1");
        assert_eq!(
            id.to_uri(),
            "http://host/studies/1/series/2/instances/3/frames/1"
        );
    }

    #[test]
    fn test_to_uri_without_prefix_is_identity() {
        let id = ImageId::new("no-protocol-here/frames/1");
        assert_eq!(id.to_uri(), "no-protocol-here/frames/1");
    }

    #[test]
    fn test_frame_number_distinguishes_identifiers() {
        let a = ImageId::new("wadors:http://host/instances/3/frames/1");
        let b = ImageId::new("wadors:http://host/instances/3/frames/2");
        assert_ne!(a, b);
    }
}
