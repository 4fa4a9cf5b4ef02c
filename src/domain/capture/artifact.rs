//! Encoded artifact value object

use super::format::MediaFormat;

/// The finalized output of one capture session.
///
/// Built exactly once, at the Capturing -> Stopped transition, by
/// concatenating every buffered fragment in arrival order. Immutable
/// after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedArtifact {
    data: Vec<u8>,
    format: MediaFormat,
}

impl EncodedArtifact {
    /// Concatenate fragments in arrival order into one artifact
    pub fn from_fragments<I>(fragments: I, format: MediaFormat) -> Self
    where
        I: IntoIterator<Item = Vec<u8>>,
    {
        let mut data = Vec::new();
        for fragment in fragments {
            data.extend_from_slice(&fragment);
        }
        Self { data, format }
    }

    /// Get the encoded bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume and return the encoded bytes
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Negotiated format this artifact was encoded with
    pub fn format(&self) -> MediaFormat {
        self.format
    }

    /// Get the size in bytes
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Whether any bytes were captured at all
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get human-readable size
    pub fn human_readable_size(&self) -> String {
        let bytes = self.size_bytes();
        if bytes < 1024 {
            format!("{} B", bytes)
        } else if bytes < 1024 * 1024 {
            format!("{:.1} KB", bytes as f64 / 1024.0)
        } else {
            format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concatenates_fragments_in_order() {
        let fragments = vec![vec![1u8, 2], vec![3u8], vec![4u8, 5, 6]];
        let artifact = EncodedArtifact::from_fragments(fragments, MediaFormat::OggOpus);

        assert_eq!(artifact.data(), &[1, 2, 3, 4, 5, 6]);
        assert_eq!(artifact.size_bytes(), 6);
        assert_eq!(artifact.format(), MediaFormat::OggOpus);
    }

    #[test]
    fn size_equals_sum_of_fragment_lengths() {
        let fragments = vec![vec![0u8; 100], vec![0u8; 250], vec![0u8; 7]];
        let total: usize = fragments.iter().map(Vec::len).sum();
        let artifact = EncodedArtifact::from_fragments(fragments, MediaFormat::WebmOpus);

        assert_eq!(artifact.size_bytes(), total);
        assert!(!artifact.is_empty());
    }

    #[test]
    fn no_fragments_yields_empty_artifact() {
        let artifact = EncodedArtifact::from_fragments(Vec::new(), MediaFormat::OggOpus);
        assert!(artifact.is_empty());
    }

    #[test]
    fn human_readable_size_bytes() {
        let artifact = EncodedArtifact::from_fragments(vec![vec![0u8; 500]], MediaFormat::OggOpus);
        assert_eq!(artifact.human_readable_size(), "500 B");
    }

    #[test]
    fn human_readable_size_kb() {
        let artifact = EncodedArtifact::from_fragments(vec![vec![0u8; 2048]], MediaFormat::OggOpus);
        assert_eq!(artifact.human_readable_size(), "2.0 KB");
    }
}
