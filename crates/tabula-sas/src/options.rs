//! Reader options

/// How to treat the word-size and endianness hints in the file header.
///
/// Only the little-endian, 32-bit layout is decoded. The hints are read from
/// the header either way; the policy decides whether a file that claims a
/// different layout is rejected or read as if it were little-endian 32-bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutPolicy {
    /// Fail with `UnsupportedVariant` on a 64-bit or big-endian hint
    #[default]
    Strict,
    /// Log the hints and decode with the little-endian 32-bit layout anyway
    AssumeLittleEndian32,
}

/// Options for reading SAS7BDAT files
#[derive(Debug, Clone, Default)]
pub struct SasReadOptions {
    /// Handling of layout hints (default: strict)
    pub layout: LayoutPolicy,
}

impl SasReadOptions {
    /// Set the layout policy
    pub fn with_layout(mut self, layout: LayoutPolicy) -> Self {
        self.layout = layout;
        self
    }
}
