/// Plain text block type (marker struct).
///
/// Plain blocks have no delimiters. The scanner materializes every run of
/// input that no other block claims as a plain leaf, and renders it verbatim.
pub struct Plain;

impl Plain {
    /// Name carried by every plain block.
    pub const NAME: &'static str = "plain";
}
