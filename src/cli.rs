use clap::ValueEnum;

/// Behavior when the target file already exists.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClobberMode {
    /// Save under a numbered variant of the name.
    Rename,
    /// Replace the existing file.
    Overwrite,
    /// Keep the existing file and do not download.
    Skip,
}
