//! Output formatting options for PEM blocks.

/// Line terminator used when writing PEM text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// How a [`Pem`](crate::Pem) block is laid out as text.
///
/// The default follows RFC 7468: base64 wrapped at 64 columns and every
/// line, the footer included, terminated by `\n`.
///
/// ```
/// use pem::{LineEnding, PemFormat};
///
/// let format = PemFormat::default()
///     .with_line_width(76)
///     .with_line_ending(LineEnding::CrLf);
/// assert_eq!(format.line_width(), 76);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PemFormat {
    line_width: usize,
    line_ending: LineEnding,
}

pub const DEFAULT_LINE_WIDTH: usize = 64;

impl Default for PemFormat {
    fn default() -> Self {
        PemFormat {
            line_width: DEFAULT_LINE_WIDTH,
            line_ending: LineEnding::Lf,
        }
    }
}

impl PemFormat {
    /// Sets the base64 line width. Widths below 1 are raised to 1.
    pub fn with_line_width(mut self, width: usize) -> Self {
        self.line_width = width.max(1);
        self
    }

    pub fn with_line_ending(mut self, ending: LineEnding) -> Self {
        self.line_ending = ending;
        self
    }

    pub fn line_width(&self) -> usize {
        self.line_width
    }

    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }
}
