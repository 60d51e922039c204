//! Literal phrases of ffmpeg's diagnostic output that the extractors anchor on.
//!
//! Phrasing drifts between ffmpeg releases; keep every literal here.

/// Precedes the media duration in the input header
pub const DURATION: &str = "Duration:";

/// Opens a block of `key : value` tag lines
pub const METADATA: &str = "Metadata:";

/// Opens a block of per-stream side data (display matrix and friends)
pub const SIDE_DATA: &str = "Side data:";

/// Starts every stream header line
pub const STREAM: &str = "Stream";

/// Partial phrase printed after the input section when no output is requested
pub const AT_LEAST_ONE_OUTPUT: &str = "At least one output file";

/// Last line printed when ffmpeg runs without an output file; not a real failure
pub const NO_OUTPUT_FILE_SPECIFIED: &str = "At least one output file must be specified";
