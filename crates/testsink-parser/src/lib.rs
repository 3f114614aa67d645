//! Field extraction from test-station XML reports.
//!
//! The station emits loosely structured report documents built from nested
//! `Prop` elements carrying a `Name` attribute and a `Value` child. Nothing
//! about the tree shape is guaranteed beyond those local conventions, so
//! every extractor here searches by `(tag, Name)` and falls back to the
//! `"No data"` sentinel rather than rejecting the document.

mod error;
mod extract;

pub use error::{ParseError, ParseResult};
pub use extract::{
    call_test_primitive_steps, end_date, end_time, parse_report, prop_text, start_date,
    start_time, uut_result,
};
