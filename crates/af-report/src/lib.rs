//! af-report: merges normalized stage sub-reports into one report and
//! renders it into the section tree consumed by the page flow.

pub mod assemble;
pub mod sections;

pub use assemble::{Diagnostic, NormalizedReport, assemble};
pub use sections::build_sections;
