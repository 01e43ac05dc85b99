//! af-layout: greedy page flow for printable reports.
//!
//! There is no layout engine underneath: block heights are estimated from
//! [`LayoutConfig`] and page breaks are computed by hand from a running
//! vertical cursor. Table splitting inside a page is left to the renderer;
//! this crate decides where every block starts.

pub mod config;
pub mod document;
pub mod flow;
pub mod section;

pub use config::{LayoutConfig, LayoutError};
pub use document::{Block, BlockKind, Document, Footer, Page};
pub use flow::{PageFlowEngine, layout};
pub use section::{Row, Section, Subsection, Table};
