//! Page structure analysis
//!
//! Generic DOM inspection producing a structural snapshot of any loaded
//! page, independent of business meaning. Reused for live extraction,
//! navigation planning, and the `inspect` command's portal documentation.

pub mod analyzer;
pub mod structure;

pub use analyzer::{analyze, to_markdown, STRUCTURE_SCRIPT};
pub use structure::{
    ButtonStructure, FieldStructure, FormStructure, LabeledValue, LinkStructure,
    MenuItemStructure, PageStructure, TableStructure,
};
