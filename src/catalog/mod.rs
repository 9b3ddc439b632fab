//! Skill catalog: the read-only tree of tabs, skill groups and skills.
//!
//! The catalog is YAML. A built-in copy is compiled into the binary and
//! can be replaced by a file named in config or on the command line.

pub mod model;
pub mod parser;

pub use model::{Catalog, CatalogEntry, Rubric, Skill, SkillDetail, SkillGroup, Tab, TabKind};
