//! Re-export statements.
//!
//! Local exports (`export class A`, `export { a }`) are flags on the declarations
//! themselves. Only statements that forward another module or assign the module
//! value end up here.

use serde::{Deserialize, Serialize};

use super::imports::SymbolSpecifier;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Export {
    /// `export * from 'lib'`
    All {
        library: String,
        start: usize,
        end: usize,
    },
    /// `export * as alias from 'lib'`
    AllAs {
        library: String,
        alias: String,
        start: usize,
        end: usize,
    },
    /// `export { a, b as c } from 'lib'`
    Named {
        library: String,
        specifiers: Vec<SymbolSpecifier>,
        start: usize,
        end: usize,
    },
    /// `export = name`
    Assigned { name: String, start: usize, end: usize },
}

impl Export {
    /// Library the export forwards, if any
    pub fn library(&self) -> Option<&str> {
        match self {
            Export::All { library, .. }
            | Export::AllAs { library, .. }
            | Export::Named { library, .. } => Some(library),
            Export::Assigned { .. } => None,
        }
    }

    pub fn range(&self) -> (usize, usize) {
        match self {
            Export::All { start, end, .. }
            | Export::AllAs { start, end, .. }
            | Export::Named { start, end, .. }
            | Export::Assigned { start, end, .. } => (*start, *end),
        }
    }
}
