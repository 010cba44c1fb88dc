//! The `evarsize_core` crate provides the sizing engine behind the EVAR
//! planning UI: given anatomical measurements it selects a compatible main
//! body and searches single- and double-branch iliac extension strategies
//! over a static device catalog.
//!
//! Key components:
//! - **Catalog**: the immutable device lists (`MainBody`, `Branch`) plus a
//!   startup integrity check.
//! - **Selection**: `select_main_body` and `find_branch_options`, the pure
//!   tolerance-band and combinatorial search functions.
//! - **Plan**: bilateral composition of one main body and one branch search
//!   per iliac side, with oversizing warnings.

pub mod catalog;
pub mod plan;
pub mod selection;
