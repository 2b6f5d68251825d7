//! Output generation.
//!
//! # Submodules
//!
//! - [`atom`]: Reads and writes the Atom feed file that carries the news
//!   timeline from one run to the next
//!
//! # Output Structure
//!
//! ```text
//! ./
//! └── P2PEmpire.xml   # rewritten in full on every successful run
//! ```

pub mod atom;
