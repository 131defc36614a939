//! Input adapters for the CLI
//!
//! The engine never reads files itself; these helpers turn files into the
//! plain records it takes.

pub mod csv;

pub use self::csv::SeriesCsvImporter;
