//! The two conversion pipelines.
//!
//! Both are single synchronous passes: any error aborts the run, and
//! intermediate files are left in place for inspection.

pub mod geotiff;
pub mod mbtiles;

pub use geotiff::{run_adcirc2geotiff, GeotiffOutputs, GeotiffPipeline};
pub use mbtiles::{run_geotiff2mbtiles, MbtilesPipeline};

/// Result of a run that did not fail
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Completed(T),
    /// Nothing to do; the reason is logged and the program exits successfully
    Skipped(String),
}

impl<T> Outcome<T> {
    pub fn is_skipped(&self) -> bool {
        matches!(self, Outcome::Skipped(_))
    }

    pub fn completed(self) -> Option<T> {
        match self {
            Outcome::Completed(value) => Some(value),
            Outcome::Skipped(_) => None,
        }
    }
}
