//! Shared data structures for CBL/CCL analysis
//!
//! - `sample`: depth samples and the loaded well log
//! - `quality`: cement quality labels, perforation intervals, verdicts
//! - `toc`: top-of-cement assessment
//! - `collar`: collars, sentinel anomalies, cut proposals
//! - `warning`: non-fatal analysis findings

mod sample;
mod quality;
mod toc;
mod collar;
mod warning;

pub use sample::*;
pub use quality::*;
pub use toc::*;
pub use collar::*;
pub use warning::*;
