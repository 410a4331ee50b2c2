//! Library side of the sales dashboard CLI: logging setup and the
//! dashboard session pipeline.

#![allow(missing_docs)]

pub mod logging;
pub mod pipeline;
