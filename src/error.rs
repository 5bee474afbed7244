//! Recoverable errors.
//!
//! Most failure modes in this crate are precondition violations (fatal,
//! via `panic!`/`assert!`) or silent no-ops on optional growth, per the
//! error handling design. The one genuinely recoverable surface is the
//! `try_*` growth family on [`crate::Vector`] and [`crate::HashTable`],
//! which probes allocation before committing to it.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("allocation failed while growing to {requested} elements")]
    AllocationFailed { requested: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
