// Copyright 2017 Brian Langenberger
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::io;

/// The ways a bitstream or byte accessor operation can fail.
///
/// A failure never leaves a cursor partially advanced.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Not enough bits or bytes remain at the requested position
    #[error("not enough data remaining")]
    InsufficientData,

    /// A width, offset or value the operation cannot represent
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The backing stream failed to seek, read or write
    #[error("backing stream failure: {0}")]
    Io(io::Error),
}

impl From<io::Error> for Error {
    #[inline]
    fn from(error: io::Error) -> Self {
        Error::Io(error)
    }
}
