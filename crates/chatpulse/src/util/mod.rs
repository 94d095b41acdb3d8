//! Assorted utility functions (missing batteries).
mod chrono_ext;
mod std_ext;

pub(crate) mod encoding;

pub(crate) mod prelude {
    pub(crate) use super::chrono_ext::DateTimeExt as _;
    pub(crate) use super::std_ext::prelude::*;
}

pub(crate) type DynError = dyn std::error::Error + Send + Sync;
