// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Errors of the public surface and the per-thread last-error slot.

use crate::dds::DdsError;
use crate::dynamic::DataError;
use crate::marshal::MarshalError;
use crate::rmw::type_support::TypeCodeError;
use std::cell::RefCell;
use thiserror::Error;

/// Errors emitted by the rmw operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("null handle in {0}")]
    NullHandle(&'static str),
    #[error("{what} was created by implementation '{found}', expected '{expected}'")]
    WrongImplementation {
        what: &'static str,
        expected: &'static str,
        found: String,
    },
    #[error(transparent)]
    Marshal(#[from] MarshalError),
    #[error("failed to attach {what} to waitset: {source}")]
    Attach {
        what: &'static str,
        #[source]
        source: DdsError,
    },
    #[error("wait failed: {0}")]
    Wait(#[source] DdsError),
    #[error("registration failed: {0}")]
    Registration(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error(transparent)]
    Data(#[from] DataError),
    #[error(transparent)]
    Dds(#[from] DdsError),
}

impl From<TypeCodeError> for Error {
    fn from(err: TypeCodeError) -> Self {
        Error::Registration(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// A refused destroy. The handle goes back to the caller untouched.
#[derive(Debug)]
pub struct DestroyError<T> {
    pub error: Error,
    handle: T,
}

impl<T> DestroyError<T> {
    pub(crate) fn new(error: Error, handle: T) -> Self {
        Self { error, handle }
    }

    /// Take back the handle that was not destroyed.
    pub fn into_inner(self) -> T {
        self.handle
    }
}

impl<T> std::fmt::Display for DestroyError<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "destroy refused: {}", self.error)
    }
}

impl<T: std::fmt::Debug> std::error::Error for DestroyError<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

thread_local! {
    static LAST_ERROR: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Store the error text in this thread's last-error slot and hand the error
/// back unchanged.
pub(crate) fn record(err: Error) -> Error {
    log::debug!("[rmw] error: {}", err);
    let text = err.to_string();
    LAST_ERROR.with(|slot| *slot.borrow_mut() = Some(text));
    err
}

/// Text of the last error recorded on this thread.
pub fn last_error() -> Option<String> {
    LAST_ERROR.with(|slot| slot.borrow().clone())
}

pub fn reset_error() {
    LAST_ERROR.with(|slot| *slot.borrow_mut() = None);
}
