//! Prelude module for convenient imports
//!
//! This module re-exports commonly used types and traits for easy access.

pub use crate::{
  error::SourceError,
  observer::{BoxedObserver, Completion, DynObserver, Observer},
  ops::{Append, Prepend, SwitchToLatest},
  publisher::{self, *},
  rc::{MutRc, RcDeref, RcDerefMut},
  subject::LocalSubject,
  subscriber::Subscriber,
  subscription::*,
};
