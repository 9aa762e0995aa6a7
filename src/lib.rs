//! # rxcombine: stream combinators over a push-based publisher core
//!
//! A small, single-threaded reactive core: publishers push values to
//! observers, followed by at most one terminal [`Completion`], and every
//! subscription can be cancelled synchronously.
//!
//! ## Quick Start
//!
//! ```rust
//! use rxcombine::prelude::*;
//!
//! let mut values = vec![];
//! publisher::from_iter([3, 4, 5])
//!   .prepend_iter([1, 2])
//!   .append_iter([6])
//!   .subscribe(|v| values.push(v));
//!
//! assert_eq!(values, [1, 2, 3, 4, 5, 6]);
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Publisher`] | A source of values, subscribed with an [`Observer`] |
//! | [`Observer`] | Consumes `next`, `error`, and `complete` events |
//! | [`LocalSubject`] | Hot multicast source pushed by hand |
//! | [`LocalSubscription`] | Handle to cancel an active subscription |
//!
//! ## Feature Flags
//!
//! - **`futures-source`** (default): publishers driven by a `Future` or a
//!   one-shot channel, spawned on a `futures` local executor.
//!
//! [`Completion`]: observer::Completion
//! [`Publisher`]: publisher::Publisher
//! [`Observer`]: observer::Observer
//! [`LocalSubject`]: subject::LocalSubject
//! [`LocalSubscription`]: subscription::LocalSubscription

pub mod error;
pub mod observer;
pub mod ops;
pub mod prelude;
pub mod publisher;
pub mod rc;
pub mod subject;
pub mod subscriber;
pub mod subscription;

pub use prelude::*;

#[cfg(doctest)]
mod __markdown_doctests {
  mod readme {
    #![doc = include_str!("../README.md")]
  }
}
