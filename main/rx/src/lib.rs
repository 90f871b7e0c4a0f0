//! Minimal single-threaded reactive streams.
//!
//! Everything here is `Rc`-based and meant to be used from one thread (typically the UI thread).
//! Delayed work goes through a [`Scheduler`], which makes it possible to drive time-based
//! operators such as [`debounce`](Observable::debounce) with a [`VirtualTimeScheduler`] in tests.
//!
//! # Example
//!
//! ```
//! use gallery_rx::{from_iter, Observable};
//!
//! let handle = from_iter([1, 2, 3, 4])
//!     .filter(|x| x % 2 == 0)
//!     .map(|x| x * 10)
//!     .sink(|x| println!("value: {x}"));
//! assert!(handle.is_cancelled());
//! ```
mod subscription;
pub use subscription::*;

mod observer;
pub use observer::*;

mod observable;
pub use observable::*;

mod sources;
pub use sources::*;

mod subject;
pub use subject::*;

mod scheduling;
pub use scheduling::*;

mod map;
pub use map::*;

mod filter;
pub use filter::*;

mod merge;
pub use merge::*;

mod combine_latest;
pub use combine_latest::*;

mod debounce;
pub use debounce::*;
