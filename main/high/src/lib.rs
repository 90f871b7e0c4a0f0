//! This crate contains the example catalog of rx-gallery and the machinery for running it.
//!
//! # Example
//!
//! ```
//! use gallery_high::{ExampleRegistry, ExampleRunner};
//! use gallery_rx::VirtualTimeScheduler;
//! use std::rc::Rc;
//!
//! let mut runner = ExampleRunner::new(Rc::new(VirtualTimeScheduler::new()));
//! let example = ExampleRegistry::get().find_by_title("map").ok_or("not found")?;
//! runner.run(example);
//! assert_eq!(runner.lines()[0], "Started: map");
//! assert_eq!(runner.lines().last().map(String::as_str), Some("completion: finished"));
//! # Ok::<_, Box<dyn std::error::Error>>(())
//! ```

mod error;
pub use error::*;

mod log_util;
pub use log_util::*;

mod main_task_middleware;
pub use main_task_middleware::*;

mod run_loop_scheduler;
pub use run_loop_scheduler::*;

mod example;
pub use example::*;

pub mod recipes;

mod registry;
pub use registry::*;

mod log_buffer;
pub use log_buffer::*;

mod example_runner;
pub use example_runner::*;
