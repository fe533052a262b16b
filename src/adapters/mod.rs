//! Adapters: concrete implementations of the hexagonal port traits
//! that are not hardware drivers.
//!
//! | Adapter    | Implements | Connects to         |
//! |------------|------------|---------------------|
//! | `log_sink` | EventSink  | `log` facade        |

pub mod log_sink;
