//! Core primitives for Trellis.
//!
//! This crate provides the two foundation pieces the widget engine is built
//! on:
//!
//! - **Signals**: Synchronous, ordered publish/subscribe notification
//! - **Properties**: Value cells with change detection
//!
//! Both primitives are deliberately synchronous. The widget system is
//! single-threaded and cooperative, so every emission and every change
//! notification runs to completion inside the caller's stack frame. There
//! is no queuing and no coalescing at this layer; deferred, coalesced
//! delivery is the job of the message queue in the `trellis` crate.
//!
//! # Signal Example
//!
//! ```
//! use trellis_core::Signal;
//!
//! // Create a signal that notifies when a value changes
//! let value_changed = Signal::<i32>::new();
//!
//! // Connect a slot to handle the signal
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! // Emit the signal
//! value_changed.emit(42);
//!
//! // Disconnect when done
//! value_changed.disconnect(conn_id);
//! ```
//!
//! # Property Example
//!
//! ```
//! use trellis_core::{Property, Signal};
//!
//! // A reactive counter with change notification
//! struct Counter {
//!     value: Property<i32>,
//!     value_changed: Signal<i32>,
//! }
//!
//! impl Counter {
//!     fn new() -> Self {
//!         Self {
//!             value: Property::new(0),
//!             value_changed: Signal::new(),
//!         }
//!     }
//!
//!     fn increment(&self) {
//!         let new_value = self.value.get() + 1;
//!         if self.value.set(new_value) {
//!             self.value_changed.emit(new_value);
//!         }
//!     }
//! }
//!
//! let counter = Counter::new();
//! counter.increment();
//! assert_eq!(counter.value.get(), 1);
//! ```

mod property;
mod signal;

pub use property::{Property, ReadOnlyProperty};
pub use signal::{ConnectionGuard, ConnectionId, Signal};
