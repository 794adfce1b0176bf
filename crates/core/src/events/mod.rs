//! Entity change events.
//!
//! Provides the change record and the sink trait through which mutation code
//! reports successful changes. The propagation driver in [`crate::sync`] is a
//! sink; adapters may provide their own.

mod entity_change;
mod sink;

pub use entity_change::*;
pub use sink::*;
