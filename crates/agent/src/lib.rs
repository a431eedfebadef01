//! Action runtime for the appointment assistant.
//!
//! The dialogue engine recognizes intents and fills slots on its own. When it decides
//! to run a custom action it calls into this crate by action name:
//!
//! 1. **Slots** (`slots`) - read-only view of the conversation slots
//! 2. **Actions** (`actions`) - reserve, cancel, and list appointments
//! 3. **Replies** (`replies`) - the exact user-facing texts
//! 4. **Dispatch** (`dispatch`) - collects outbound messages for the host
//!
//! # Key Types
//!
//! - `ActionRuntime` - routes an action name to its handler (see `runtime` module)
//! - `Action` - trait implemented by every custom action
//! - `SlotStore` / `MessageSink` - the two seams a host adapts to its engine
//!
//! All appointment actions share one `AppointmentRegistry` from `citabot-core`,
//! injected when the runtime is built.

pub mod actions;
pub mod dispatch;
pub mod replies;
pub mod runtime;
pub mod slots;

pub use actions::{Action, ActionRegistry, ACTION_CANCEL, ACTION_LIST, ACTION_RESERVE};
pub use dispatch::{CollectingDispatcher, MessageSink, OutboundMessage};
pub use runtime::{new_correlation_id, ActionResponse, ActionRuntime};
pub use slots::{SlotSnapshot, SlotStore};
