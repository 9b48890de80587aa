//! Fan-out of one prompt to every registered backend and fan-in of the
//! outcomes into a [`Batch`].

#[path = "dispatch/invocation.rs"]
mod invocation;

#[path = "dispatch/aggregate.rs"]
mod aggregate;

#[path = "dispatch/dispatcher.rs"]
mod dispatcher;

pub use aggregate::Batch;
pub use dispatcher::Dispatcher;
pub use invocation::{InvocationResult, INVALID_MODEL_NAME};
