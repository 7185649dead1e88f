mod queue;
mod timers;

pub use queue::CallbackQueue;
pub use timers::{TimerEntry, Timers};
