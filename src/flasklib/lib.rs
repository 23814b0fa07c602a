mod bqueue;
mod bstack;
mod chemical;
pub mod error;
mod flasks;
mod setup;

pub use bqueue::BoundedQueue;
pub use bstack::BoundedStack;
pub use chemical::Chemical;
pub use flasks::{
    can_pour_from, can_pour_into, is_sealed, Flask, Flasks, DEFAULT_CAPACITY, UNITS_PER_CHEMICAL,
};
pub use setup::{fill_flasks, Setup, QUEUE_CAPACITY};
