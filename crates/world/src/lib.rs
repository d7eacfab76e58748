mod actuator;
mod display;
mod events;
mod interaction;
mod persist;
mod pos;
mod press;
mod recipe;
mod slots;
mod station;
mod sync;
mod trigger;
mod world;

pub use actuator::*;
pub use display::*;
pub use events::*;
pub use interaction::*;
pub use persist::*;
pub use pos::*;
pub use press::*;
pub use recipe::*;
pub use slots::*;
pub use station::*;
pub use sync::*;
pub use trigger::*;
pub use world::*;
