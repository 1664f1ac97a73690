//! A drag and drop grid for egui: cards can be reordered with the mouse or by touch, neighbours
//! slide out of the way while an overlay card follows the pointer, and the new order is written
//! back to an [`OrderStore`] in one piece.

pub use animation::{CubicBezier, Entrance, Transform, Transition};
pub use collision::{ClosestCenter, CollisionDetection, RectIntersection};
pub use config::GridConfig;
pub use error::{ConfigError, ReorderError};
pub use item::{DragDropItem, ItemStyle, SortableItem};
pub use sensor::{ActivationConstraint, MouseSensor, PointerKind, Sensors, TouchSensor};
pub use session::DragSession;
pub use state::{
    DragDropResponse, DragEndEvent, DragPhase, DragStartEvent, DropAnimation, FrameInput,
    ReorderGrid,
};
pub use store::{Atom, OrderStore, SubscriptionId};
pub use strategy::{RectSorting, SortingStrategy};
pub use utils::DragIndices;

pub mod animation;
pub mod collision;
mod config;
mod error;
pub mod grid;
mod handle;
mod item;
pub mod sensor;
mod session;
mod state;
mod store;
pub mod strategy;
pub mod utils;
