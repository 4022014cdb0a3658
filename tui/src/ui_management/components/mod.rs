pub mod alert_box;
mod component;
pub mod usage;

pub use component::{Component, ComponentRender};
