pub mod action;
mod state;
mod state_store;

pub use self::{
    state::{DeliveryRecord, State},
    state_store::{Services, StateStore},
};
