pub mod communication;
pub mod event;
pub mod guest;
pub mod poll;
