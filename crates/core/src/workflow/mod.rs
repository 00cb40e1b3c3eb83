pub mod controller;
pub mod screens;
pub mod session;
