//! The confirmation pipeline.
//!
//! [`ConfirmationController`] walks one transaction attempt through its
//! states: fetch seqno and timeout, build the unsigned message, emulate it
//! remotely, derive the fee/risk display model, and on user approval sign
//! and broadcast. Remote endpoints are reached through the traits in
//! [`api`], with [`HttpApi`] as the production implementation.

pub mod api;
mod controller;
mod error;
mod http;
mod model;
mod operation;
pub mod risk;

pub use controller::*;
pub use error::*;
pub use http::*;
pub use model::*;
pub use operation::*;
pub use risk::{RiskInput, RiskModel};
