//! Request and Response models for the inspection API

pub mod requests;
pub mod responses;

pub use requests::{KeysQuery, SetRequest, MAX_KEY_LENGTH};
pub use responses::{
    ClearResponse, GetResponse, HealthResponse, KeysResponse, MessageResponse, TtlResponse,
};
