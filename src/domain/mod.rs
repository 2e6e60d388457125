//! Domain modules: operations, request encoding, response shapes, and the
//! typed inventory wrappers.

pub mod inventory;
pub mod operation;
pub mod request;
pub mod response;
