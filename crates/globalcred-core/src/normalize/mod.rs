//! Response normalization
//!
//! Turns backend payloads into sparse output records:
//! - `normalize_credentials`: one record per credential, projected by kind
//! - `normalize_sub_type`: the fixed `{response, version}` record

mod credentials;
mod sub_type;

pub use credentials::{normalize_credential, normalize_credentials};
pub use sub_type::normalize_sub_type;
