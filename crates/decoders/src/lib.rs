//! Decoding of Practicum poll responses.
//!
//! All shape checks on the API payload live here: `response` validates the
//! envelope and yields the raw homework list, `status` turns one raw record
//! into a typed `StatusReport`.

pub mod response;
pub mod status;


pub use response::{HOMEWORKS_FIELD, check_response};
pub use status::{parse_record, parse_status, status_message};
