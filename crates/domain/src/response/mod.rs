//! Server replies and their `Link` headers.

mod link;
mod snapshot;

pub use link::{Link, parse_link_header, parse_link_headers};
pub use snapshot::{ResponseSnapshot, StatusCode};
