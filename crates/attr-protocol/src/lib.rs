//! The framed attribute wire protocol resolver clients speak over a
//! stream socket (component C5): one `addr` attribute in, four
//! attributes back, each set terminated by a blank line. Strict about
//! unknown or missing attributes by design -- this is an internal,
//! same-host protocol, not one that needs to tolerate a drifting peer.

mod error;
mod reply;
mod request;

pub use error::ProtocolError;
pub use reply::{write_reply, ResolveReply};
pub use request::{read_request, ResolveRequest};
