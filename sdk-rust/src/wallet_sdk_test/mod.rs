mod transport;

pub use transport::{MockResult, MockTransport};
