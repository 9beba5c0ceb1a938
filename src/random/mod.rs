mod fake_stream;
mod random_stream;

pub use fake_stream::FakeStream;
pub use random_stream::{RandomNumberStream, RngStream};
