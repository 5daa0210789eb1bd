
pub use test::{TestArgs, handle_test};
