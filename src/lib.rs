pub mod card;
pub mod config;
pub mod error;
pub mod server;
#[doc(hidden)]
pub mod test_support;
