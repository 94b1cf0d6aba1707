//! Domain records and the pure logic behind the routes
//!
//! Nothing here performs I/O; handlers combine these with the GitHub client,
//! the domain probe and the document store.

pub mod gist;
pub mod likes;
pub mod sites;
pub mod utils;
