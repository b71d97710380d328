pub mod http;
pub mod location;
pub mod model;
pub mod search;
