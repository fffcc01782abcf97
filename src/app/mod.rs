pub mod compile;
pub mod diagnostic;
pub mod manifest;
pub mod method;
mod paths;
pub mod route_map;
pub mod routes;
pub mod view;
