pub mod builder;
pub mod busy;
pub mod handler;
pub mod listener;
pub mod render;
pub mod resources;
pub mod routes;

pub use builder::ServerBuilder;
pub use handler::{App, RequestHandler};
pub use routes::{Resource, Route, RouteTable};
