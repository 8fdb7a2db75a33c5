// HTTP API: shipping list endpoints, health probes and route wiring

pub mod health;
pub mod model;
pub mod route;
pub mod shipping;
