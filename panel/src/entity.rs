pub mod client_traffic;
pub mod inbound;

pub use client_traffic::Entity as ClientTraffic;
pub use inbound::Entity as Inbound;
