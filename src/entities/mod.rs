pub mod events;
pub mod orders;
pub mod products;
pub mod tickets;

pub use events as event_entity;
pub use orders as order_entity;
pub use products as product_entity;
pub use tickets as ticket_entity;
