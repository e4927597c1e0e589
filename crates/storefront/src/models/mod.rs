//! Domain models for the storefront.

pub mod article;
pub mod cart_line;
pub mod client;
pub mod order;
pub mod session;

pub use article::Article;
pub use cart_line::CartLine;
pub use client::ClientIdentity;
pub use order::{Order, OrderItem, OrderItems};
pub use session::keys as session_keys;
