pub mod category;
pub mod config;
pub mod hub;
pub mod resource;

pub use category::*;
pub use config::*;
pub use hub::*;
pub use resource::*;
