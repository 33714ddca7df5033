pub mod health;
pub mod identity;
pub mod room4;
pub mod rooms;
pub mod validation;
