// Public handlers: no caller required.
pub mod products;
pub mod system;
