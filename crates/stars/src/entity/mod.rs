//! SeaORM entity definitions for the stars database schema.

pub mod prelude;
pub mod star;
