//! Common re-exports for convenient entity usage.

pub use super::star::{
    ActiveModel as StarActiveModel, Column as StarColumn, Entity as Star, Model as StarModel,
};
