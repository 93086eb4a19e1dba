pub(crate) mod cache;
pub(crate) mod query;
pub(crate) mod remove;
pub(crate) mod shared;
pub(crate) mod sync;
