pub(crate) mod diplomacy;
pub(crate) mod events;
pub(crate) mod policy;
