pub(crate) mod cluster;
pub(crate) mod enqueue;
pub(crate) mod info;
