pub(crate) mod footer;
pub(crate) mod header;
pub(crate) mod input;
pub(crate) mod timeline;
