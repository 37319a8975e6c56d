mod colors;
mod constants;

pub(crate) use colors::*;
pub(crate) use constants::*;
