pub(crate) mod pairing;
pub(crate) mod sheet;
