pub(crate) mod alphanumeric;
pub(crate) mod namer;
