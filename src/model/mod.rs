pub(crate) mod object;
pub(crate) mod source;
pub(crate) mod validate;
