pub(crate) mod code_builder;
pub(crate) mod cppwinrt;
pub(crate) mod csharp;
pub(crate) mod emitter;
pub(crate) mod fingerprint;
pub(crate) mod resolver;
pub(crate) mod stringifier;
