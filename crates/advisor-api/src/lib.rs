pub mod chat;
pub mod error;
pub mod locks;
pub mod service;

#[cfg(test)]
pub(crate) mod testing;
