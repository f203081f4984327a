//! Shared service wrappers used across clients.

mod mirror;

pub use mirror::MirrorService;
