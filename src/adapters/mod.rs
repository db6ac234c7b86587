// Adapters layer: concrete implementations of the domain ports (http, terminal, storage).

pub mod export;
pub mod http;
pub mod storage;
pub mod terminal;
