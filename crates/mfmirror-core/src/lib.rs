pub mod config;
pub mod logging;

pub mod fetcher;
pub mod filter;
pub mod har;
pub mod mapper;
pub mod mirror;
pub mod reference;
pub mod retry;
pub mod storage;
pub mod verify;
pub mod walker;
