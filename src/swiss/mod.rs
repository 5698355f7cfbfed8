pub mod common;
pub mod domain;
pub mod repository;
pub mod service;
