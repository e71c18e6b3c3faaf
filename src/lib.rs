pub mod controllers;
pub mod db;
pub mod mapper;
pub mod models;
pub mod routers;
pub mod secrets;
pub mod seed;
pub mod store;
