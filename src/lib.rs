//! Backend for browsing GitHub users' public repositories and keeping a
//! per-user list of favourites behind a provider-issued session cookie.

pub mod config;
pub mod db;
pub mod error;
pub mod ports;
pub mod routes;
pub mod state;

pub mod client {
    pub mod api;
    pub mod view_state;
}

pub mod models {
    pub mod favourite;
    pub mod repository;
    pub mod user;
}

pub mod providers {
    pub mod supabase;
}

pub mod repositories {
    pub mod favourite_pg;
    pub mod favourite_rest;
}

pub mod services {
    pub mod favourites;
    pub mod github;
}

pub mod handlers {
    pub mod auth;
    pub mod common;
    pub mod favourites;
    pub mod github;

    pub use common::{JsonBody, MessageResponse};
}

pub mod middleware_layer {
    pub mod session;
}

pub mod validation {
    pub mod favourites;
}
