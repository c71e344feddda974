//! Tool routers, one per Forge area. [`ForgeMcpCore::new`] joins them.
//!
//! [`ForgeMcpCore::new`]: crate::server::ForgeMcpCore::new

mod account;
mod catalog;
mod certificates;
mod commands;
mod databases;
mod deployments;
mod servers;
mod sites;
mod wordpress;
