//! Nearest-stop bus arrivals server.
//!
//! A web application that answers: "I'm standing near one of my usual
//! stops; when do my buses come?" The caller names their stops, the server
//! picks the closest one and asks OneBusAway for its arrivals.

pub mod board;
pub mod cache;
pub mod config;
pub mod domain;
pub mod oba;
pub mod web;

#[cfg(test)]
mod test_support;
