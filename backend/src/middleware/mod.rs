//! Request middleware.
//!
//! Authentication gates live with the HTTP adapter in
//! `inbound::http::auth`; this module holds the app-wide layers.

pub mod trace;

pub use trace::Trace;
