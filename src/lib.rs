//! samchat - terminal chat client for a remote knowledge-assistant backend
//!
//! The conversation log and turn state live in [`session`], backend replies
//! of any known layout are reduced to display text by [`normalize`], and
//! [`agent`] ties both to the HTTP [`backend`] and the reply [`cache`].

pub mod agent;
pub mod backend;
pub mod cache;
pub mod config;
pub mod error;
pub mod events;
pub mod normalize;
pub mod prompts;
pub mod session;
pub mod ui;

#[cfg(test)]
mod testing;
