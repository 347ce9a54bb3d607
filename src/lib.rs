//! Cast River library.
//!
//! A Farcaster news river: fetches trending casts, groups the ones that
//! share an embedded URL into multi-author "stories", enriches them with
//! scraped page metadata, and serves a ranked feed, a daily timeline, and
//! a search view.

pub mod config;
pub mod metadata;
pub mod model;
pub mod neynar;
pub mod story;
pub mod text;
pub mod web;
