#![doc = "sourceforge-harvest-core: core logic library for sourceforge-harvest."]

//! This crate holds the whole harvesting pipeline for one SourceForge
//! account: listing the account's projects over the public REST API and
//! cloning each project's git repository into a local directory.
//!
//! # Usage
//! Build a [`fetch::SourceForgeDataSource`] from [`config::FetchParams`] and
//! call [`contract::DataSource::fetch`], or drive [`fetch::fetch`] directly
//! with your own [`contract::ProjectLister`], [`contract::CloneExecutor`]
//! and [`contract::ProgressSink`].

pub mod config;
pub mod connection;
pub mod contract;
pub mod error;
pub mod events;
pub mod fetch;
pub mod listing;
pub mod replicate;
