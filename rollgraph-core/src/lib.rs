//! Rollgraph core library.
//!
//! Maintains an undirected transaction graph over a sliding sixty-second
//! window of event time and reports the median vertex degree after every
//! accepted event.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod chain;
mod edge;
mod engine;
mod error;
mod event;
mod hash;
mod histogram;
mod tally;
mod validate;
mod vertex;
mod window;

pub use crate::{
    builder::RollingGraphBuilder,
    edge::VertexPair,
    engine::{Ingest, RollingGraph},
    error::{
        EventError, EventErrorCode, InvariantViolation, Result, RollingGraphError,
        RollingGraphErrorCode,
    },
    event::TransactionEvent,
    hash::{IndexWidth, edge_hash, fnv1a32, vertex_hash},
    histogram::Median,
};
