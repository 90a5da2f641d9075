//! Error types for the rollgraph core library.
//!
//! Defines the error enums exposed by the public API, their stable codes, and
//! a convenient result alias.

use std::{fmt, sync::Arc};

use thiserror::Error;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? $( ( $($tuple:tt)* ) )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? $( ( $($tuple)* ) )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// An error produced while validating a [`crate::TransactionEvent`].
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum EventError {
    /// One of the two endpoint identifiers was empty.
    #[error("{role} identifier must not be empty")]
    EmptyIdentifier {
        /// Which endpoint was empty (`actor` or `target`).
        role: &'static str,
    },
    /// The second-of-minute fell outside `0..60`.
    #[error("second of minute must be below 60 (got {second})")]
    SecondOutOfRange {
        /// The rejected second value.
        second: u32,
    },
    /// The second-of-minute disagrees with the event time.
    #[error("second of minute {second} does not match event time {event_time}")]
    SecondMismatch {
        /// The supplied second-of-minute.
        second: u8,
        /// The supplied event time in seconds since the Unix epoch.
        event_time: i64,
    },
}

define_error_codes! {
    /// Stable codes describing [`EventError`] variants.
    enum EventErrorCode for EventError {
        /// One of the two endpoint identifiers was empty.
        EmptyIdentifier => EmptyIdentifier { .. } => "EVENT_EMPTY_IDENTIFIER",
        /// The second-of-minute fell outside `0..60`.
        SecondOutOfRange => SecondOutOfRange { .. } => "EVENT_SECOND_OUT_OF_RANGE",
        /// The second-of-minute disagrees with the event time.
        SecondMismatch => SecondMismatch { .. } => "EVENT_SECOND_MISMATCH",
    }
}

/// Reports a broken structural invariant of the rolling graph.
///
/// These are programming errors: none of them is reachable from validated
/// input. They are surfaced as values so the caller decides how to abort.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum InvariantViolation {
    /// The histogram recorded vertices at degree zero.
    #[error("histogram records {count} vertex(es) at degree zero")]
    ZeroDegreeOccupied {
        /// Occupancy found in the zero bucket.
        count: u32,
    },
    /// The histogram total disagrees with the registry population.
    #[error("histogram counts {histogram} vertex(es) but the registry holds {registry}")]
    PopulationMismatch {
        /// Sum over all histogram buckets.
        histogram: u64,
        /// Number of vertices registered.
        registry: usize,
    },
    /// A vertex's stored degree disagrees with the retained edges touching it.
    #[error("vertex `{vertex}` stores degree {stored} but {incident} edge endpoint(s) reference it")]
    DegreeMismatch {
        /// Identifier of the inconsistent vertex.
        vertex: Arc<str>,
        /// Degree held by the vertex record.
        stored: u32,
        /// Endpoint incidences counted across the window.
        incident: u64,
    },
    /// A retained edge references a vertex that is not registered.
    #[error("edge endpoint `{vertex}` is not registered")]
    DanglingEndpoint {
        /// Identifier of the missing endpoint.
        vertex: Arc<str>,
    },
    /// The same unordered pair is retained more than once.
    #[error("edge ({low}, {high}) is retained more than once")]
    DuplicateEdge {
        /// Lexicographically smaller endpoint.
        low: Arc<str>,
        /// Lexicographically larger endpoint.
        high: Arc<str>,
    },
    /// The running edge counter disagrees with the retained edges.
    #[error("edge counter reads {recorded} but {retained} edge(s) are retained")]
    EdgeCountMismatch {
        /// Value of the running counter.
        recorded: usize,
        /// Edges actually stored in the window.
        retained: usize,
    },
    /// An operation addressed a vertex that is not registered.
    #[error("vertex `{vertex}` is not registered")]
    UnknownVertex {
        /// Identifier that could not be found.
        vertex: Arc<str>,
    },
    /// A vertex was evicted while it still had incident edges.
    #[error("vertex `{vertex}` evicted with degree {degree}")]
    LiveEviction {
        /// Identifier of the vertex.
        vertex: Arc<str>,
        /// Degree it still carried.
        degree: u32,
    },
    /// A histogram bucket disagrees with the degrees stored in the registry.
    #[error("histogram records {recorded} vertex(es) at degree {degree} but the registry holds {expected}")]
    HistogramMismatch {
        /// Degree whose bucket disagrees.
        degree: u32,
        /// Occupancy recorded in the bucket.
        recorded: u32,
        /// Vertices registered at that degree.
        expected: u64,
    },
    /// A registered vertex is not referenced by any retained edge.
    #[error("vertex `{vertex}` is registered without incident edges")]
    OrphanVertex {
        /// Identifier of the orphaned vertex.
        vertex: Arc<str>,
    },
    /// A retained edge is older than the window allows.
    #[error("edge ({low}, {high}) observed at {observed_at} lies outside the window ending at {latest}")]
    ExpiredEdge {
        /// Lexicographically smaller endpoint.
        low: Arc<str>,
        /// Lexicographically larger endpoint.
        high: Arc<str>,
        /// Event time the edge was observed at.
        observed_at: i64,
        /// Latest event time of the window.
        latest: i64,
    },
    /// A retained edge sits in a slot other than its second-of-minute.
    #[error("edge ({low}, {high}) is filed under second {slot}")]
    MisfiledEdge {
        /// Lexicographically smaller endpoint.
        low: Arc<str>,
        /// Lexicographically larger endpoint.
        high: Arc<str>,
        /// Slot holding the edge.
        slot: u8,
    },
    /// A histogram bucket was decremented below zero.
    #[error("histogram bucket for degree {degree} underflowed")]
    HistogramUnderflow {
        /// Degree whose bucket was already empty.
        degree: u32,
    },
}

/// Error type produced when constructing or driving a [`crate::RollingGraph`].
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum RollingGraphError {
    /// A builder setting was rejected.
    #[error("invalid setting `{setting}`: {reason}")]
    InvalidConfiguration {
        /// Name of the offending builder setting.
        setting: &'static str,
        /// Human-readable explanation.
        reason: String,
    },
    /// A vertex degree approached the representable limit.
    #[error("vertex degree {degree} exceeds the supported ceiling")]
    DegreeOverflow {
        /// The degree that could not be recorded.
        degree: u32,
    },
    /// The degree histogram would have to grow past its capacity limit.
    #[error("degree {degree} does not fit the histogram capacity limit of {limit}")]
    HistogramExhausted {
        /// The degree that could not be recorded.
        degree: u32,
        /// Configured capacity limit.
        limit: usize,
    },
    /// An internal invariant was broken.
    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
}

define_error_codes! {
    /// Stable codes describing [`RollingGraphError`] variants.
    enum RollingGraphErrorCode for RollingGraphError {
        /// A builder setting was rejected.
        InvalidConfiguration => InvalidConfiguration { .. } => "ROLLGRAPH_INVALID_CONFIGURATION",
        /// A vertex degree approached the representable limit.
        DegreeOverflow => DegreeOverflow { .. } => "ROLLGRAPH_DEGREE_OVERFLOW",
        /// The degree histogram would have to grow past its capacity limit.
        HistogramExhausted => HistogramExhausted { .. } => "ROLLGRAPH_HISTOGRAM_EXHAUSTED",
        /// An internal invariant was broken.
        InvariantViolation => Invariant(..) => "ROLLGRAPH_INVARIANT_VIOLATION",
    }
}

impl RollingGraphError {
    /// Returns `true` for failures that stem from a programming error rather
    /// than from resource limits or configuration.
    #[must_use]
    pub const fn is_invariant(&self) -> bool {
        matches!(self, Self::Invariant(_))
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, RollingGraphError>;
