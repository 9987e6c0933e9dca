//! Partition pipeline for the information-bar engine.
//!
//! Runs the three stages for one instrument-day:
//! - Ticks → imbalance bars
//! - Bars → triple-barrier labels
//! - Labels → normalized sample weights
//!
//! Partitions share no state, so callers may run any number of them
//! concurrently. Sharding and aggregation across partitions are left to the
//! caller.

pub mod partition;

pub use partition::{
    process_partition, process_partition_with_cancel, CancellationToken, PartitionError,
    PartitionOutput,
};
