//! Core engines - framework-agnostic gamification and synchronization
//! logic.
//!
//! `stats`, `heatmap` and `medals` are pure computations over the entity
//! collections; `sync` owns the in-memory state and mediates persistence;
//! `export` serializes snapshots. Nothing in here renders, routes or
//! authenticates - those are external collaborators.

/// Backup snapshot serialization
pub mod export;
/// Per-habit consistency heatmap grid
pub mod heatmap;
/// Medal achievement evaluation
pub mod medals;
/// Pure derived statistics (points, streaks, levels, rates, trends)
pub mod stats;
/// Optimistic mutation and rollback against the storage port
pub mod sync;
