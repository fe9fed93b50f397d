/*!
 * # Chainscan - Closed Trading Loop Discovery
 *
 * Chainscan finds the closed trading loops ("chains") of a cryptocurrency
 * exchange: sequences of markets that start and end at the same currency.
 * Every loop is reduced to one canonical form, so the same loop found from a
 * different start currency or in the other direction is only reported once.
 *
 * ## Core Features
 *
 * - **Quote Classification**: Detects which currencies act as valuation anchors
 * - **Chain Discovery**: Bounded depth-first enumeration of simple loops
 * - **Canonicalization**: Deterministic start market, direction and hash per loop
 *
 * ## Module Structure
 *
 * - `chain`: Market graph, classification, enumeration and canonicalization
 * - `config`: Configuration management for the system
 * - `exchange`: Exchange snapshot and the exchange-level discovery pass
 * - `snapshot`: Loading exchange snapshots from JSON
 * - `utils`: Utility functions and helpers
 */

/// Chain discovery and canonicalization
pub mod chain;
/// Configuration management for the system
pub mod config;
/// Exchange snapshot and discovery pass
pub mod exchange;
/// Snapshot loading
pub mod snapshot;
/// Utility functions and helpers
pub mod utils;
