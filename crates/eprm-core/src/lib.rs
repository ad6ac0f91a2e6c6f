//! # EPRM Core Library
//!
//! A library for predicting the effective recoverable concentration of a purified
//! protein from its physicochemical sequence properties, combining a deterministic
//! multiplicative recovery model with Monte Carlo uncertainty quantification.
//!
//! ## Architectural Philosophy
//!
//! The library is designed with a strict three-layer architecture to ensure a clear
//! separation of concerns, making it modular, testable, and extensible.
//!
//! - **[`core`]: The Foundation.** Contains stateless data models
//!   (`SequenceRecord`, `SequenceProperties`), the pure factor mathematics of the
//!   recovery model, and file I/O utilities (FASTA reading, property tables,
//!   directory discovery).
//!
//! - **[`engine`]: The Logic Core.** Holds the validated, immutable experiment
//!   configuration, the deterministic recovery evaluation, the Monte Carlo
//!   uncertainty engine driven by a caller-supplied random source, and structured
//!   progress reporting.
//!
//! - **[`workflows`]: The Public API.** This is the highest-level, user-facing
//!   layer. It ties the `engine` and `core` together to execute complete analysis
//!   procedures: single-record evaluation and batch directory processing.

pub mod core;
pub mod engine;
pub mod workflows;
