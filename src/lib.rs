//! LiveScribe - meeting capture and upload CLI
//!
//! This crate records a meeting from the microphone or the system's
//! screen-share audio, shows a live waveform while capturing, and
//! uploads the finished recording to a meeting-minutes service that
//! streams back its processing progress.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Core business logic, value objects, entities, and errors
//! - **Application**: Use cases and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (cpal, Opus, HTTP upload)
//! - **CLI**: Command-line interface, argument parsing, and signal handling

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
