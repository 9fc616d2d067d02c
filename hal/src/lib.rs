//! # Hardware Abstraction Layer (HAL)
//!
//! This crate defines the hardware abstraction traits a system timer
//! driver is written against.
//!
//! ## Philosophy
//!
//! **The timer core must not know which SoC it runs on.**
//!
//! Register access, interrupt wiring and the kernel's tick accounting are
//! reached through traits. Device crates implement the driver on top of
//! them; tests swap in fakes.
//!
//! ## Design Principles
//!
//! 1. **Trait-based**: All hardware operations go through traits
//! 2. **Minimal unsafe**: Raw MMIO lives in the device crate's bus type
//! 3. **Testable**: Every trait can be backed by a deterministic fake

pub mod interrupts;
pub mod mmio;
pub mod timer;

pub use interrupts::InterruptHal;
pub use mmio::MmioBus;
pub use timer::{SystemTimer, TickAnnouncer, Timeout, TICKS_FOREVER};
