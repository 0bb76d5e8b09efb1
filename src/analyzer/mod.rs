//! Availability analysis module.
//!
//! This module decides whether a declaration may be used within the
//! configured deployment targets, and how availability composes when a new
//! construct is built from several declarations.
//!
//! # Components
//!
//! 1. **Intervals**: [`LowerBound`] / [`UpperBound`] keep the two opposite
//!    "absent" conventions apart; [`ApiWindow`] and [`TargetWindow`]
//!    classify one platform.
//!
//! 2. **Resolution**: [`AvailabilityResolver`] combines per-platform
//!    classifications into a single [`Classification`](crate::Classification).
//!
//! 3. **Merging**: [`merge`] intersects the usable windows of two
//!    declarations.
//!
//! Everything here is pure and infallible over immutable inputs, so
//! declarations can be resolved on any number of threads.
//!
//! # Example
//!
//! ```rust
//! use sdkgate::analyzer::{merge, resolve};
//! use sdkgate::config::{DeploymentTargets, TargetRange};
//! use sdkgate::{Classification, DeclarationAvailability, Platform, PlatformFact, Version};
//!
//! let targets = DeploymentTargets::new()
//!     .with(Platform::Macos, TargetRange::from_min(Version::new(10, 13, 0)));
//!
//! let a = DeclarationAvailability::new()
//!     .with_platform(Platform::Macos, PlatformFact::introduced(Version::new(10, 12, 0)));
//! let b = DeclarationAvailability::new()
//!     .with_platform(Platform::Macos, PlatformFact::introduced(Version::new(10, 15, 0)));
//!
//! assert_eq!(resolve(&a, &targets), Classification::All);
//! assert_eq!(resolve(&merge(&a, &b), &targets), Classification::Some);
//! ```

mod interval;
mod merge;
mod resolver;

pub use interval::{ApiWindow, LowerBound, TargetWindow, UpperBound};
pub use merge::{merge, merge_all, merge_facts};
pub use resolver::{resolve, AvailabilityResolver};
