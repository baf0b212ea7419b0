//! Build automation for xcframework packaging.
//!
//! Each step of a packaging run lives in its own module and can be used on
//! its own; [`XcframeworkBuilder`] sequences them.
//!
//! | Module | Step | xcodebuild invocation |
//! |--------|------|-----------------------|
//! | [`inspector`] | Product type check | `-showBuildSettings` |
//! | [`archiver`] | Per-platform archive | `archive` |
//! | [`merger`] | Bundle assembly | `-create-xcframework` |
//! | [`xcframework`] | Orchestration | `clean` + all of the above |
//!
//! ## Output layout
//!
//! ```text
//! <output_dir>/
//! ├── <scheme>-iphoneos.xcarchive/Products/Library/Frameworks/<scheme>.framework
//! ├── <scheme>-iphonesimulator.xcarchive/Products/Library/Frameworks/<scheme>.framework
//! └── <scheme>.xcframework
//! ```

pub mod archiver;
pub mod inspector;
pub mod merger;
pub mod xcframework;

#[cfg(test)]
pub(crate) mod testing;

pub use xcframework::XcframeworkBuilder;
