//! Data model and host-facing traits for classmap.
//!
//! This crate carries no I/O. It defines:
//! - [`PathEntry`]: the identity of one class-path location (directory or archive)
//! - [`LoaderScope`] / [`ScopeHandle`]: the capability seam over the host's
//!   loader hierarchy
//! - [`ResourceInfo`] / [`ClassInfo`]: the records produced by a scan
//!
//! The scanning engine itself lives in `classmap-core`.

pub mod entry;
pub mod resource;
pub mod scope;

pub use entry::PathEntry;
pub use resource::{CLASS_FILE_SUFFIX, ClassInfo, ResourceInfo, class_name_of, is_class_resource};
pub use scope::{BoxError, LoaderScope, ScopeHandle, StaticScope};
