//! ArtifactRepository port - where embedded libraries and POMs come from
//!
//! Implementations locate a file for a coordinate on local disk, downloading
//! it first when the repository is remote. "Not here" is `Ok(None)` so a
//! chain can fall through to the next repository; every other failure is an
//! error and stops resolution.

use std::path::PathBuf;

use crate::domain::value_objects::Coordinate;
use crate::error::PackResult;

pub trait ArtifactRepository {
    /// Short name used in diagnostics (`central`, `maven-local`, ...)
    fn name(&self) -> &str;

    /// Location shown to users (URL or directory)
    fn location(&self) -> String;

    /// Path of the requested file on local disk, or `None` when absent
    fn fetch(&self, coordinate: &Coordinate) -> PackResult<Option<PathBuf>>;
}

impl<T: ArtifactRepository + ?Sized> ArtifactRepository for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn location(&self) -> String {
        (**self).location()
    }

    fn fetch(&self, coordinate: &Coordinate) -> PackResult<Option<PathBuf>> {
        (**self).fetch(coordinate)
    }
}
