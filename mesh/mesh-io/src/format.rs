//! Supported mesh formats and extension detection.

use std::fmt;
use std::path::Path;

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshFormat {
    /// STL (Stereolithography), binary or ASCII.
    Stl,
    /// OBJ (Wavefront), ASCII with shared vertices and groups.
    Obj,
    /// 3MF (3D Manufacturing Format), ZIP-packaged XML.
    ThreeMf,
}

impl MeshFormat {
    /// All supported formats.
    pub const ALL: [Self; 3] = [Self::Stl, Self::Obj, Self::ThreeMf];

    /// Detect format from a bare extension (without the dot), case-insensitive.
    ///
    /// ```
    /// use mesh_io::MeshFormat;
    ///
    /// assert_eq!(MeshFormat::from_extension("STL"), Some(MeshFormat::Stl));
    /// assert_eq!(MeshFormat::from_extension("step"), None);
    /// ```
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "stl" => Some(Self::Stl),
            "obj" => Some(Self::Obj),
            "3mf" => Some(Self::ThreeMf),
            _ => None,
        }
    }

    /// Detect format from a file path or file name.
    ///
    /// Returns `None` if the extension is missing or not recognized.
    #[must_use]
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?;
        Self::from_extension(ext)
    }

    /// Canonical lowercase file extension for this format.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Stl => "stl",
            Self::Obj => "obj",
            Self::ThreeMf => "3mf",
        }
    }

    /// Display name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Stl => "STL",
            Self::Obj => "OBJ",
            Self::ThreeMf => "3MF",
        }
    }
}

impl fmt::Display for MeshFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lowercased extension of `name`, or an empty string if it has none.
pub(crate) fn extension_of(name: &Path) -> String {
    name.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default()
}
