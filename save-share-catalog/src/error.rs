/// Errors that can occur while reading a system catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("XML parse error in {path}: {source}")]
    Xml {
        path: String,
        source: quick_xml::Error,
    },
}

impl CatalogError {
    pub fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }

    pub fn xml(path: &std::path::Path, source: quick_xml::Error) -> Self {
        Self::Xml {
            path: path.display().to_string(),
            source,
        }
    }
}
