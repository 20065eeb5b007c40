use std::path::{Component, Path, PathBuf};

/// File name of a path as `&str`, or `""` when missing or not UTF-8.
pub fn file_name_str(path: &Path) -> &str {
    path.file_name().and_then(|n| n.to_str()).unwrap_or("")
}

/// File stem of a path as `&str`, or `""` when missing or not UTF-8.
pub fn file_stem_str(path: &Path) -> &str {
    path.file_stem().and_then(|n| n.to_str()).unwrap_or("")
}

/// Make a path absolute and lexically normalize it.
///
/// `.` components are dropped and `..` pops the previous component. The
/// filesystem is not consulted, so symlinks are left alone.
pub fn absolute_normalized(path: &Path) -> std::io::Result<PathBuf> {
    let absolute = std::path::absolute(path)?;
    let mut out = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    Ok(out)
}

/// Format a byte count with fractional KB/MB (e.g., "1.5 KB", "2.3 MB").
pub fn format_bytes_approx(bytes: u64) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else if bytes >= 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_and_stem() {
        let p = Path::new("/roms/snes/zelda.sfc");
        assert_eq!(file_name_str(p), "zelda.sfc");
        assert_eq!(file_stem_str(p), "zelda");
        assert_eq!(file_stem_str(Path::new("zelda.sfc.srm")), "zelda.sfc");
    }

    #[test]
    fn test_absolute_normalized_drops_dot_segments() {
        let p = absolute_normalized(Path::new("/roms/snes/./zelda.sfc")).unwrap();
        assert_eq!(p, PathBuf::from("/roms/snes/zelda.sfc"));

        let p = absolute_normalized(Path::new("/roms/snes/../nes/smb.nes")).unwrap();
        assert_eq!(p, PathBuf::from("/roms/nes/smb.nes"));
    }

    #[test]
    fn test_absolute_normalized_relative_is_absolute() {
        let p = absolute_normalized(Path::new("zelda.sfc")).unwrap();
        assert!(p.is_absolute());
        assert!(p.ends_with("zelda.sfc"));
    }

    #[test]
    fn test_format_bytes_approx() {
        assert_eq!(format_bytes_approx(512), "512 B");
        assert_eq!(format_bytes_approx(1536), "1.5 KB");
        assert_eq!(format_bytes_approx(2 * 1024 * 1024), "2.0 MB");
    }
}
