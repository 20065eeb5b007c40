use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

const CHUNK_SIZE: usize = 64 * 1024; // 64 KB

/// Compute the content hash (lowercase hex MD5) of everything `reader` yields.
///
/// The data is streamed in fixed-size chunks so memory use does not depend on
/// the input size.
pub fn hash_reader<R: Read>(reader: &mut R) -> std::io::Result<String> {
    hash_reader_with_progress(reader, &|_| {})
}

/// Like [`hash_reader`], calling `progress` with the running byte count after
/// every chunk.
pub fn hash_reader_with_progress<R: Read>(
    reader: &mut R,
    progress: &dyn Fn(u64),
) -> std::io::Result<String> {
    let mut ctx = md5::Context::new();
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut processed: u64 = 0;

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        ctx.consume(&buf[..n]);
        processed += n as u64;
        progress(processed);
    }

    Ok(format!("{:x}", ctx.compute()))
}

/// Compute the content hash of a file on disk.
pub fn hash_file(path: &Path) -> std::io::Result<String> {
    let mut file = File::open(path)?;
    hash_reader(&mut file)
}

#[cfg(test)]
#[path = "tests/hasher_tests.rs"]
mod tests;
