use std::{fs, io::Read, path::Path};

const READ_CHUNK: usize = 64 * 1024;

/// BLAKE3 digest of the whole file, hex encoded.
///
/// The file is streamed in fixed-size chunks and closed before returning.
pub fn compute_content_hash(path: &Path) -> Result<String, std::io::Error> {
    let mut file = fs::File::open(path)?;
    let mut hasher = blake3::Hasher::new();
    let mut buffer = vec![0u8; READ_CHUNK];
    loop {
        let read = file.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }
    Ok(hasher.finalize().to_hex().to_string())
}
