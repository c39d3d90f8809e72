//! Lecture des fichiers d'entrée (texte brut ou compressé en .bz2)

use std::io::Read;
use std::path::Path;

use bzip2::read::BzDecoder;
use tracing::{debug, warn};

use crate::PuysError;

/// Lit un fichier d'entrée en mémoire et le décode en texte
///
/// Les fichiers `.bz2` sont décompressés à la volée. Le contenu est validé
/// en UTF-8; à défaut il est décodé en Windows-1252 (exports tableur).
pub fn read_text(path: &Path) -> Result<String, PuysError> {
    let bytes = read_bytes(path)?;
    debug!(path = %path.display(), bytes = bytes.len(), "Input read");
    Ok(decode(&bytes, path))
}

/// Lit les octets bruts, en décompressant si nécessaire
fn read_bytes(path: &Path) -> Result<Vec<u8>, PuysError> {
    let file = std::fs::File::open(path).map_err(|e| PuysError::io(path, e))?;

    let mut content = Vec::new();
    if path.extension().map_or(false, |ext| ext == "bz2") {
        BzDecoder::new(file)
            .read_to_end(&mut content)
            .map_err(|e| PuysError::io(path, e))?;
    } else {
        let mut file = file;
        file.read_to_end(&mut content)
            .map_err(|e| PuysError::io(path, e))?;
    }

    Ok(content)
}

/// Décode les octets: UTF-8 si valide, Windows-1252 sinon
fn decode(bytes: &[u8], path: &Path) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);

    match simdutf8::basic::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            warn!(path = %path.display(), "Input is not valid UTF-8, decoding as Windows-1252");
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            decoded.into_owned()
        }
    }
}

/// Nom court d'un fichier pour les messages d'erreur
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}
