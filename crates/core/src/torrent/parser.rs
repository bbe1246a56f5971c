//! Torrent file parser built on librqbit-core.
//!
//! Extracts the info hash, root name, total size and tracker list from
//! bencoded .torrent data without downloading anything.

use librqbit_core::torrent_metainfo::{torrent_from_bytes, TorrentMetaV1Owned};
use regex_lite::Regex;

use super::{TorrentDecoder, TorrentMetadata, TorrentParseError};

/// Decoder backed by librqbit-core.
#[derive(Debug, Clone, Copy, Default)]
pub struct LibrqbitDecoder;

impl TorrentDecoder for LibrqbitDecoder {
    fn decode(
        &self,
        bytes: &[u8],
        max_meta_version: u32,
    ) -> Result<TorrentMetadata, TorrentParseError> {
        parse_torrent(bytes, max_meta_version)
    }
}

/// Parse a .torrent file into [`TorrentMetadata`].
///
/// Supports both single-file and multi-file torrents. Torrents declaring a
/// `meta version` above `max_meta_version` are rejected.
pub fn parse_torrent(
    bytes: &[u8],
    max_meta_version: u32,
) -> Result<TorrentMetadata, TorrentParseError> {
    let version = meta_version(bytes);
    if version > max_meta_version {
        return Err(TorrentParseError::UnsupportedVersion {
            found: version,
            max: max_meta_version,
        });
    }

    let torrent: TorrentMetaV1Owned =
        torrent_from_bytes(bytes).map_err(|e| TorrentParseError::ParseError(e.to_string()))?;

    let info = &torrent.info;

    let content_path = info
        .name
        .as_ref()
        .map(|b| bytes_to_string(b.as_ref()))
        .unwrap_or_else(|| "unknown".to_string());

    let total_size = if let Some(ref files) = info.files {
        if files.is_empty() {
            return Err(TorrentParseError::EmptyTorrent);
        }
        files.iter().map(|f| f.length).sum()
    } else if let Some(length) = info.length {
        length
    } else {
        return Err(TorrentParseError::EmptyTorrent);
    };

    let mut trackers: Vec<String> = Vec::new();
    let announce = torrent.announce.iter();
    let tiers = torrent.announce_list.iter().flatten();
    for url in announce.chain(tiers) {
        let url = bytes_to_string(url.as_ref());
        if !url.is_empty() && !trackers.contains(&url) {
            trackers.push(url);
        }
    }

    Ok(TorrentMetadata {
        info_hash: torrent.info_hash.as_string(),
        content_path,
        total_size,
        trackers,
    })
}

/// Read the `meta version` entry, defaulting to 1 when absent.
fn meta_version(bytes: &[u8]) -> u32 {
    let text = String::from_utf8_lossy(bytes);
    Regex::new(r"12:meta versioni(\d+)e")
        .ok()
        .and_then(|re| re.captures(&text)?.get(1)?.as_str().parse().ok())
        .unwrap_or(1)
}

/// Convert bytes to a UTF-8 string, replacing invalid sequences.
fn bytes_to_string(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;
    use crate::torrent::MAX_META_VERSION;

    #[test]
    fn test_parse_invalid_torrent() {
        let result = parse_torrent(b"not a valid torrent", MAX_META_VERSION);
        assert!(matches!(result, Err(TorrentParseError::ParseError(_))));
    }

    #[test]
    fn test_parse_empty_data() {
        assert!(parse_torrent(b"", MAX_META_VERSION).is_err());
    }

    #[test]
    fn test_parse_single_file_torrent() {
        let bytes = fixtures::torrent_bytes(
            "movie.mkv",
            1000,
            &["https://tracker.alpha.example/announce?passkey=x"],
        );
        let meta = parse_torrent(&bytes, MAX_META_VERSION).unwrap();
        assert_eq!(meta.content_path, "movie.mkv");
        assert_eq!(meta.total_size, 1000);
        assert_eq!(
            meta.trackers,
            vec!["https://tracker.alpha.example/announce?passkey=x".to_string()]
        );
        assert_eq!(meta.info_hash.len(), 40);
        assert!(meta
            .info_hash
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_info_hash_is_stable() {
        let a = fixtures::torrent_bytes("same", 10, &[]);
        let b = fixtures::torrent_bytes("same", 10, &[]);
        let c = fixtures::torrent_bytes("other", 10, &[]);
        let ha = parse_torrent(&a, MAX_META_VERSION).unwrap().info_hash;
        let hb = parse_torrent(&b, MAX_META_VERSION).unwrap().info_hash;
        let hc = parse_torrent(&c, MAX_META_VERSION).unwrap().info_hash;
        assert_eq!(ha, hb);
        assert_ne!(ha, hc);
    }

    #[test]
    fn test_meta_version_ceiling() {
        assert_eq!(meta_version(b"d4:infod4:name1:aee"), 1);
        assert_eq!(meta_version(b"d4:infod12:meta versioni2e4:name1:aee"), 2);

        let result = parse_torrent(b"d4:infod12:meta versioni3e4:name1:aee", 2);
        assert!(matches!(
            result,
            Err(TorrentParseError::UnsupportedVersion { found: 3, max: 2 })
        ));
    }

    #[test]
    fn test_bytes_to_string_invalid_utf8() {
        let invalid = vec![0xff, 0xfe, 0x68, 0x65, 0x6c, 0x6c, 0x6f];
        assert!(bytes_to_string(&invalid).contains("hello"));
    }
}
