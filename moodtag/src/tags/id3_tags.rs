//! MP3: ID3v2 frames via the `id3` crate

use id3::{ErrorKind, Tag, TagLike, Version};
use std::path::Path;

use super::{StoredTags, TagError};

const BPM_FRAME: &str = "TBPM";

/// Existing tag, or an empty one when the file has none yet
fn load(path: &Path) -> Result<Tag, TagError> {
    match Tag::read_from_path(path) {
        Ok(tag) => Ok(tag),
        Err(e) if matches!(e.kind, ErrorKind::NoTag) => Ok(Tag::new()),
        Err(e) => Err(TagError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        }),
    }
}

pub(super) fn write(path: &Path, bpm: &str, mood: &str) -> Result<(), TagError> {
    let mut tag = load(path)?;
    tag.set_text(BPM_FRAME, bpm);
    tag.set_genre(mood);

    tag.write_to_path(path, Version::Id3v23)
        .map_err(|e| TagError::Write {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

pub(super) fn read(path: &Path) -> Result<StoredTags, TagError> {
    let tag = load(path)?;
    Ok(StoredTags {
        bpm: tag
            .get(BPM_FRAME)
            .and_then(|frame| frame.content().text())
            .map(str::to_string),
        mood: tag.genre().map(str::to_string),
    })
}
