//! FLAC: Vorbis comments via lofty

use lofty::config::WriteOptions;
use lofty::file::{FileType, TaggedFileExt};
use lofty::prelude::*;
use lofty::probe::Probe;
use lofty::tag::{ItemKey, Tag, TagType};
use std::path::Path;

use super::{StoredTags, TagError};

fn read_error(path: &Path, err: impl std::fmt::Display) -> TagError {
    TagError::Read {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

fn open(path: &Path) -> Result<lofty::file::TaggedFile, TagError> {
    let tagged_file = Probe::open(path)
        .map_err(|e| read_error(path, e))?
        .read()
        .map_err(|e| read_error(path, e))?;

    if tagged_file.file_type() != FileType::Flac {
        return Err(TagError::Unsupported(path.to_path_buf()));
    }

    Ok(tagged_file)
}

/// No padding block is requested: lofty 0.19 panics when it has to create
/// one in a file that had none.
fn write_options() -> WriteOptions {
    WriteOptions::default().preferred_padding(0)
}

pub(super) fn write(path: &Path, bpm: &str, mood: &str) -> Result<(), TagError> {
    let mut tagged_file = open(path)?;

    if tagged_file.tag(TagType::VorbisComments).is_none() {
        tagged_file.insert_tag(Tag::new(TagType::VorbisComments));
    }
    let tag = tagged_file
        .tag_mut(TagType::VorbisComments)
        .ok_or_else(|| TagError::Write {
            path: path.to_path_buf(),
            message: "Vorbis comment block unavailable".to_string(),
        })?;

    tag.insert_text(ItemKey::Bpm, bpm.to_string());
    tag.set_genre(mood.to_string());

    tag.save_to_path(path, write_options())
        .map_err(|e| TagError::Write {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

pub(super) fn read(path: &Path) -> Result<StoredTags, TagError> {
    let tagged_file = open(path)?;

    Ok(match tagged_file.tag(TagType::VorbisComments) {
        Some(tag) => StoredTags {
            bpm: tag.get_string(&ItemKey::Bpm).map(str::to_string),
            mood: tag.genre().map(|g| g.into_owned()),
        },
        None => StoredTags::default(),
    })
}
