use serde::{Deserialize, Serialize};

/// Matrix message type picked for an outbound file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Image,
    Video,
    Audio,
    File,
}

impl FileKind {
    /// Classify by file extension, taken from `filename` when given and from
    /// the last path segment of `url` otherwise.
    #[must_use]
    pub fn detect(filename: Option<&str>, url: &str) -> Self {
        let name = match filename {
            Some(name) if !name.is_empty() => name,
            _ => url_basename(url),
        };
        let Some((_, ext)) = name.rsplit_once('.') else {
            return Self::File;
        };
        match ext.to_ascii_lowercase().as_str() {
            "png" | "jpg" | "jpeg" | "gif" | "webp" | "bmp" | "svg" => Self::Image,
            "mp4" | "webm" | "mov" | "mkv" | "avi" => Self::Video,
            "mp3" | "ogg" | "oga" | "opus" | "wav" | "flac" | "m4a" => Self::Audio,
            _ => Self::File,
        }
    }

    /// Matrix `msgtype` for this kind.
    #[must_use]
    pub fn msgtype(self) -> &'static str {
        match self {
            Self::Image => "m.image",
            Self::Video => "m.video",
            Self::Audio => "m.audio",
            Self::File => "m.file",
        }
    }
}

fn url_basename(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/').next().unwrap_or(path)
}
