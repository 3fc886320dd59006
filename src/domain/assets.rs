//! Photo and audio assets shown in the event box.

use std::path::{Path, PathBuf};

use serde::Serialize;

/// Instruments whose photo is animated.
const ANIMATED_PHOTOS: &[&str] = &["Player Piano"];

/// Instruments without a sound sample.
const SILENT_INSTRUMENTS: &[&str] = &["Polychord with bridge", "Polychord without bridge"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaAssets {
    pub photo: PathBuf,
    pub audio: Option<PathBuf>,
}

impl MediaAssets {
    pub fn for_instrument(name: &str, photos_dir: &Path, sounds_dir: &Path) -> Self {
        let ext = if ANIMATED_PHOTOS.contains(&name) {
            "gif"
        } else {
            "jpg"
        };
        let audio = (!SILENT_INSTRUMENTS.contains(&name))
            .then(|| sounds_dir.join(format!("{name}.mp3")));
        Self {
            photo: photos_dir.join(format!("{name}.{ext}")),
            audio,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_player_piano_when_resolving_then_gif_photo() {
        let assets = MediaAssets::for_instrument("Player Piano", Path::new("photos"), Path::new("sounds"));
        assert_eq!(assets.photo, PathBuf::from("photos/Player Piano.gif"));
        assert_eq!(assets.audio, Some(PathBuf::from("sounds/Player Piano.mp3")));
    }

    #[test]
    fn given_polychord_when_resolving_then_no_audio() {
        let assets =
            MediaAssets::for_instrument("Polychord with bridge", Path::new("photos"), Path::new("sounds"));
        assert_eq!(assets.photo, PathBuf::from("photos/Polychord with bridge.jpg"));
        assert_eq!(assets.audio, None);
    }
}
