//! Media kinds

/// Kind of local capture media
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    /// Video capture (camera)
    Camera,
    /// Audio capture (microphone)
    Microphone,
}

impl MediaKind {
    /// Whether this kind carries video
    pub fn is_video(self) -> bool {
        self == MediaKind::Camera
    }

    /// Whether this kind carries audio
    pub fn is_audio(self) -> bool {
        self == MediaKind::Microphone
    }

    /// Short name used in logs
    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Camera => "camera",
            MediaKind::Microphone => "microphone",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
