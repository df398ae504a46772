//! Slideshow configuration: the copy, the ordered message list and the animation
//! tunables. Defaults carry the stock content so the page works with no JSON at all.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::hearts::HeartSettings;
use crate::motion::MotionDurations;

// -----------------------------------------------------------------------------
// Stock content
// -----------------------------------------------------------------------------

pub const DEFAULT_INTRO_TITLE: &str = "halo cantik aku";
pub const DEFAULT_INTRO_HINT: &str = "tap layarnya buat lanjut sayang";
pub const DEFAULT_PROGRESS_LABEL: &str = "Progres pesan";
pub const DEFAULT_HEART_SRC: &str = "heart.svg";

/// Viewports at or below this width use compact heart sizes.
pub const COMPACT_BREAKPOINT_PX: u32 = 768;

pub const DEFAULT_MESSAGES: &[&str] = &[
    "Halo sayang akuu, ini aku lagii hehehe, jangan bosen bosen yaa bacanyaa, mwaaa",
    "Mungkin minggu ini adalah minggu yang cukup berat buat kamu, sampe bener-bener nguras tenaga dan pikiran kamu..",
    "Semua itu bisa aku liat dari ekspresi kamu waktu kita call, lalu juga dari cara kamu bales chat aku, kamu bener-bener cape yaa..",
    "Mungkin rasa bosen yang waktu itu kamu bilang ke aku masih ada, tapi gapapa aku ngerti emang lagi monoton aja, dan itu wajar ko sayang kalo kamu ngerasa bosen, tapi jangan berantem pliss..",
    "Aku juga ngerasa emang lagi flat aja hubungan kita, tapi namanya hubungan ada di atas, ada di bawah, ada pas datar aja.. ini fase sayangg.. ini pasti lewat koo",
    "Tapi aku mau kita ngobrol banyaa, banyaa bangett ngebahas apa ajaa, terutama ngebahas hari-hari kamuu, aku pengen tau cerita dari kamuu sayangg",
    "Aku juga berharap nanti pas ke private room bonding kita jadi makin kuat, makin deket, kita bisa sayang-sayangan lagi, makin-makin malah aku maunya hehehe, itu bisa jadi momen kitaa nanti sayangg",
    "Pliss yaa sayang kalo ada apa-apa cerita sama aku, kalo butuh apa-apa bilang ke aku, pokonya bilang ke akuu. Nanti aku juga gitu ke kamuuu",
    "Aku disini sayang, i'm still here, always been here for u",
    "I love u very much, in this timeline, in this unieverse, in every universe😘❣️",
];

// -----------------------------------------------------------------------------
// Config
// -----------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SlideshowConfig {
    pub intro_title: String,
    pub intro_hint: String,
    pub progress_label: String,
    pub messages: Vec<String>,
    pub durations: MotionDurations,
    pub hearts: HeartSettings,
    pub heart_src: String,
    pub compact_breakpoint_px: u32,
}

impl Default for SlideshowConfig {
    fn default() -> Self {
        Self {
            intro_title: DEFAULT_INTRO_TITLE.to_string(),
            intro_hint: DEFAULT_INTRO_HINT.to_string(),
            progress_label: DEFAULT_PROGRESS_LABEL.to_string(),
            messages: DEFAULT_MESSAGES.iter().map(|m| m.to_string()).collect(),
            durations: MotionDurations::default(),
            hearts: HeartSettings::default(),
            heart_src: DEFAULT_HEART_SRC.to_string(),
            compact_breakpoint_px: COMPACT_BREAKPOINT_PX,
        }
    }
}

impl SlideshowConfig {
    /// Parse JSON; missing fields fall back to the defaults.
    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.messages.is_empty() {
            return Err(ConfigError::EmptyMessages);
        }
        let h = &self.hearts;
        let ranges = [
            ("hearts.count", h.count.0 as i64, h.count.1 as i64),
            ("hearts.lifetime_ms", h.lifetime_ms.0 as i64, h.lifetime_ms.1 as i64),
            ("hearts.rotation_deg", h.rotation_deg.0 as i64, h.rotation_deg.1 as i64),
            ("hearts.compact_size", h.compact_size.0 as i64, h.compact_size.1 as i64),
            ("hearts.normal_size", h.normal_size.0 as i64, h.normal_size.1 as i64),
        ];
        for (name, min, max) in ranges {
            if min > max {
                return Err(ConfigError::InvalidRange { name, min, max });
            }
        }
        Ok(())
    }

    /// Media query for the compact (small viewport) heart sizing.
    pub fn compact_query(&self) -> String {
        format!("(max-width: {}px)", self.compact_breakpoint_px)
    }
}
