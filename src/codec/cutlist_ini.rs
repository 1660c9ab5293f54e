//! Sectioned key=value cut list format
//!
//! A cut list is a `[General]` section followed by one `[CutN]` section per
//! interval. Cuts are written either in frames (`StartFrame`/`DurationFrames`)
//! or in seconds (`Start`/`Duration`); the generator always writes both.

use tracing::{debug, warn};

use crate::domain::errors::DomainError;
use crate::domain::model::{correct_size_wraparound, seconds_to_frame, Cut, TimingModel};

const GENERAL: &str = "General";
const INFO: &str = "Info";
const TERMS_COMMENT: &str =
    "Diese Cutlist unterliegt den Nutzungsbedingungen von cutlist.at (Stand: 14.Oktober 2008)";
const TERMS_URL: &str = "http://cutlist.at/terms/";

/// One `[name]` block with its entries in document order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IniSection {
    pub name: String,
    pub entries: Vec<(String, String)>,
}

impl IniSection {
    /// First value stored under `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    fn get_parsed<T: std::str::FromStr>(&self, key: &str) -> Option<T> {
        self.get(key).and_then(|value| value.parse().ok())
    }

    /// Index of a `[CutN]` section
    pub fn cut_index(&self) -> Option<usize> {
        let digits = self.name.strip_prefix("Cut")?;
        if digits.is_empty() {
            return None;
        }
        digits.parse().ok()
    }
}

/// Parsed sectioned document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IniDocument {
    pub sections: Vec<IniSection>,
}

impl IniDocument {
    /// Parse text leniently; malformed lines are skipped
    pub fn parse(text: &str) -> Self {
        let mut sections: Vec<IniSection> = Vec::new();

        for (line_no, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
                continue;
            }

            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                sections.push(IniSection {
                    name: name.trim().to_string(),
                    entries: Vec::new(),
                });
                continue;
            }

            match line.split_once('=') {
                Some((key, value)) => {
                    if sections.is_empty() {
                        sections.push(IniSection::default());
                    }
                    if let Some(section) = sections.last_mut() {
                        section
                            .entries
                            .push((key.trim().to_string(), value.trim().to_string()));
                    }
                }
                None => debug!("cut list line {} ignored: {}", line_no + 1, line),
            }
        }

        Self { sections }
    }

    pub fn section(&self, name: &str) -> Option<&IniSection> {
        self.sections
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
    }

    /// All `[CutN]` sections in document order
    pub fn cut_sections(&self) -> impl Iterator<Item = &IniSection> {
        self.sections.iter().filter(|s| s.cut_index().is_some())
    }

    /// Look a key up in `[General]`, falling back to any section
    fn general_value(&self, key: &str) -> Option<&str> {
        self.section(GENERAL)
            .and_then(|s| s.get(key))
            .or_else(|| self.sections.iter().find_map(|s| s.get(key)))
    }

    /// Frame encoding is used when any cut section carries a `StartFrame` key
    pub fn uses_frame_encoding(&self) -> bool {
        self.cut_sections().any(|s| s.get("StartFrame").is_some())
    }
}

/// Build a timing model from cut list text
pub fn decode_timing_model(text: &str) -> Result<TimingModel, DomainError> {
    let doc = IniDocument::parse(text);

    let fps_raw = doc
        .general_value("FramesPerSecond")
        .ok_or_else(|| DomainError::MissingField("FramesPerSecond".to_string()))?;
    let fps: f64 = fps_raw.parse().map_err(|_| {
        DomainError::InvalidFormat(format!("FramesPerSecond is not a number: {}", fps_raw))
    })?;

    let frame_encoded = doc.uses_frame_encoding();
    let mut cuts = Vec::new();
    for section in doc.cut_sections() {
        match decode_cut(section, fps, frame_encoded) {
            Some(cut) => cuts.push(cut),
            None => warn!("cut list section [{}] has no usable interval, skipped", section.name),
        }
    }

    let source_file = match doc.general_value("ApplyToFile") {
        Some(name) => name.to_string(),
        None => {
            warn!("cut list has no ApplyToFile field");
            String::new()
        }
    };

    let source_size_bytes = match doc.general_value("OriginalFileSizeBytes") {
        Some(raw) => match raw.parse::<u64>() {
            Ok(size) => size,
            Err(_) => match raw.parse::<i64>() {
                Ok(size) => correct_size_wraparound(size),
                Err(_) => {
                    warn!("cut list has an unreadable OriginalFileSizeBytes: {}", raw);
                    0
                }
            },
        },
        None => {
            warn!("cut list has no OriginalFileSizeBytes field");
            0
        }
    };

    let suggested = doc
        .section(GENERAL)
        .and_then(|s| s.get("SuggestedMovieName"))
        .or_else(|| doc.section(INFO).and_then(|s| s.get("SuggestedMovieName")))
        .unwrap_or_default();

    Ok(TimingModel::new(fps, cuts, source_file, source_size_bytes)?.with_suggested_name(suggested))
}

fn decode_cut(section: &IniSection, fps: f64, frame_encoded: bool) -> Option<Cut> {
    if frame_encoded {
        let frames = section
            .get_parsed::<i64>("StartFrame")
            .zip(section.get_parsed::<i64>("DurationFrames"));
        if let Some((start, duration)) = frames {
            return Cut::checked(start, duration);
        }
    }
    let (start, duration) = section
        .get_parsed::<f64>("Start")
        .zip(section.get_parsed::<f64>("Duration"))?;
    if !start.is_finite() || !duration.is_finite() {
        return None;
    }
    Cut::checked(seconds_to_frame(start, fps), seconds_to_frame(duration, fps))
}

/// Serialize a timing model in the interchange layout
pub fn encode_timing_model(model: &TimingModel) -> String {
    let mut general = vec![
        ("Application", env!("CARGO_PKG_NAME").to_string()),
        ("Version", env!("CARGO_PKG_VERSION").to_string()),
        ("comment1", TERMS_COMMENT.to_string()),
        ("comment2", TERMS_URL.to_string()),
        ("ApplyToFile", model.source_file.clone()),
        ("OriginalFileSizeBytes", model.source_size_bytes.to_string()),
        ("FramesPerSecond", model.fps.to_string()),
        ("IntendedCutApplication", "Avidemux".to_string()),
        ("IntendedCutApplicationVersion", "2.5".to_string()),
        ("IntendedCutApplicationOptions", String::new()),
        ("CutCommandLine", String::new()),
        ("NoOfCuts", model.cuts.len().to_string()),
    ];
    if let Some(name) = &model.suggested_name {
        general.push(("SuggestedMovieName", name.clone()));
    }

    let mut text = render_section(GENERAL, &general);
    for (index, cut) in model.cuts.iter().enumerate() {
        text.push_str(&render_section(
            &format!("Cut{}", index),
            &[
                ("Start", format!("{:.6}", model.frame_to_seconds(cut.start_frame))),
                ("StartFrame", cut.start_frame.to_string()),
                ("Duration", format!("{:.6}", model.frame_to_seconds(cut.duration_frames))),
                ("DurationFrames", cut.duration_frames.to_string()),
            ],
        ));
        text.push('\n');
    }
    text
}

/// Render one section followed by its `key=value` lines
pub fn render_section<K: AsRef<str>, V: AsRef<str>>(name: &str, entries: &[(K, V)]) -> String {
    let mut text = format!("[{}]\n", name);
    for (key, value) in entries {
        text.push_str(key.as_ref());
        text.push('=');
        text.push_str(value.as_ref());
        text.push('\n');
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECONDS_LIST: &str = "[General]\r\n\
        Application=SomeTool\r\n\
        ApplyToFile=Show_10.01.01_20-15_ard_90_TVOON_DE.mpg.avi\r\n\
        OriginalFileSizeBytes=-1294967296\r\n\
        FramesPerSecond=25\r\n\
        \r\n\
        [Cut0]\r\n\
        Start=10.000000\r\n\
        Duration=5.000000\r\n\
        \r\n\
        [Cut1]\r\n\
        Start=100.5\r\n\
        Duration=-20.0\r\n";

    const FRAME_LIST: &str = "[General]\n\
        FramesPerSecond=29.97\n\
        ApplyToFile=a.avi\n\
        OriginalFileSizeBytes=123456\n\
        SuggestedMovieName=A Movie (2010)\n\
        [Cut0]\n\
        Start=1.0\n\
        StartFrame=30\n\
        Duration=2.0\n\
        DurationFrames=60\n";

    #[test]
    fn test_parse_sections() {
        let doc = IniDocument::parse(SECONDS_LIST);
        assert_eq!(doc.sections.len(), 3);
        assert_eq!(doc.section("general").and_then(|s| s.get("FramesPerSecond")), Some("25"));
        assert_eq!(doc.cut_sections().count(), 2);
        assert!(!doc.uses_frame_encoding());
    }

    #[test]
    fn test_cut_index() {
        let section = IniSection {
            name: "Cut12".to_string(),
            entries: Vec::new(),
        };
        assert_eq!(section.cut_index(), Some(12));
        let other = IniSection {
            name: "Cutter".to_string(),
            entries: Vec::new(),
        };
        assert_eq!(other.cut_index(), None);
    }

    #[test]
    fn test_decode_seconds_encoding() {
        let model = decode_timing_model(SECONDS_LIST).unwrap();
        assert_eq!(model.fps, 25.0);
        assert_eq!(model.source_file, "Show_10.01.01_20-15_ard_90_TVOON_DE.mpg.avi");
        assert_eq!(model.source_size_bytes, 3_000_000_000);
        assert_eq!(model.cuts[0], Cut::new(250, 125));
        // 100.5s - 20s, endpoint kept at 2513 frames
        assert_eq!(model.cuts[1].start_frame, 2013);
        assert_eq!(model.cuts[1].duration_frames, 500);
        assert_eq!(model.suggested_name, None);
    }

    #[test]
    fn test_decode_frame_encoding_wins() {
        let model = decode_timing_model(FRAME_LIST).unwrap();
        assert_eq!(model.fps, 29.97);
        assert_eq!(model.cuts, vec![Cut::new(30, 60)]);
        assert_eq!(model.suggested_name.as_deref(), Some("A Movie (2010)"));
    }

    #[test]
    fn test_frame_field_in_comment_does_not_switch_encoding() {
        let text = "[General]\nFramesPerSecond=25\nUserComment=StartFrame=1 is wrong\n[Cut0]\nStart=2\nDuration=1\n";
        let model = decode_timing_model(text).unwrap();
        assert_eq!(model.cuts, vec![Cut::new(50, 25)]);
    }

    #[test]
    fn test_missing_fps_fails() {
        let text = "[General]\nApplyToFile=a.avi\n[Cut0]\nStart=1\nDuration=1\n";
        assert_eq!(
            decode_timing_model(text),
            Err(DomainError::MissingField("FramesPerSecond".to_string()))
        );
    }

    #[test]
    fn test_missing_cuts_fails() {
        let text = "[General]\nFramesPerSecond=25\n";
        assert!(matches!(
            decode_timing_model(text),
            Err(DomainError::MissingField(_))
        ));
    }

    #[test]
    fn test_optional_fields_tolerated() {
        let text = "[General]\nFramesPerSecond=25\n[Cut0]\nStart=1\nDuration=1\n[Cut1]\nStart=oops\n";
        let model = decode_timing_model(text).unwrap();
        assert_eq!(model.source_file, "");
        assert_eq!(model.source_size_bytes, 0);
        assert_eq!(model.cuts.len(), 1);
    }

    #[test]
    fn test_encode_layout() {
        let model = decode_timing_model(FRAME_LIST).unwrap();
        let text = encode_timing_model(&model);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "[General]");
        assert!(lines[1].starts_with("Application="));
        assert!(lines[2].starts_with("Version="));
        assert!(text.contains("NoOfCuts=1\n"));
        assert!(text.contains("IntendedCutApplication=Avidemux\n"));
        assert!(text.contains("[Cut0]\nStart=1.001001\nStartFrame=30\nDuration=2.002002\nDurationFrames=60\n"));
    }

    #[test]
    fn test_round_trip_seconds_input() {
        let model = decode_timing_model(SECONDS_LIST).unwrap();
        let again = decode_timing_model(&encode_timing_model(&model)).unwrap();
        assert_eq!(model, again);
    }

    #[test]
    fn test_overflowing_frames_skip_the_section() {
        let text = "[General]\nFramesPerSecond=25\n\
            [Cut0]\nStartFrame=0\nDurationFrames=-9223372036854775808\n\
            [Cut1]\nStartFrame=-9223372036854775000\nDurationFrames=-5000\n\
            [Cut2]\nStartFrame=9223372036854775000\nDurationFrames=5000\n\
            [Cut3]\nStartFrame=100\nDurationFrames=50\n";
        let model = decode_timing_model(text).unwrap();
        assert_eq!(model.cuts, vec![Cut::new(100, 50)]);
    }

    #[test]
    fn test_only_overflowing_frames_is_missing_cuts() {
        let text = "[General]\nFramesPerSecond=25\n[Cut0]\nStartFrame=0\nDurationFrames=-9223372036854775808\n";
        assert!(matches!(
            TimingModel::from_raw_text(text),
            Err(DomainError::MissingField(_))
        ));
    }

    #[test]
    fn test_non_finite_seconds_skip_the_section() {
        let text = "[General]\nFramesPerSecond=25\n[Cut0]\nStart=inf\nDuration=1\n[Cut1]\nStart=1e300\nDuration=1e300\n[Cut2]\nStart=2\nDuration=1\n";
        let model = decode_timing_model(text).unwrap();
        assert_eq!(model.cuts, vec![Cut::new(50, 25)]);
    }

    #[test]
    fn test_large_unsigned_size_survives() {
        let text = format!(
            "[General]\nFramesPerSecond=25\nOriginalFileSizeBytes={}\n[Cut0]\nStart=1\nDuration=1\n",
            u64::MAX
        );
        let model = decode_timing_model(&text).unwrap();
        assert_eq!(model.source_size_bytes, u64::MAX);
        let again = decode_timing_model(&encode_timing_model(&model)).unwrap();
        assert_eq!(again, model);
    }

    #[test]
    fn test_info_section_supplies_suggested_name() {
        let text = "[General]\nFramesPerSecond=25\n[Cut0]\nStart=1\nDuration=1\n[Info]\nSuggestedMovieName=Other\n";
        let model = decode_timing_model(text).unwrap();
        assert_eq!(model.suggested_name.as_deref(), Some("Other"));
    }
}
